//! Membership transition and roster routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use domain::models::{
    MembershipLinkView, MembershipOutcome, ProcessMembershipRequest, StatusFilter,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// Response body for a request-or-invite call.
#[derive(Debug, Serialize, Deserialize)]
pub struct MembershipOutcomeResponse {
    pub outcome: MembershipOutcome,
}

/// Query parameters for the roster listing.
#[derive(Debug, Deserialize, Default)]
pub struct RosterQuery {
    pub status: Option<String>,
}

/// Roster listing response.
#[derive(Debug, Serialize)]
pub struct RosterResponse {
    pub data: Vec<MembershipLinkView>,
}

/// POST /api/v1/communities/:community_id/members/:user_id
///
/// Self-service join request or admin invitation, depending on whether
/// the caller is the subject.
pub async fn add_member(
    State(state): State<AppState>,
    auth: UserAuth,
    Path((community_id, user_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state
        .membership
        .request_or_invite(community_id, auth.user_id, user_id)
        .await?;

    info!(
        community_id,
        actor_id = auth.user_id,
        subject_id = user_id,
        outcome = ?outcome,
        "Membership link requested"
    );

    Ok(Json(MembershipOutcomeResponse { outcome }))
}

/// PUT /api/v1/communities/:community_id/members/:user_id
///
/// Accept or decline a pending link, presenting its verification code.
pub async fn process_member(
    State(state): State<AppState>,
    auth: UserAuth,
    Path((community_id, user_id)): Path<(i64, i64)>,
    Json(request): Json<ProcessMembershipRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let link = state
        .membership
        .process(
            community_id,
            auth.user_id,
            user_id,
            &request.code,
            request.status,
        )
        .await?;

    info!(
        community_id,
        actor_id = auth.user_id,
        subject_id = user_id,
        status = %link.status,
        "Membership link processed"
    );

    Ok(Json(MembershipLinkView::full(link)))
}

/// DELETE /api/v1/communities/:community_id/members/:user_id
///
/// Admin-only removal of a member, whatever the link's status.
pub async fn remove_member(
    State(state): State<AppState>,
    auth: UserAuth,
    Path((community_id, user_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .membership
        .remove(community_id, auth.user_id, user_id)
        .await?;

    info!(
        community_id,
        actor_id = auth.user_id,
        subject_id = user_id,
        "Membership link removed"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/communities/:community_id/members
///
/// Roster listing for members; verification codes only for admins.
pub async fn list_members(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(community_id): Path<i64>,
    Query(query): Query<RosterQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = StatusFilter::from_query(query.status.as_deref());
    let data = state
        .membership
        .roster(community_id, auth.user_id, filter)
        .await?;

    Ok(Json(RosterResponse { data }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::LinkDecision;

    #[test]
    fn test_outcome_response_shape() {
        let json = serde_json::to_string(&MembershipOutcomeResponse {
            outcome: MembershipOutcome::Requested,
        })
        .unwrap();
        assert_eq!(json, r#"{"outcome":"requested"}"#);

        let json = serde_json::to_string(&MembershipOutcomeResponse {
            outcome: MembershipOutcome::AlreadyLinked,
        })
        .unwrap();
        assert_eq!(json, r#"{"outcome":"already_linked"}"#);
    }

    #[test]
    fn test_process_body_accepts_closed_decisions_only() {
        let ok: ProcessMembershipRequest =
            serde_json::from_str(r#"{"code": "_abc123def", "status": "accepted"}"#).unwrap();
        assert_eq!(ok.status, LinkDecision::Accepted);

        let err: Result<ProcessMembershipRequest, _> =
            serde_json::from_str(r#"{"code": "_abc123def", "status": "requested"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_roster_query_status_optional() {
        let query: RosterQuery = serde_json::from_str("{}").unwrap();
        assert!(query.status.is_none());

        let query: RosterQuery = serde_json::from_str(r#"{"status": "invited"}"#).unwrap();
        assert_eq!(query.status.as_deref(), Some("invited"));
    }
}
