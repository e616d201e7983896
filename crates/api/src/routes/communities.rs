//! Community CRUD and directory routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use domain::models::{
    CommunityView, CreateCommunityRequest, ListPublicCommunitiesQuery, MemberRole,
    UpdateCommunityRequest,
};
use domain::services::access;
use domain::store::NewCommunity;
use shared::codes::derive_short_code;
use shared::pagination::PageParams;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// Paginated directory listing response.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommunityListResponse {
    pub data: Vec<CommunityView>,
    pub limit: i64,
    pub offset: i64,
}

/// POST /api/v1/communities
///
/// Create a community. The creator is linked as an accepted admin.
pub async fn create_community(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<CreateCommunityRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    if state.communities.find_by_name(&request.name).await?.is_some() {
        return Err(ApiError::Conflict(format!(
            "Community '{}' already exists",
            request.name
        )));
    }

    let short_code = match request.short_code {
        Some(code) => code,
        None => derive_short_code(&request.name, auth.user_id),
    };
    if state
        .communities
        .find_by_short_code(&short_code)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(format!(
            "Short code '{}' is already taken",
            short_code
        )));
    }

    let community = state
        .communities
        .create(&NewCommunity {
            name: request.name,
            description: request.description,
            short_code,
            join_code: request.join_code,
            privacy: request.privacy.unwrap_or_default(),
            signup_policy: request.signup_policy.unwrap_or_default(),
            plan: request.plan.unwrap_or_default(),
        })
        .await?;

    // The creator is the first accepted admin.
    state
        .links
        .upsert(
            community.id,
            auth.user_id,
            MemberRole::Admin,
            domain::models::LinkStatus::Accepted,
            None,
        )
        .await?;

    info!(
        community_id = community.id,
        user_id = auth.user_id,
        name = %community.name,
        "Created community"
    );

    // Re-read so the view carries the creator's link in its counts.
    let community = state
        .communities
        .find_by_id(community.id)
        .await?
        .unwrap_or(community);

    Ok((
        StatusCode::CREATED,
        Json(CommunityView::for_role(community, Some(MemberRole::Admin))),
    ))
}

/// GET /api/v1/communities
///
/// Public directory, paginated and sorted. Always redacted.
pub async fn list_communities(
    State(state): State<AppState>,
    _auth: UserAuth,
    Query(query): Query<ListPublicCommunitiesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = PageParams::clamped(query.limit, query.offset);
    let communities = state
        .communities
        .list_public(
            query.sort_field.unwrap_or_default(),
            query.sort_dir.unwrap_or_default(),
            page,
        )
        .await?;

    Ok(Json(CommunityListResponse {
        data: communities
            .into_iter()
            .map(CommunityView::public_listing)
            .collect(),
        limit: page.limit,
        offset: page.offset,
    }))
}

/// GET /api/v1/communities/mine
///
/// Communities the caller is linked to, annotated with role and status.
pub async fn my_communities(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<impl IntoResponse, ApiError> {
    let entries = state.communities.list_for_user(auth.user_id).await?;

    let views: Vec<CommunityView> = entries
        .into_iter()
        .map(CommunityView::with_membership)
        .collect();
    Ok(Json(views))
}

/// GET /api/v1/communities/:community_id
///
/// Community detail, privacy-gated and redacted by the caller's role.
pub async fn get_community(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(community_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let community = state
        .communities
        .find_by_id(community_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Community not found".to_string()))?;

    let role = state
        .membership
        .effective_role(community_id, auth.user_id)
        .await?;
    if !access::can_view_community(community.privacy, role) {
        warn!(
            community_id,
            user_id = auth.user_id,
            "Blocked view of private community"
        );
        return Err(ApiError::Forbidden(
            "You are not permitted to view this community".to_string(),
        ));
    }

    Ok(Json(CommunityView::for_role(community, role)))
}

/// PUT /api/v1/communities/:community_id
///
/// Admin-only partial update.
pub async fn update_community(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(community_id): Path<i64>,
    Json(request): Json<UpdateCommunityRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let mut community = state
        .communities
        .find_by_id(community_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Community not found".to_string()))?;

    let role = state
        .membership
        .effective_role(community_id, auth.user_id)
        .await?;
    if !access::can_manage_community(role) {
        return Err(ApiError::Forbidden(
            "Only community admins can update a community".to_string(),
        ));
    }

    if let Some(name) = request.name {
        if name != community.name
            && state.communities.find_by_name(&name).await?.is_some()
        {
            return Err(ApiError::Conflict(format!(
                "Community '{}' already exists",
                name
            )));
        }
        community.name = name;
    }
    if let Some(description) = request.description {
        community.description = description;
    }
    if let Some(join_code) = request.join_code {
        community.join_code = Some(join_code);
    }
    if let Some(privacy) = request.privacy {
        community.privacy = privacy;
    }
    if let Some(signup_policy) = request.signup_policy {
        community.signup_policy = signup_policy;
    }

    state.communities.update(&community).await?;

    info!(community_id, user_id = auth.user_id, "Updated community");

    Ok(Json(CommunityView::for_role(community, role)))
}

/// DELETE /api/v1/communities/:community_id
///
/// Admin-only delete; membership links go with the community.
pub async fn delete_community(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(community_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let role = state
        .membership
        .effective_role(community_id, auth.user_id)
        .await?;
    if !access::can_manage_community(role) {
        return Err(ApiError::Forbidden(
            "Only community admins can delete a community".to_string(),
        ));
    }

    if !state.communities.delete(community_id).await? {
        return Err(ApiError::NotFound("Community not found".to_string()));
    }

    info!(community_id, user_id = auth.user_id, "Deleted community");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::{Privacy, SignupPolicy};

    #[test]
    fn test_create_request_deserializes_with_defaults() {
        let json = r#"{"name": "Morning Prayer"}"#;
        let request: CreateCommunityRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.name, "Morning Prayer");
        assert!(request.description.is_empty());
        assert!(request.short_code.is_none());
        assert!(request.privacy.is_none());
    }

    #[test]
    fn test_create_request_full_body() {
        let json = r#"{
            "name": "Morning Prayer",
            "description": "Daily at dawn",
            "short_code": "morning1",
            "join_code": "sunrise",
            "privacy": "public",
            "signup_policy": "auto_accept",
            "plan": "basic"
        }"#;
        let request: CreateCommunityRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.privacy, Some(Privacy::Public));
        assert_eq!(request.signup_policy, Some(SignupPolicy::AutoAccept));
    }

    #[test]
    fn test_update_request_partial_body() {
        let json = r#"{"privacy": "private"}"#;
        let request: UpdateCommunityRequest = serde_json::from_str(json).unwrap();
        assert!(request.name.is_none());
        assert_eq!(request.privacy, Some(Privacy::Private));
    }

    #[test]
    fn test_list_query_defaults() {
        let query: ListPublicCommunitiesQuery = serde_json::from_str("{}").unwrap();
        assert!(query.sort_field.is_none());
        assert!(query.limit.is_none());
    }

    #[test]
    fn test_list_response_shape() {
        let response = CommunityListResponse {
            data: vec![],
            limit: 20,
            offset: 0,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["limit"], 20);
        assert!(json["data"].as_array().unwrap().is_empty());
    }
}
