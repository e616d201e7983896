//! Membership link domain models.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Role a user holds inside a community.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Admin,
    Member,
}

impl FromStr for MemberRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(MemberRole::Admin),
            "member" => Ok(MemberRole::Member),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

impl std::fmt::Display for MemberRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemberRole::Admin => write!(f, "admin"),
            MemberRole::Member => write!(f, "member"),
        }
    }
}

/// Lifecycle status of a membership link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    /// An admin created the link on the subject's behalf.
    Invited,
    /// The subject asked to join.
    Requested,
    /// Full member.
    Accepted,
    /// Denied; never auto-revived.
    Declined,
}

impl FromStr for LinkStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "invited" => Ok(LinkStatus::Invited),
            "requested" => Ok(LinkStatus::Requested),
            "accepted" => Ok(LinkStatus::Accepted),
            "declined" => Ok(LinkStatus::Declined),
            _ => Err(format!("Unknown status: {}", s)),
        }
    }
}

impl std::fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkStatus::Invited => write!(f, "invited"),
            LinkStatus::Requested => write!(f, "requested"),
            LinkStatus::Accepted => write!(f, "accepted"),
            LinkStatus::Declined => write!(f, "declined"),
        }
    }
}

/// Target status allowed when processing a pending link.
///
/// Only `accepted` and `declined` are legal outcomes; anything else fails
/// at deserialization time, before any state is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkDecision {
    Accepted,
    Declined,
}

impl From<LinkDecision> for LinkStatus {
    fn from(decision: LinkDecision) -> Self {
        match decision {
            LinkDecision::Accepted => LinkStatus::Accepted,
            LinkDecision::Declined => LinkStatus::Declined,
        }
    }
}

/// Status filter for roster listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Only(LinkStatus),
}

impl StatusFilter {
    /// Parses a raw query value. Missing, `all`, or unrecognized values
    /// disable filtering.
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw {
            Some(s) => s
                .parse::<LinkStatus>()
                .map(StatusFilter::Only)
                .unwrap_or(StatusFilter::All),
            None => StatusFilter::All,
        }
    }

    /// Whether a link with the given status passes this filter.
    pub fn matches(self, status: LinkStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(s) => s == status,
        }
    }
}

/// The relation between one user and one community.
///
/// Profile fields are joined from the user record for roster display; the
/// verification code is present while the link is pending and must never
/// reach a non-admin viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct MembershipLink {
    pub community_id: i64,
    pub user_id: i64,
    pub role: MemberRole,
    pub status: LinkStatus,
    pub verification_code: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
}

/// Wire-facing membership link shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MembershipLinkView {
    pub community_id: i64,
    pub user_id: i64,
    pub role: MemberRole,
    pub status: LinkStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_code: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
}

impl MembershipLinkView {
    /// Full view, for admin viewers and transition responses.
    pub fn full(link: MembershipLink) -> Self {
        Self {
            community_id: link.community_id,
            user_id: link.user_id,
            role: link.role,
            status: link.status,
            verification_code: link.verification_code,
            first_name: link.first_name,
            last_name: link.last_name,
            email: link.email,
            username: link.username,
        }
    }

    /// View with the verification code stripped, for non-admin viewers.
    pub fn redacted(link: MembershipLink) -> Self {
        let mut view = Self::full(link);
        view.verification_code = None;
        view
    }
}

/// Outcome of a request-or-invite call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipOutcome {
    /// Self-service join request recorded, pending admin approval.
    Requested,
    /// Admin-initiated invitation recorded, pending subject approval.
    Invited,
    /// Auto-accept community; the subject is a member immediately.
    Joined,
    /// A link for this pair already existed and was left untouched.
    AlreadyLinked,
}

/// Request body for processing a pending link.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessMembershipRequest {
    pub code: String,
    pub status: LinkDecision,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_link() -> MembershipLink {
        MembershipLink {
            community_id: 1,
            user_id: 2,
            role: MemberRole::Member,
            status: LinkStatus::Requested,
            verification_code: Some("_abc123def".to_string()),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            username: "ada".to_string(),
        }
    }

    #[test]
    fn test_role_serde() {
        assert_eq!(serde_json::to_string(&MemberRole::Admin).unwrap(), "\"admin\"");
        let r: MemberRole = serde_json::from_str("\"member\"").unwrap();
        assert_eq!(r, MemberRole::Member);
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!(MemberRole::from_str("ADMIN").unwrap(), MemberRole::Admin);
        assert!(MemberRole::from_str("owner").is_err());
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            LinkStatus::Invited,
            LinkStatus::Requested,
            LinkStatus::Accepted,
            LinkStatus::Declined,
        ] {
            let parsed: LinkStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_decision_is_closed() {
        let ok: Result<LinkDecision, _> = serde_json::from_str("\"accepted\"");
        assert!(ok.is_ok());
        let bad: Result<LinkDecision, _> = serde_json::from_str("\"invited\"");
        assert!(bad.is_err());
        let worse: Result<LinkDecision, _> = serde_json::from_str("\"banana\"");
        assert!(worse.is_err());
    }

    #[test]
    fn test_status_filter_from_query() {
        assert_eq!(StatusFilter::from_query(None), StatusFilter::All);
        assert_eq!(StatusFilter::from_query(Some("all")), StatusFilter::All);
        assert_eq!(StatusFilter::from_query(Some("nonsense")), StatusFilter::All);
        assert_eq!(
            StatusFilter::from_query(Some("invited")),
            StatusFilter::Only(LinkStatus::Invited)
        );
    }

    #[test]
    fn test_status_filter_matches() {
        assert!(StatusFilter::All.matches(LinkStatus::Declined));
        assert!(StatusFilter::Only(LinkStatus::Accepted).matches(LinkStatus::Accepted));
        assert!(!StatusFilter::Only(LinkStatus::Accepted).matches(LinkStatus::Invited));
    }

    #[test]
    fn test_redacted_view_strips_code() {
        let view = MembershipLinkView::redacted(sample_link());
        assert!(view.verification_code.is_none());
        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("_abc123def"));
        assert!(!json.contains("verification_code"));
    }

    #[test]
    fn test_full_view_keeps_code() {
        let view = MembershipLinkView::full(sample_link());
        assert_eq!(view.verification_code.as_deref(), Some("_abc123def"));
    }

    #[test]
    fn test_outcome_serde() {
        assert_eq!(
            serde_json::to_string(&MembershipOutcome::AlreadyLinked).unwrap(),
            "\"already_linked\""
        );
        assert_eq!(
            serde_json::to_string(&MembershipOutcome::Joined).unwrap(),
            "\"joined\""
        );
    }

    #[test]
    fn test_process_request_deserialization() {
        let json = r#"{"code": "_abc123def", "status": "declined"}"#;
        let req: ProcessMembershipRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.code, "_abc123def");
        assert_eq!(req.status, LinkDecision::Declined);
    }
}
