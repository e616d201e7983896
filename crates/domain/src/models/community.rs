//! Community domain models and the plan capacity policy.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

use crate::models::membership::{LinkStatus, MemberRole};

/// Privacy tier of a community.
///
/// Private communities are not listed in the public directory and cannot be
/// self-joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    Private,
    Public,
}

impl Default for Privacy {
    fn default() -> Self {
        Privacy::Private
    }
}

impl FromStr for Privacy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "private" => Ok(Privacy::Private),
            "public" => Ok(Privacy::Public),
            _ => Err(format!("Unknown privacy tier: {}", s)),
        }
    }
}

impl std::fmt::Display for Privacy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Privacy::Private => write!(f, "private"),
            Privacy::Public => write!(f, "public"),
        }
    }
}

/// Default status applied to users who sign up for a community.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignupPolicy {
    /// Users cannot sign up at all, even with a code.
    None,
    /// Users may join directly with the community's join code.
    JoinCode,
    /// Users may request to join; an admin must approve.
    ApprovalRequired,
    /// Users who sign up are accepted automatically.
    AutoAccept,
}

impl Default for SignupPolicy {
    fn default() -> Self {
        SignupPolicy::ApprovalRequired
    }
}

impl std::fmt::Display for SignupPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignupPolicy::None => write!(f, "none"),
            SignupPolicy::JoinCode => write!(f, "join_code"),
            SignupPolicy::ApprovalRequired => write!(f, "approval_required"),
            SignupPolicy::AutoAccept => write!(f, "auto_accept"),
        }
    }
}

/// Billing plan tier of a community.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    Free,
    Basic,
    Pro,
}

impl Default for PlanTier {
    fn default() -> Self {
        PlanTier::Free
    }
}

impl FromStr for PlanTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "free" => Ok(PlanTier::Free),
            "basic" => Ok(PlanTier::Basic),
            "pro" => Ok(PlanTier::Pro),
            _ => Err(format!("Unknown plan tier: {}", s)),
        }
    }
}

impl std::fmt::Display for PlanTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanTier::Free => write!(f, "free"),
            PlanTier::Basic => write!(f, "basic"),
            PlanTier::Pro => write!(f, "pro"),
        }
    }
}

/// Capacity quota attached to a plan tier.
///
/// Admission control compares the accepted-member count against
/// `max_members` before any new link is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PlanQuota {
    pub max_members: i64,
    pub max_active_requests: i64,
    pub monthly_price_cents: i64,
}

impl PlanTier {
    /// Returns the capacity quota for this plan tier.
    pub fn quota(self) -> PlanQuota {
        match self {
            PlanTier::Free => PlanQuota {
                max_members: 50,
                max_active_requests: 50,
                monthly_price_cents: 0,
            },
            PlanTier::Basic => PlanQuota {
                max_members: 200,
                max_active_requests: 500,
                monthly_price_cents: 499,
            },
            PlanTier::Pro => PlanQuota {
                max_members: 2000,
                max_active_requests: 4000,
                monthly_price_cents: 999,
            },
        }
    }
}

/// Community domain model.
///
/// Billing attributes (`plan_paid_through`, `plan_discount_percent`,
/// `stripe_subscription_id`) are read-only here; they exist so the redaction
/// boundary can strip them for non-admin viewers.
#[derive(Debug, Clone, PartialEq)]
pub struct Community {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub short_code: String,
    pub join_code: Option<String>,
    pub created: DateTime<Utc>,
    pub privacy: Privacy,
    pub signup_policy: SignupPolicy,
    pub plan: PlanTier,
    pub plan_paid_through: Option<NaiveDate>,
    pub plan_discount_percent: i64,
    pub stripe_subscription_id: Option<String>,
    /// Count of links with status `accepted`.
    pub member_count: i64,
    /// Count of prayer-request associations.
    pub request_count: i64,
}

/// A community annotated with the caller's own link, for "my communities"
/// listings.
#[derive(Debug, Clone)]
pub struct CommunityWithMembership {
    pub community: Community,
    pub user_role: MemberRole,
    pub user_status: LinkStatus,
}

/// Wire-facing community shape.
///
/// Constructed through an explicit mapping from [`Community`] so that
/// redaction is a type boundary rather than field clearing on a shared
/// struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CommunityView {
    pub id: i64,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join_code: Option<String>,
    pub created: DateTime<Utc>,
    pub privacy: Privacy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signup_policy: Option<SignupPolicy>,
    pub plan: PlanTier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_paid_through: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_discount_percent: Option<i64>,
    pub member_count: i64,
    pub request_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_role: Option<MemberRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_status: Option<LinkStatus>,
}

impl CommunityView {
    /// Maps a community for a viewer with the given role, redacting
    /// admin-only fields (join code, short code, signup policy and billing
    /// fields) unless the viewer is an admin.
    ///
    /// The Stripe subscription id never crosses the wire boundary.
    pub fn for_role(community: Community, role: Option<MemberRole>) -> Self {
        let is_admin = role == Some(MemberRole::Admin);
        Self {
            id: community.id,
            name: community.name,
            description: community.description,
            short_code: is_admin.then_some(community.short_code),
            join_code: if is_admin { community.join_code } else { None },
            created: community.created,
            privacy: community.privacy,
            signup_policy: is_admin.then_some(community.signup_policy),
            plan: community.plan,
            plan_paid_through: if is_admin {
                community.plan_paid_through
            } else {
                None
            },
            plan_discount_percent: is_admin.then_some(community.plan_discount_percent),
            member_count: community.member_count,
            request_count: community.request_count,
            user_role: None,
            user_status: None,
        }
    }

    /// Maps a community for the public directory: the short code stays (it
    /// is the public lookup key) but the join code and billing fields are
    /// stripped.
    pub fn public_listing(community: Community) -> Self {
        Self {
            id: community.id,
            name: community.name,
            description: community.description,
            short_code: Some(community.short_code),
            join_code: None,
            created: community.created,
            privacy: community.privacy,
            signup_policy: Some(community.signup_policy),
            plan: community.plan,
            plan_paid_through: None,
            plan_discount_percent: None,
            member_count: community.member_count,
            request_count: community.request_count,
            user_role: None,
            user_status: None,
        }
    }

    /// Maps a community for a "my communities" listing, annotated with the
    /// caller's own role and status; admin fields follow the caller's role.
    pub fn with_membership(entry: CommunityWithMembership) -> Self {
        let role = entry.user_role;
        let status = entry.user_status;
        // A pending link confers no admin visibility.
        let effective = if status == LinkStatus::Accepted {
            Some(role)
        } else {
            None
        };
        let mut view = Self::for_role(entry.community, effective);
        view.user_role = Some(role);
        view.user_status = Some(status);
        view
    }
}

/// Sort fields accepted by the public directory, whitelisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Name,
    Created,
}

impl Default for SortField {
    fn default() -> Self {
        SortField::Name
    }
}

impl SortField {
    /// Column name for interpolation into the directory query. The enum is
    /// the whitelist.
    pub fn as_column(self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Created => "created",
        }
    }
}

/// Sort direction for the public directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    Asc,
    Desc,
}

impl Default for SortDir {
    fn default() -> Self {
        SortDir::Asc
    }
}

impl SortDir {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        }
    }
}

/// Request to create a community.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateCommunityRequest {
    #[validate(custom(function = "shared::validation::validate_community_name"))]
    pub name: String,
    #[serde(default)]
    #[validate(custom(function = "shared::validation::validate_description"))]
    pub description: String,
    #[validate(custom(function = "shared::validation::validate_code"))]
    pub short_code: Option<String>,
    #[validate(custom(function = "shared::validation::validate_code"))]
    pub join_code: Option<String>,
    pub privacy: Option<Privacy>,
    pub signup_policy: Option<SignupPolicy>,
    pub plan: Option<PlanTier>,
}

/// Request to update a community. All fields optional; omitted fields are
/// left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateCommunityRequest {
    #[validate(custom(function = "shared::validation::validate_community_name"))]
    pub name: Option<String>,
    #[validate(custom(function = "shared::validation::validate_description"))]
    pub description: Option<String>,
    #[validate(custom(function = "shared::validation::validate_code"))]
    pub join_code: Option<String>,
    pub privacy: Option<Privacy>,
    pub signup_policy: Option<SignupPolicy>,
}

/// Query parameters for the public directory listing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct ListPublicCommunitiesQuery {
    pub sort_field: Option<SortField>,
    pub sort_dir: Option<SortDir>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
