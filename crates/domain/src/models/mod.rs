//! Domain models for Communitas.

pub mod community;
pub mod membership;

pub use community::{
    Community, CommunityView, CommunityWithMembership, CreateCommunityRequest,
    ListPublicCommunitiesQuery, PlanQuota, PlanTier, Privacy, SignupPolicy, SortDir, SortField,
    UpdateCommunityRequest,
};
pub use membership::{
    LinkDecision, LinkStatus, MemberRole, MembershipLink, MembershipLinkView, MembershipOutcome,
    ProcessMembershipRequest, StatusFilter,
};
