//! Store traits implemented by the persistence layer.
//!
//! The workflow engine receives these as injected trait objects, so tests
//! can substitute an in-memory implementation for the database-backed one.

use async_trait::async_trait;
use thiserror::Error;

use shared::pagination::PageParams;

use crate::models::{
    Community, CommunityWithMembership, LinkStatus, MemberRole, MembershipLink, PlanTier, Privacy,
    SignupPolicy, SortDir, SortField, StatusFilter,
};

/// Storage failure surfaced to the domain layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("row not found")]
    NotFound,

    #[error("duplicate key")]
    Conflict,

    #[error("storage failure: {0}")]
    Backend(String),
}

/// Insert shape for a new community.
#[derive(Debug, Clone)]
pub struct NewCommunity {
    pub name: String,
    pub description: String,
    pub short_code: String,
    pub join_code: Option<String>,
    pub privacy: Privacy,
    pub signup_policy: SignupPolicy,
    pub plan: PlanTier,
}

/// CRUD surface for communities.
#[async_trait]
pub trait CommunityStore: Send + Sync {
    /// Inserts a community and returns the stored row.
    async fn create(&self, new: &NewCommunity) -> Result<Community, StoreError>;

    /// Persists updated community attributes by id.
    async fn update(&self, community: &Community) -> Result<(), StoreError>;

    /// Deletes a community, cascading to its membership links and
    /// prayer-request associations. Returns `false` when no row matched.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Community>, StoreError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Community>, StoreError>;

    async fn find_by_short_code(&self, short_code: &str)
        -> Result<Option<Community>, StoreError>;

    /// Public directory, ordered by a whitelisted sort field.
    async fn list_public(
        &self,
        sort_field: SortField,
        sort_dir: SortDir,
        page: PageParams,
    ) -> Result<Vec<Community>, StoreError>;

    /// Communities linked to a user, annotated with the user's role and
    /// status, ordered by name.
    async fn list_for_user(&self, user_id: i64)
        -> Result<Vec<CommunityWithMembership>, StoreError>;
}

/// CRUD surface for membership links.
#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// Creates a link if absent. Returns `false` when a link already
    /// existed; the existing row is never mutated by this call.
    async fn upsert(
        &self,
        community_id: i64,
        user_id: i64,
        role: MemberRole,
        status: LinkStatus,
        code: Option<&str>,
    ) -> Result<bool, StoreError>;

    /// Unconditional status update. The workflow engine is solely
    /// responsible for verifying the transition is legal.
    async fn set_status(
        &self,
        community_id: i64,
        user_id: i64,
        status: LinkStatus,
    ) -> Result<(), StoreError>;

    /// Hard delete. Returns `false` when no link matched.
    async fn delete(&self, community_id: i64, user_id: i64) -> Result<bool, StoreError>;

    /// Fetches a link joined with the subject's profile fields.
    async fn get(
        &self,
        community_id: i64,
        user_id: i64,
    ) -> Result<Option<MembershipLink>, StoreError>;

    /// Roster listing joined with profile fields, ordered by username.
    async fn list_for_community(
        &self,
        community_id: i64,
        filter: StatusFilter,
    ) -> Result<Vec<MembershipLink>, StoreError>;

    /// The role conferred by an `accepted` link; pending links confer none.
    async fn role_for(
        &self,
        community_id: i64,
        user_id: i64,
    ) -> Result<Option<MemberRole>, StoreError>;

    /// Count of accepted links, for admission control.
    async fn count_accepted(&self, community_id: i64) -> Result<i64, StoreError>;
}
