//! Community repository for database operations.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use domain::models::{Community, CommunityWithMembership, SortDir, SortField};
use domain::store::{CommunityStore, NewCommunity, StoreError};
use shared::pagination::PageParams;

use crate::entities::community::{
    CommunityEntity, CommunityWithMembershipEntity, PlanTierDb, PrivacyDb, SignupPolicyDb,
};
use crate::repositories::map_sqlx_error;

/// Repository for community database operations.
#[derive(Clone)]
pub struct CommunityRepository {
    pool: PgPool,
}

impl CommunityRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommunityStore for CommunityRepository {
    async fn create(&self, new: &NewCommunity) -> Result<Community, StoreError> {
        let entity = sqlx::query_as::<_, CommunityEntity>(
            r#"
            WITH inserted AS (
                INSERT INTO communities (name, description, short_code, join_code, privacy, signup_policy, plan)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING id, name, description, short_code, join_code, created, privacy,
                          signup_policy, plan, plan_paid_through, plan_discount_percent,
                          stripe_subscription_id
            )
            SELECT
                i.*,
                0::BIGINT AS member_count,
                0::BIGINT AS request_count
            FROM inserted i
            "#,
        )
        .bind(&new.name)
        .bind(&new.description)
        .bind(&new.short_code)
        .bind(&new.join_code)
        .bind(PrivacyDb::from(new.privacy))
        .bind(SignupPolicyDb::from(new.signup_policy))
        .bind(PlanTierDb::from(new.plan))
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        debug!(community_id = entity.id, "community created");
        Ok(entity.into())
    }

    async fn update(&self, community: &Community) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE communities
            SET name = $2,
                description = $3,
                join_code = $4,
                privacy = $5,
                signup_policy = $6,
                plan = $7,
                plan_paid_through = $8,
                plan_discount_percent = $9,
                stripe_subscription_id = $10
            WHERE id = $1
            "#,
        )
        .bind(community.id)
        .bind(&community.name)
        .bind(&community.description)
        .bind(&community.join_code)
        .bind(PrivacyDb::from(community.privacy))
        .bind(SignupPolicyDb::from(community.signup_policy))
        .bind(PlanTierDb::from(community.plan))
        .bind(community.plan_paid_through)
        .bind(community.plan_discount_percent)
        .bind(&community.stripe_subscription_id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        // Links and prayer-request associations go with the row via
        // ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM communities WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Community>, StoreError> {
        let entity = sqlx::query_as::<_, CommunityEntity>(
            r#"
            SELECT
                c.id, c.name, c.description, c.short_code, c.join_code, c.created,
                c.privacy, c.signup_policy, c.plan, c.plan_paid_through,
                c.plan_discount_percent, c.stripe_subscription_id,
                (SELECT COUNT(*) FROM membership_links ml
                 WHERE ml.community_id = c.id AND ml.status = 'accepted') AS member_count,
                (SELECT COUNT(*) FROM prayer_request_community_links pr
                 WHERE pr.community_id = c.id) AS request_count
            FROM communities c
            WHERE c.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(entity.map(Into::into))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Community>, StoreError> {
        let entity = sqlx::query_as::<_, CommunityEntity>(
            r#"
            SELECT
                c.id, c.name, c.description, c.short_code, c.join_code, c.created,
                c.privacy, c.signup_policy, c.plan, c.plan_paid_through,
                c.plan_discount_percent, c.stripe_subscription_id,
                (SELECT COUNT(*) FROM membership_links ml
                 WHERE ml.community_id = c.id AND ml.status = 'accepted') AS member_count,
                (SELECT COUNT(*) FROM prayer_request_community_links pr
                 WHERE pr.community_id = c.id) AS request_count
            FROM communities c
            WHERE c.name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(entity.map(Into::into))
    }

    async fn find_by_short_code(
        &self,
        short_code: &str,
    ) -> Result<Option<Community>, StoreError> {
        let entity = sqlx::query_as::<_, CommunityEntity>(
            r#"
            SELECT
                c.id, c.name, c.description, c.short_code, c.join_code, c.created,
                c.privacy, c.signup_policy, c.plan, c.plan_paid_through,
                c.plan_discount_percent, c.stripe_subscription_id,
                (SELECT COUNT(*) FROM membership_links ml
                 WHERE ml.community_id = c.id AND ml.status = 'accepted') AS member_count,
                (SELECT COUNT(*) FROM prayer_request_community_links pr
                 WHERE pr.community_id = c.id) AS request_count
            FROM communities c
            WHERE c.short_code = $1
            "#,
        )
        .bind(short_code)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(entity.map(Into::into))
    }

    async fn list_public(
        &self,
        sort_field: SortField,
        sort_dir: SortDir,
        page: PageParams,
    ) -> Result<Vec<Community>, StoreError> {
        // Sort inputs come from closed enums, never from raw user text.
        let query = format!(
            r#"
            SELECT
                c.id, c.name, c.description, c.short_code, c.join_code, c.created,
                c.privacy, c.signup_policy, c.plan, c.plan_paid_through,
                c.plan_discount_percent, c.stripe_subscription_id,
                (SELECT COUNT(*) FROM membership_links ml
                 WHERE ml.community_id = c.id AND ml.status = 'accepted') AS member_count,
                (SELECT COUNT(*) FROM prayer_request_community_links pr
                 WHERE pr.community_id = c.id) AS request_count
            FROM communities c
            WHERE c.privacy = 'public'
            ORDER BY c.{} {}
            LIMIT $1 OFFSET $2
            "#,
            sort_field.as_column(),
            sort_dir.as_sql(),
        );

        let entities = sqlx::query_as::<_, CommunityEntity>(&query)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(entities.into_iter().map(Into::into).collect())
    }

    async fn list_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<CommunityWithMembership>, StoreError> {
        let entities = sqlx::query_as::<_, CommunityWithMembershipEntity>(
            r#"
            SELECT
                c.id, c.name, c.description, c.short_code, c.join_code, c.created,
                c.privacy, c.signup_policy, c.plan, c.plan_paid_through,
                c.plan_discount_percent, c.stripe_subscription_id,
                (SELECT COUNT(*) FROM membership_links ml
                 WHERE ml.community_id = c.id AND ml.status = 'accepted') AS member_count,
                (SELECT COUNT(*) FROM prayer_request_community_links pr
                 WHERE pr.community_id = c.id) AS request_count,
                l.role AS user_role,
                l.status AS user_status
            FROM communities c
            JOIN membership_links l ON l.community_id = c.id
            WHERE l.user_id = $1
            ORDER BY c.name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(entities.into_iter().map(Into::into).collect())
    }
}
