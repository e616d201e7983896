//! Membership link repository for database operations.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use domain::models::{LinkStatus, MemberRole, MembershipLink, StatusFilter};
use domain::store::{MembershipStore, StoreError};

use crate::entities::membership_link::{LinkStatusDb, MemberRoleDb, MembershipLinkEntity};
use crate::repositories::map_sqlx_error;

/// Repository for membership link database operations.
#[derive(Clone)]
pub struct MembershipLinkRepository {
    pool: PgPool,
}

impl MembershipLinkRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipStore for MembershipLinkRepository {
    async fn upsert(
        &self,
        community_id: i64,
        user_id: i64,
        role: MemberRole,
        status: LinkStatus,
        code: Option<&str>,
    ) -> Result<bool, StoreError> {
        // DO NOTHING keeps an existing link exactly as it was; the caller
        // learns about the collision from the affected-row count.
        let result = sqlx::query(
            r#"
            INSERT INTO membership_links (community_id, user_id, role, status, verification_code)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (community_id, user_id) DO NOTHING
            "#,
        )
        .bind(community_id)
        .bind(user_id)
        .bind(MemberRoleDb::from(role))
        .bind(LinkStatusDb::from(status))
        .bind(code)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let inserted = result.rows_affected() > 0;
        debug!(community_id, user_id, inserted, "membership link upsert");
        Ok(inserted)
    }

    async fn set_status(
        &self,
        community_id: i64,
        user_id: i64,
        status: LinkStatus,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE membership_links
            SET status = $3
            WHERE community_id = $1 AND user_id = $2
            "#,
        )
        .bind(community_id)
        .bind(user_id)
        .bind(LinkStatusDb::from(status))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, community_id: i64, user_id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "DELETE FROM membership_links WHERE community_id = $1 AND user_id = $2",
        )
        .bind(community_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn get(
        &self,
        community_id: i64,
        user_id: i64,
    ) -> Result<Option<MembershipLink>, StoreError> {
        let entity = sqlx::query_as::<_, MembershipLinkEntity>(
            r#"
            SELECT
                l.community_id, l.user_id, l.role, l.status, l.verification_code,
                u.first_name, u.last_name, u.email, u.username
            FROM membership_links l
            JOIN users u ON u.id = l.user_id
            WHERE l.community_id = $1 AND l.user_id = $2
            "#,
        )
        .bind(community_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(entity.map(Into::into))
    }

    async fn list_for_community(
        &self,
        community_id: i64,
        filter: StatusFilter,
    ) -> Result<Vec<MembershipLink>, StoreError> {
        let entities = match filter {
            StatusFilter::All => {
                sqlx::query_as::<_, MembershipLinkEntity>(
                    r#"
                    SELECT
                        l.community_id, l.user_id, l.role, l.status, l.verification_code,
                        u.first_name, u.last_name, u.email, u.username
                    FROM membership_links l
                    JOIN users u ON u.id = l.user_id
                    WHERE l.community_id = $1
                    ORDER BY u.username ASC
                    "#,
                )
                .bind(community_id)
                .fetch_all(&self.pool)
                .await
            }
            StatusFilter::Only(status) => {
                sqlx::query_as::<_, MembershipLinkEntity>(
                    r#"
                    SELECT
                        l.community_id, l.user_id, l.role, l.status, l.verification_code,
                        u.first_name, u.last_name, u.email, u.username
                    FROM membership_links l
                    JOIN users u ON u.id = l.user_id
                    WHERE l.community_id = $1 AND l.status = $2
                    ORDER BY u.username ASC
                    "#,
                )
                .bind(community_id)
                .bind(LinkStatusDb::from(status))
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(map_sqlx_error)?;

        Ok(entities.into_iter().map(Into::into).collect())
    }

    async fn role_for(
        &self,
        community_id: i64,
        user_id: i64,
    ) -> Result<Option<MemberRole>, StoreError> {
        // Only an accepted link confers a role.
        let role = sqlx::query_scalar::<_, MemberRoleDb>(
            r#"
            SELECT role
            FROM membership_links
            WHERE community_id = $1 AND user_id = $2 AND status = 'accepted'
            "#,
        )
        .bind(community_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(role.map(Into::into))
    }

    async fn count_accepted(&self, community_id: i64) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM membership_links
            WHERE community_id = $1 AND status = 'accepted'
            "#,
        )
        .bind(community_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(count)
    }
}
