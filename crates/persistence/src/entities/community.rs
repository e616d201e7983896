//! Community entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

use crate::entities::membership_link::{LinkStatusDb, MemberRoleDb};

/// Database enum for community_privacy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "community_privacy", rename_all = "lowercase")]
pub enum PrivacyDb {
    Public,
    Private,
}

impl From<PrivacyDb> for domain::models::Privacy {
    fn from(db: PrivacyDb) -> Self {
        match db {
            PrivacyDb::Public => Self::Public,
            PrivacyDb::Private => Self::Private,
        }
    }
}

impl From<domain::models::Privacy> for PrivacyDb {
    fn from(domain: domain::models::Privacy) -> Self {
        match domain {
            domain::models::Privacy::Public => Self::Public,
            domain::models::Privacy::Private => Self::Private,
        }
    }
}

/// Database enum for community_signup_policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "community_signup_policy", rename_all = "snake_case")]
pub enum SignupPolicyDb {
    None,
    JoinCode,
    ApprovalRequired,
    AutoAccept,
}

impl From<SignupPolicyDb> for domain::models::SignupPolicy {
    fn from(db: SignupPolicyDb) -> Self {
        match db {
            SignupPolicyDb::None => Self::None,
            SignupPolicyDb::JoinCode => Self::JoinCode,
            SignupPolicyDb::ApprovalRequired => Self::ApprovalRequired,
            SignupPolicyDb::AutoAccept => Self::AutoAccept,
        }
    }
}

impl From<domain::models::SignupPolicy> for SignupPolicyDb {
    fn from(domain: domain::models::SignupPolicy) -> Self {
        match domain {
            domain::models::SignupPolicy::None => Self::None,
            domain::models::SignupPolicy::JoinCode => Self::JoinCode,
            domain::models::SignupPolicy::ApprovalRequired => Self::ApprovalRequired,
            domain::models::SignupPolicy::AutoAccept => Self::AutoAccept,
        }
    }
}

/// Database enum for plan_tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "plan_tier", rename_all = "lowercase")]
pub enum PlanTierDb {
    Free,
    Basic,
    Pro,
}

impl From<PlanTierDb> for domain::models::PlanTier {
    fn from(db: PlanTierDb) -> Self {
        match db {
            PlanTierDb::Free => Self::Free,
            PlanTierDb::Basic => Self::Basic,
            PlanTierDb::Pro => Self::Pro,
        }
    }
}

impl From<domain::models::PlanTier> for PlanTierDb {
    fn from(domain: domain::models::PlanTier) -> Self {
        match domain {
            domain::models::PlanTier::Free => Self::Free,
            domain::models::PlanTier::Basic => Self::Basic,
            domain::models::PlanTier::Pro => Self::Pro,
        }
    }
}

/// Database row mapping for the communities table.
///
/// `member_count` and `request_count` are computed per query from the
/// link tables, not stored.
#[derive(Debug, Clone, FromRow)]
pub struct CommunityEntity {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub short_code: String,
    pub join_code: Option<String>,
    pub created: DateTime<Utc>,
    pub privacy: PrivacyDb,
    pub signup_policy: SignupPolicyDb,
    pub plan: PlanTierDb,
    pub plan_paid_through: Option<NaiveDate>,
    pub plan_discount_percent: i64,
    pub stripe_subscription_id: Option<String>,
    pub member_count: i64,
    pub request_count: i64,
}

impl From<CommunityEntity> for domain::models::Community {
    fn from(entity: CommunityEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            description: entity.description,
            short_code: entity.short_code,
            join_code: entity.join_code,
            created: entity.created,
            privacy: entity.privacy.into(),
            signup_policy: entity.signup_policy.into(),
            plan: entity.plan.into(),
            plan_paid_through: entity.plan_paid_through,
            plan_discount_percent: entity.plan_discount_percent,
            stripe_subscription_id: entity.stripe_subscription_id,
            member_count: entity.member_count,
            request_count: entity.request_count,
        }
    }
}

/// Community row annotated with the requesting user's link, for the
/// "my communities" listing.
#[derive(Debug, Clone, FromRow)]
pub struct CommunityWithMembershipEntity {
    #[sqlx(flatten)]
    pub community: CommunityEntity,
    pub user_role: MemberRoleDb,
    pub user_status: LinkStatusDb,
}

impl From<CommunityWithMembershipEntity> for domain::models::CommunityWithMembership {
    fn from(entity: CommunityWithMembershipEntity) -> Self {
        Self {
            community: entity.community.into(),
            user_role: entity.user_role.into(),
            user_status: entity.user_status.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_privacy_conversion() {
        assert_eq!(
            domain::models::Privacy::from(PrivacyDb::Public),
            domain::models::Privacy::Public
        );
        assert_eq!(
            PrivacyDb::from(domain::models::Privacy::Private),
            PrivacyDb::Private
        );
    }

    #[test]
    fn test_plan_conversion() {
        for (db, dom) in [
            (PlanTierDb::Free, domain::models::PlanTier::Free),
            (PlanTierDb::Basic, domain::models::PlanTier::Basic),
            (PlanTierDb::Pro, domain::models::PlanTier::Pro),
        ] {
            assert_eq!(domain::models::PlanTier::from(db), dom);
            assert_eq!(PlanTierDb::from(dom), db);
        }
    }
}
