//! Membership link entity (database row mapping).

use sqlx::FromRow;

/// Database enum for member_role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "member_role", rename_all = "lowercase")]
pub enum MemberRoleDb {
    Admin,
    Member,
}

impl From<MemberRoleDb> for domain::models::MemberRole {
    fn from(db: MemberRoleDb) -> Self {
        match db {
            MemberRoleDb::Admin => Self::Admin,
            MemberRoleDb::Member => Self::Member,
        }
    }
}

impl From<domain::models::MemberRole> for MemberRoleDb {
    fn from(domain: domain::models::MemberRole) -> Self {
        match domain {
            domain::models::MemberRole::Admin => Self::Admin,
            domain::models::MemberRole::Member => Self::Member,
        }
    }
}

/// Database enum for link_status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "link_status", rename_all = "lowercase")]
pub enum LinkStatusDb {
    Invited,
    Requested,
    Accepted,
    Declined,
}

impl From<LinkStatusDb> for domain::models::LinkStatus {
    fn from(db: LinkStatusDb) -> Self {
        match db {
            LinkStatusDb::Invited => Self::Invited,
            LinkStatusDb::Requested => Self::Requested,
            LinkStatusDb::Accepted => Self::Accepted,
            LinkStatusDb::Declined => Self::Declined,
        }
    }
}

impl From<domain::models::LinkStatus> for LinkStatusDb {
    fn from(domain: domain::models::LinkStatus) -> Self {
        match domain {
            domain::models::LinkStatus::Invited => Self::Invited,
            domain::models::LinkStatus::Requested => Self::Requested,
            domain::models::LinkStatus::Accepted => Self::Accepted,
            domain::models::LinkStatus::Declined => Self::Declined,
        }
    }
}

/// Membership link joined with the subject's profile fields.
#[derive(Debug, Clone, FromRow)]
pub struct MembershipLinkEntity {
    pub community_id: i64,
    pub user_id: i64,
    pub role: MemberRoleDb,
    pub status: LinkStatusDb,
    pub verification_code: Option<String>,
    // User details
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
}

impl From<MembershipLinkEntity> for domain::models::MembershipLink {
    fn from(entity: MembershipLinkEntity) -> Self {
        Self {
            community_id: entity.community_id,
            user_id: entity.user_id,
            role: entity.role.into(),
            status: entity.status.into(),
            verification_code: entity.verification_code,
            first_name: entity.first_name,
            last_name: entity.last_name,
            email: entity.email,
            username: entity.username,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_conversion() {
        assert_eq!(
            domain::models::MemberRole::from(MemberRoleDb::Admin),
            domain::models::MemberRole::Admin
        );
        assert_eq!(
            MemberRoleDb::from(domain::models::MemberRole::Member),
            MemberRoleDb::Member
        );
    }

    #[test]
    fn test_status_conversion() {
        for (db, dom) in [
            (LinkStatusDb::Invited, domain::models::LinkStatus::Invited),
            (LinkStatusDb::Requested, domain::models::LinkStatus::Requested),
            (LinkStatusDb::Accepted, domain::models::LinkStatus::Accepted),
            (LinkStatusDb::Declined, domain::models::LinkStatus::Declined),
        ] {
            assert_eq!(domain::models::LinkStatus::from(db), dom);
            assert_eq!(LinkStatusDb::from(dom), db);
        }
    }
}
