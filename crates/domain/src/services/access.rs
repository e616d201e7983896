//! Authorization predicates over a viewer's effective role.
//!
//! The effective role is the role conferred by an `accepted` link, or
//! `None` for non-members and users whose link is still pending. Every
//! access decision for community resources funnels through these
//! predicates so the rules live in one place.

use crate::models::{MemberRole, Privacy};

/// Whether a viewer may see a community's detail at all.
///
/// Public communities are visible to everyone; private ones only to
/// accepted members.
pub fn can_view_community(privacy: Privacy, role: Option<MemberRole>) -> bool {
    match privacy {
        Privacy::Public => true,
        Privacy::Private => role.is_some(),
    }
}

/// Whether a viewer may mutate the community or its membership list.
pub fn can_manage_community(role: Option<MemberRole>) -> bool {
    role == Some(MemberRole::Admin)
}

/// Whether a viewer may list the community's members. Any accepted
/// member qualifies; the roster is redacted separately for non-admins.
pub fn can_view_membership_list(role: Option<MemberRole>) -> bool {
    role.is_some()
}

/// Whether admin-only fields (join code, signup policy, billing) must be
/// stripped from a community view before it reaches this viewer.
pub fn should_redact_admin_fields(role: Option<MemberRole>) -> bool {
    !can_manage_community(role)
}
