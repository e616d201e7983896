//! Domain services.

pub mod access;
pub mod membership;

pub use access::{
    can_manage_community, can_view_community, can_view_membership_list,
    should_redact_admin_fields,
};
pub use membership::{MembershipError, MembershipService};
