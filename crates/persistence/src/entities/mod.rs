//! Database entity definitions.

pub mod community;
pub mod membership_link;
