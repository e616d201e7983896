//! API route handlers.

pub mod communities;
pub mod health;
pub mod memberships;
