//! Domain layer for the Communitas backend.
//!
//! This crate contains:
//! - Domain models (Community, MembershipLink, plan quotas)
//! - The membership workflow engine and authorization gate
//! - Store traits implemented by the persistence layer

pub mod models;
pub mod services;
pub mod store;
