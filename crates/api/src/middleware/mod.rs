//! API middleware.

pub mod logging;
pub mod request_id;
pub mod user_auth;

pub use request_id::request_id;
pub use user_auth::require_user_auth;
