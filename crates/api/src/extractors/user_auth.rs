//! User JWT authentication extractor.
//!
//! Provides an Axum extractor for the caller identity established by the
//! authentication middleware, with a direct-validation fallback for routes
//! mounted without it.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use shared::jwt::PlatformRole;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::user_auth::UserAuth as UserAuthData;

/// Authenticated user information from JWT.
#[derive(Debug, Clone)]
pub struct UserAuth {
    /// Numeric user ID from the JWT subject claim.
    pub user_id: i64,
    /// Platform-wide role of the caller.
    pub platform_role: PlatformRole,
    /// JWT ID (jti) for session tracking.
    pub jti: String,
}

impl From<UserAuthData> for UserAuth {
    fn from(data: UserAuthData) -> Self {
        Self {
            user_id: data.user_id,
            platform_role: data.platform_role,
            jti: data.jti,
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for UserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Auth info inserted by middleware wins.
        if let Some(auth) = parts.extensions.get::<UserAuthData>() {
            return Ok(auth.clone().into());
        }

        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

        if !auth_header.starts_with("Bearer ") {
            return Err(ApiError::Unauthorized(
                "Invalid Authorization header format".to_string(),
            ));
        }

        let token = &auth_header[7..];

        let jwt_config =
            UserAuthData::create_jwt_config(&state.config.jwt).map_err(ApiError::Internal)?;

        let auth_data = UserAuthData::validate(&jwt_config, token)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

        Ok(auth_data.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_auth_from_data() {
        let data = UserAuthData {
            user_id: 42,
            platform_role: PlatformRole::Admin,
            jti: "test_jti".to_string(),
        };
        let auth: UserAuth = data.into();
        assert_eq!(auth.user_id, 42);
        assert_eq!(auth.platform_role, PlatformRole::Admin);
        assert_eq!(auth.jti, "test_jti");
    }

    #[test]
    fn test_user_auth_clone() {
        let auth = UserAuth {
            user_id: 7,
            platform_role: PlatformRole::User,
            jti: "test_jti".to_string(),
        };
        let cloned = auth.clone();
        assert_eq!(auth.user_id, cloned.user_id);
        assert_eq!(auth.jti, cloned.jti);
    }
}
