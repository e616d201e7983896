use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use domain::services::MembershipError;
use domain::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Community is full: {current} of {allowed} members")]
    MembershipFull { current: i64, allowed: i64 },

    #[error("Verification code does not match")]
    CodeMismatch,

    #[error("Membership already accepted")]
    AlreadyAccepted,

    #[error("No invitation to act on")]
    NotInvited,

    #[error("No join request to act on")]
    NotRequested,

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "permission_denied", msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg.clone()),
            ApiError::MembershipFull { current, allowed } => (
                StatusCode::CONFLICT,
                "membership_full",
                format!("Community is full: {} of {} members", current, allowed),
            ),
            ApiError::CodeMismatch => (
                StatusCode::BAD_REQUEST,
                "code_mismatch",
                "Verification code does not match".into(),
            ),
            ApiError::AlreadyAccepted => (
                StatusCode::CONFLICT,
                "already_accepted",
                "Membership has already been accepted".into(),
            ),
            ApiError::NotInvited => (
                StatusCode::BAD_REQUEST,
                "not_invited",
                "No invitation to act on".into(),
            ),
            ApiError::NotRequested => (
                StatusCode::BAD_REQUEST,
                "not_requested",
                "No join request to act on".into(),
            ),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                )
            }
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound("Resource not found".into()),
            StoreError::Conflict => ApiError::Conflict("Resource already exists".into()),
            StoreError::Backend(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<MembershipError> for ApiError {
    fn from(err: MembershipError) -> Self {
        match err {
            MembershipError::CommunityNotFound => {
                ApiError::NotFound("Community not found".into())
            }
            MembershipError::LinkNotFound => {
                ApiError::NotFound("Membership link not found".into())
            }
            MembershipError::PermissionDenied => {
                ApiError::Forbidden("You are not permitted to do that".into())
            }
            MembershipError::AlreadyAccepted => ApiError::AlreadyAccepted,
            MembershipError::NotInvited => ApiError::NotInvited,
            MembershipError::NotRequested => ApiError::NotRequested,
            MembershipError::CodeMismatch => ApiError::CodeMismatch,
            MembershipError::MembershipFull { current, allowed } => {
                ApiError::MembershipFull { current, allowed }
            }
            MembershipError::Storage(err) => err.into(),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let detail = e.message.clone().map(|m| m.to_string()).unwrap_or_default();
                    format!("{}: {}", field, detail)
                })
            })
            .collect();

        ApiError::Validation(messages.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_unauthorized() {
        let error = ApiError::Unauthorized("test message".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_api_error_forbidden() {
        let error = ApiError::Forbidden("access denied".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_api_error_not_found() {
        let error = ApiError::NotFound("resource not found".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_api_error_membership_full() {
        let error = ApiError::MembershipFull {
            current: 50,
            allowed: 50,
        };
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_api_error_code_mismatch() {
        let response = ApiError::CodeMismatch.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_api_error_already_accepted() {
        let response = ApiError::AlreadyAccepted.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_api_error_pending_branch_mismatches() {
        assert_eq!(
            ApiError::NotInvited.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotRequested.into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_from_membership_error() {
        let err: ApiError = MembershipError::CommunityNotFound.into();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err: ApiError = MembershipError::PermissionDenied.into();
        assert!(matches!(err, ApiError::Forbidden(_)));

        let err: ApiError = MembershipError::MembershipFull {
            current: 3,
            allowed: 3,
        }
        .into();
        assert!(matches!(err, ApiError::MembershipFull { .. }));
    }

    #[test]
    fn test_from_store_error() {
        let err: ApiError = StoreError::Conflict.into();
        assert!(matches!(err, ApiError::Conflict(_)));

        let err: ApiError = StoreError::Backend("boom".into()).into();
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[test]
    fn test_api_error_display() {
        assert_eq!(
            format!("{}", ApiError::NotFound("test".to_string())),
            "Not found: test"
        );
        assert_eq!(
            format!(
                "{}",
                ApiError::MembershipFull {
                    current: 50,
                    allowed: 50
                }
            ),
            "Community is full: 50 of 50 members"
        );
    }
}
