//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::password::{PasswordHashError, PasswordPolicyError};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// No session, or the token did not verify
    #[error("Unauthorized")]
    Unauthenticated,

    /// Valid session, insufficient role
    #[error("Forbidden")]
    Forbidden,

    /// Login failure. Same text for unknown account and wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Malformed input
    #[error("{message}")]
    Validation { field: &'static str, message: String },

    /// Password does not meet the policy
    #[error("{0}")]
    PasswordPolicy(String),

    /// Reset token unknown or already consumed
    #[error("Invalid or unknown reset token")]
    InvalidToken,

    /// Reset token past its expiry
    #[error("Reset token has expired")]
    ExpiredToken,

    /// Target of an admin action does not exist
    #[error("User not found")]
    UserNotFound,

    /// Sign-up conflict on email
    #[error("Email is already registered")]
    EmailTaken,

    /// Sign-up conflict on user name
    #[error("Username is already taken")]
    UsernameTaken,

    /// Missing or unusable signing secret
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        AuthError::Validation {
            field,
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Unauthenticated | AuthError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::Validation { .. }
            | AuthError::PasswordPolicy(_)
            | AuthError::InvalidToken
            | AuthError::ExpiredToken
            | AuthError::EmailTaken
            | AuthError::UsernameTaken => StatusCode::BAD_REQUEST,
            AuthError::Configuration(_) | AuthError::Database(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Unauthenticated | AuthError::InvalidCredentials => ErrorKind::Unauthorized,
            AuthError::Forbidden => ErrorKind::Forbidden,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::Validation { .. }
            | AuthError::PasswordPolicy(_)
            | AuthError::InvalidToken
            | AuthError::ExpiredToken
            | AuthError::EmailTaken
            | AuthError::UsernameTaken => ErrorKind::BadRequest,
            AuthError::Configuration(_) | AuthError::Database(_) | AuthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.to_string());
        match self {
            AuthError::Validation { field, .. } => err.with_field(*field),
            AuthError::PasswordPolicy(_) => err.with_field("password"),
            AuthError::EmailTaken => err.with_field("email"),
            AuthError::UsernameTaken => err.with_field("username"),
            AuthError::ExpiredToken => err.with_action("Request a new password reset link"),
            _ => err,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::Configuration(msg) => {
                tracing::error!(message = %msg, "Auth misconfigured");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::InvalidToken => {
                tracing::warn!("Password reset with unknown token");
            }
            AuthError::ExpiredToken => {
                tracing::warn!("Password reset with expired token");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<PasswordPolicyError> for AuthError {
    fn from(err: PasswordPolicyError) -> Self {
        AuthError::PasswordPolicy(err.to_string())
    }
}

impl From<PasswordHashError> for AuthError {
    fn from(err: PasswordHashError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::Unauthenticated.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AuthError::InvalidToken.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AuthError::ExpiredToken.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AuthError::EmailTaken.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AuthError::Configuration("no secret".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_status_code_agrees_with_kind() {
        let errors = [
            AuthError::Unauthenticated,
            AuthError::Forbidden,
            AuthError::InvalidCredentials,
            AuthError::validation("email", "Invalid email format"),
            AuthError::PasswordPolicy("too short".into()),
            AuthError::InvalidToken,
            AuthError::ExpiredToken,
            AuthError::EmailTaken,
            AuthError::UsernameTaken,
            AuthError::UserNotFound,
            AuthError::Internal("x".into()),
        ];
        for err in errors {
            assert_eq!(err.status_code().as_u16(), err.kind().status_code());
        }
    }

    #[test]
    fn test_duplicate_identifiers_are_distinguishable() {
        let email = AuthError::EmailTaken.to_app_error();
        let username = AuthError::UsernameTaken.to_app_error();
        assert_ne!(email.message(), username.message());
        assert_eq!(email.field(), Some("email"));
        assert_eq!(username.field(), Some("username"));
    }

    #[test]
    fn test_internal_detail_not_public() {
        let err = AuthError::Internal("pool exhausted on shard 3".into()).to_app_error();
        assert!(!err.public_message().contains("shard"));
    }

    #[test]
    fn test_policy_error_conversion() {
        let err: AuthError = PasswordPolicyError::MissingDigit.into();
        assert!(matches!(err, AuthError::PasswordPolicy(ref m) if m.contains("digit")));
    }
}
