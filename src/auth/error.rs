// Authentication and authorization error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

use crate::auth::models::Role;

/// Authentication and authorization error types
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Covers both "no such account" and "wrong password" so responses
    /// cannot be used to enumerate accounts.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account is deactivated")]
    AccountDeactivated,

    #[error("Missing authentication token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Email already exists")]
    EmailAlreadyExists,

    /// Authorize ran without a preceding authenticate step
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Authenticated but the role is not in the allowed set
    #[error("Insufficient permissions")]
    InsufficientPermissions { role: Role },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Password hashing error")]
    PasswordHashError,

    #[error("Token generation error: {0}")]
    TokenGenerationError(String),

    /// Invite validation/consumption failure during registration,
    /// propagated unchanged so its status survives
    #[error(transparent)]
    Invite(#[from] crate::invites::error::InviteError),
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::DatabaseError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AuthError {
    fn from(err: validator::ValidationErrors) -> Self {
        AuthError::ValidationError(err.to_string())
    }
}

impl AuthError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::AccountDeactivated => StatusCode::FORBIDDEN,
            AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::ExpiredToken => StatusCode::UNAUTHORIZED,
            AuthError::EmailAlreadyExists => StatusCode::CONFLICT,
            AuthError::NotAuthenticated => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientPermissions { .. } => StatusCode::FORBIDDEN,
            AuthError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AuthError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::PasswordHashError => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::TokenGenerationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::Invite(inner) => inner.status_code(),
        }
    }

    /// Client-safe message for this error (no internal details)
    pub fn error_message(&self) -> String {
        match self {
            AuthError::DatabaseError(_)
            | AuthError::PasswordHashError
            | AuthError::TokenGenerationError(_) => "Internal server error".to_string(),
            AuthError::InsufficientPermissions { .. } => {
                "Insufficient permissions".to_string()
            }
            AuthError::Invite(inner) => inner.error_message(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::MissingToken => warn!("Missing token in request"),
            AuthError::InvalidToken => warn!("Invalid token attempt"),
            AuthError::ExpiredToken => warn!("Expired token attempt"),
            AuthError::InsufficientPermissions { role } => {
                warn!("Authorization denied for role '{}'", role)
            }
            AuthError::DatabaseError(msg) => error!("Database error in auth: {}", msg),
            AuthError::PasswordHashError => error!("Password hashing error"),
            AuthError::TokenGenerationError(msg) => error!("Token generation error: {}", msg),
            _ => {}
        }

        let body = Json(json!({
            "error": self.error_message(),
        }));

        (self.status_code(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_the_taxonomy() {
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::AccountDeactivated.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AuthError::EmailAlreadyExists.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AuthError::InsufficientPermissions { role: Role::Staff }.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AuthError::NotAuthenticated.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::ExpiredToken.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_internal_errors_have_opaque_messages() {
        let err = AuthError::DatabaseError("connection refused at 10.0.0.3".to_string());
        assert_eq!(err.error_message(), "Internal server error");

        let err = AuthError::TokenGenerationError("bad key".to_string());
        assert_eq!(err.error_message(), "Internal server error");
    }

    #[test]
    fn test_wrapped_invite_errors_keep_their_status() {
        use crate::invites::error::InviteError;

        let err: AuthError = InviteError::AlreadyUsed.into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_message(), "Invite has already been used");

        let err: AuthError = InviteError::NotFound.into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_credential_failure_message_does_not_leak_existence() {
        // Same message regardless of whether the email exists
        assert_eq!(
            AuthError::InvalidCredentials.error_message(),
            "Invalid email or password"
        );
    }
}
