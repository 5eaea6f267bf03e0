// Invite lifecycle error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Error types for invite operations
#[derive(Debug, thiserror::Error)]
pub enum InviteError {
    #[error("User with this email already exists")]
    UserAlreadyExists,

    #[error("An active invite already exists for this email")]
    ActiveInviteExists,

    #[error("Invalid invite token")]
    NotFound,

    #[error("Invite has already been used")]
    AlreadyUsed,

    #[error("Invite has expired")]
    Expired,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for InviteError {
    fn from(err: sqlx::Error) -> Self {
        InviteError::DatabaseError(err.to_string())
    }
}

impl InviteError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            InviteError::UserAlreadyExists => StatusCode::CONFLICT,
            InviteError::ActiveInviteExists => StatusCode::CONFLICT,
            InviteError::NotFound => StatusCode::NOT_FOUND,
            InviteError::AlreadyUsed => StatusCode::BAD_REQUEST,
            InviteError::Expired => StatusCode::BAD_REQUEST,
            InviteError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-safe message for this error
    pub fn error_message(&self) -> String {
        match self {
            InviteError::DatabaseError(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for InviteError {
    fn into_response(self) -> Response {
        if let InviteError::DatabaseError(msg) = &self {
            error!("Database error in invites: {}", msg);
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
            InviteError::UserAlreadyExists.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            InviteError::ActiveInviteExists.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(InviteError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            InviteError::AlreadyUsed.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(InviteError::Expired.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_database_errors_have_opaque_messages() {
        let err = InviteError::DatabaseError("relation invites does not exist".to_string());
        assert_eq!(err.error_message(), "Internal server error");
    }
}
