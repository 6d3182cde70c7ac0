//! Error types for Showcase.
//!
//! Uses thiserror for ergonomic error definitions that integrate
//! with axum's response system. Each variant is one error kind of the
//! project lifecycle; the HTTP layer only maps kinds to status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Validation errors
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Field '{field}' is too long: max {max} characters")]
    FieldTooLong { field: &'static str, max: usize },

    #[error("Invalid collaborator set: {0}")]
    InvalidCollaboratorSet(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Resource errors
    #[error("Not found: {0}")]
    NotFound(String),

    // Authorization errors
    #[error("Forbidden: {0}")]
    Forbidden(String),

    // Store errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A failure after a unit of work was opened. The work was rolled back.
    #[error("Transaction failed and was rolled back: {0}")]
    Transaction(String),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn not_found(subject: impl std::fmt::Display, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{} {}", subject, id))
    }

    /// Whether this error was produced by the validation gate or the
    /// authorization policy, as opposed to the store.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingField(_)
                | Self::FieldTooLong { .. }
                | Self::InvalidCollaboratorSet(_)
                | Self::InvalidInput(_)
                | Self::NotFound(_)
                | Self::Forbidden(_)
        )
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            // 403
            Self::Forbidden(_) => StatusCode::FORBIDDEN,

            // 404
            Self::NotFound(_) => StatusCode::NOT_FOUND,

            // 400
            Self::MissingField(_)
            | Self::FieldTooLong { .. }
            | Self::InvalidCollaboratorSet(_)
            | Self::InvalidInput(_) => StatusCode::BAD_REQUEST,

            // 500
            Self::Database(_) | Self::Transaction(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "MISSING_FIELD",
            Self::FieldTooLong { .. } => "FIELD_TOO_LONG",
            Self::InvalidCollaboratorSet(_) => "INVALID_COLLABORATOR_SET",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Database(_) => "REPOSITORY_ERROR",
            Self::Transaction(_) => "TRANSACTION_FAILURE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        // Store failures are logged where they happen; callers only see the kind.
        let message = match &self {
            Self::Database(_) | Self::Transaction(_) | Self::Internal(_) => {
                "Server error".to_string()
            }
            _ => self.to_string(),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

// Convenience conversions
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidInput(format!("JSON parsing error: {}", err))
    }
}
