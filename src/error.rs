//! Error types and HTTP response conversion
//!
//! Every rejection the service produces flows through [`Error`] and is
//! rendered as a single `{"error": ...}` JSON envelope. Validation errors
//! name the offending field or parameter; infrastructure failures are
//! logged in full and reported with a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using the service error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the service
#[derive(Debug, Error)]
pub enum Error {
    /// A required field is absent or empty in a create payload
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// A field value has the wrong type, is outside its allowed range,
    /// or is not part of the restaurant record
    #[error("Invalid value for field: {0}")]
    InvalidValue(String),

    /// The payload attempts to change the server-assigned id
    #[error("Field 'id' is immutable")]
    ImmutableField,

    /// No restaurant with the requested id
    #[error("Restaurant not found")]
    NotFound,

    /// A required query parameter is absent or empty
    #[error("Missing parameter: {0}")]
    MissingParameter(&'static str),

    /// A query parameter could not be parsed as a number
    #[error("Parameter '{0}' is not a number")]
    ParseFloat(&'static str),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl Error {
    /// HTTP status code this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::MissingField(_)
            | Error::InvalidValue(_)
            | Error::ImmutableField
            | Error::MissingParameter(_)
            | Error::ParseFloat(_) => StatusCode::BAD_REQUEST,
            Error::Config(_) | Error::Database(_) | Error::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// JSON error envelope, the one error shape returned by every endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Internals are logged, never surfaced to the client.
        let message = match &self {
            Error::Database(e) => {
                tracing::error!("Database error: {}", e);
                "Database operation failed".to_string()
            }
            Error::Config(e) => {
                tracing::error!("Configuration error: {}", e);
                "Internal server error".to_string()
            }
            Error::Io(e) => {
                tracing::error!("I/O error: {}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
