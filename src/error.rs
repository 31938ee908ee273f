/// Unified error types for the clinic server
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Main error type
#[derive(Error, Debug)]
pub enum ClinicError {
    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Validation errors (missing field, bad input, business-rule rejection)
    #[error("{0}")]
    Validation(String),

    /// Not found errors
    #[error("{0}")]
    NotFound(String),

    /// Mail composition/transport errors
    #[error("Mail error: {0}")]
    Mail(String),

    /// PDF rendering errors
    #[error("PDF error: {0}")]
    Pdf(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Plain-text HTTP responses, used by the PDF download path.
/// JSON endpoints translate errors into the envelope at the handler
/// boundary instead of going through this impl.
impl IntoResponse for ClinicError {
    fn into_response(self) -> Response {
        match self {
            ClinicError::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error: {}", other),
            )
                .into_response(),
        }
    }
}

/// Result type alias for clinic operations
pub type ClinicResult<T> = Result<T, ClinicError>;
