use salvo::http::StatusCode;
use serde::Serialize;
use thiserror::Error;

use chapel_service::error::ServiceError;

/// Application-level errors (HTTP layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ServiceError(#[from] ServiceError),

    #[error(transparent)]
    CoreError(#[from] chapel_core::error::CoreError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// ## Summary
    /// HTTP status this error is reported with.
    ///
    /// Invalid stored recurrence rules are data corruption, so they map to 500.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::ServiceError(ServiceError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::ServiceError(_) | Self::CoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// ## Summary
    /// Message safe to show to site visitors.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::BadRequest(message) => message.clone(),
            Self::ServiceError(ServiceError::NotFound(what)) => format!("Not found: {what}"),
            Self::ServiceError(_) | Self::CoreError(_) => "Internal server error".to_string(),
        }
    }
}

/// ## Summary
/// Error response payload
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        Self {
            error: err.public_message(),
        }
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;
