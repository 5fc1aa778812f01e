//! Error types for bpui-server
//!
//! Validation problems are not errors: they re-render the form. Everything
//! here ends the request with a status code and a plain-text message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400), e.g. a non-numeric ID or unparseable form
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Template rendering failed (500)
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// Storage backend error
    #[error(transparent)]
    Source(#[from] bpui_common::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Source(err) => match err {
                bpui_common::Error::NotFound(_) => StatusCode::NOT_FOUND,
                bpui_common::Error::InvalidEntry(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        error!("{} ({})", message, status);

        (status, message).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
