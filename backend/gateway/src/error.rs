//! Mapping of upload failures onto HTTP responses.

use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use exfil_sink_core::SinkError;
use thiserror::Error;

use crate::upload::MISSING_LENGTH_MESSAGE;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error("unsupported method {0}")]
    UnsupportedMethod(Method),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Sink(SinkError::Storage { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Sink(_) => StatusCode::BAD_REQUEST,
            ApiError::UnsupportedMethod(_) => StatusCode::NOT_IMPLEMENTED,
        }
    }

    /// Fixed plain-text body returned to the caller.
    pub fn message(&self) -> &'static str {
        match self {
            ApiError::Sink(SinkError::MissingContentLength) => MISSING_LENGTH_MESSAGE,
            ApiError::Sink(SinkError::InvalidContentLength(_)) => "Invalid Content-Length header.",
            ApiError::Sink(SinkError::InvalidFilename) => "Invalid filename header.",
            ApiError::Sink(SinkError::IncompleteBody { .. }) => "Incomplete request body.",
            ApiError::Sink(SinkError::Storage { .. }) => "Failed to store uploaded file.",
            ApiError::UnsupportedMethod(_) => "Unsupported method.",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Sink(err) if !err.is_client_error() => {
                tracing::error!(error = %self, "Upload failed");
            }
            _ => {
                tracing::debug!(error = %self, "Rejected upload");
            }
        }

        (self.status_code(), self.message()).into_response()
    }
}
