use crate::{inference::InferenceFailure, server::types::ErrorResponse};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Failures reported to the uploader. The display text is the client-facing
/// message.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayError {
    #[error("No audio file uploaded")]
    MissingFile,

    #[error("Invalid audio upload")]
    InvalidUpload,

    #[error("Failed to store uploaded audio")]
    Storage,

    #[error("Request timeout. Please try again.")]
    Timeout,

    #[error("ML service temporarily unavailable. Please try again later.")]
    Unavailable,

    #[error("Failed to get emotion analysis")]
    Upstream,
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingFile | Self::InvalidUpload => StatusCode::BAD_REQUEST,
            Self::Timeout => StatusCode::REQUEST_TIMEOUT,
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Storage | Self::Upstream => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<InferenceFailure> for RelayError {
    fn from(failure: InferenceFailure) -> Self {
        match failure {
            InferenceFailure::Timeout(_) => Self::Timeout,
            InferenceFailure::Unavailable { .. } => Self::Unavailable,
            InferenceFailure::Status { .. }
            | InferenceFailure::Transport(_)
            | InferenceFailure::Io(_)
            | InferenceFailure::InvalidPayload(_) => Self::Upstream,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
