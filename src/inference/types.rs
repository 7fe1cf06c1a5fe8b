use serde_json::value::RawValue;
use std::time::Duration;
use thiserror::Error;

/// Response body of the inference service, checked to be JSON but kept
/// byte for byte as received.
pub type InferencePayload = Box<RawValue>;

/// Why a call to the inference service did not yield a payload.
#[derive(Error, Debug)]
pub enum InferenceFailure {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("service unavailable: {body}")]
    Unavailable { body: String },

    #[error("remote returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to read upload: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid response payload: {0}")]
    InvalidPayload(String),
}
