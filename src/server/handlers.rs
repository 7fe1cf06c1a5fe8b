use super::types::HealthResponse;
use crate::{
    Error,
    inference::InferencePayload,
    relay::{RelayError, UploadRelay},
    upload::UploadStore,
};
use axum::{
    extract::{Multipart, State, multipart::MultipartRejection},
    response::Json,
};
use std::sync::Arc;
use tracing::{debug, error, warn};

#[derive(Clone)]
pub struct AppState {
    pub relay: UploadRelay,
    pub uploads: Arc<UploadStore>,
}

pub async fn analyze_emotion(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<InferencePayload>, RelayError> {
    let upload = match multipart {
        Ok(mut multipart) => match state.uploads.spool(&mut multipart).await {
            Ok(upload) => upload,
            Err(Error::Upload(e)) => {
                warn!("Rejected audio upload: {}", e);
                return Err(RelayError::InvalidUpload);
            }
            Err(e) => {
                error!("Failed to store uploaded audio: {}", e);
                return Err(RelayError::Storage);
            }
        },
        Err(rejection) => {
            debug!("Request is not a multipart upload: {}", rejection);
            None
        }
    };

    state.relay.relay(upload).await.map(Json)
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
