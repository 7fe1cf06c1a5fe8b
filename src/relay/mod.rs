mod error;

pub use error::RelayError;

use crate::{
    inference::{InferenceClient, InferencePayload},
    upload::TempUpload,
};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Forwards one uploaded audio file to the inference service.
#[derive(Clone)]
pub struct UploadRelay {
    client: Arc<dyn InferenceClient>,
}

impl UploadRelay {
    pub fn new(client: Arc<dyn InferenceClient>) -> Self {
        Self { client }
    }

    /// Takes ownership of the upload so the file is deleted before this call
    /// returns, whatever the outcome. If the future is dropped mid-flight the
    /// guard's `Drop` removes the file instead.
    pub async fn relay(
        &self,
        upload: Option<TempUpload>,
    ) -> Result<InferencePayload, RelayError> {
        let Some(upload) = upload else {
            warn!("No audio file uploaded");
            return Err(RelayError::MissingFile);
        };

        info!(
            "Sending audio file {} to inference service",
            upload.path().display()
        );

        let outcome = match self.client.submit(&upload).await {
            Ok(payload) => {
                info!("Inference service responded for {}", upload.display_name());
                Ok(payload)
            }
            Err(failure) => {
                error!("Error communicating with inference service: {}", failure);
                Err(failure.into())
            }
        };

        upload.cleanup().await;
        outcome
    }
}
