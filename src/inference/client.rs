use super::types::{InferenceFailure, InferencePayload};
use crate::{Result, config::InferenceConfig, upload::{AUDIO_FIELD, TempUpload}};
use async_trait::async_trait;
use reqwest::{StatusCode, header::ACCEPT, multipart};
use std::time::Duration;
use tracing::debug;

pub const PREDICT_PATH: &str = "/predict";

#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Sends the uploaded audio for analysis and returns the service's JSON
    /// payload untouched.
    async fn submit(&self, upload: &TempUpload)
        -> std::result::Result<InferencePayload, InferenceFailure>;
}

pub struct HttpInferenceClient {
    client: reqwest::Client,
    predict_url: String,
    timeout: Duration,
}

impl HttpInferenceClient {
    pub fn new(config: &InferenceConfig) -> Result<Self> {
        let timeout = Duration::from_millis(config.timeout_ms);
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            predict_url: predict_url(&config.base_url),
            timeout,
        })
    }

    pub fn predict_url(&self) -> &str {
        &self.predict_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn classify(&self, error: reqwest::Error) -> InferenceFailure {
        if error.is_timeout() {
            InferenceFailure::Timeout(self.timeout)
        } else {
            InferenceFailure::Transport(error.to_string())
        }
    }
}

#[async_trait]
impl InferenceClient for HttpInferenceClient {
    async fn submit(
        &self,
        upload: &TempUpload,
    ) -> std::result::Result<InferencePayload, InferenceFailure> {
        let file = tokio::fs::File::open(upload.path()).await?;
        let length = file.metadata().await?.len();

        let part = multipart::Part::stream_with_length(reqwest::Body::from(file), length)
            .file_name(upload.display_name());
        let form = multipart::Form::new().part(AUDIO_FIELD, part);

        debug!(
            "Sending {} bytes of audio to {}",
            length, self.predict_url
        );

        let response = self
            .client
            .post(&self.predict_url)
            .header(ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());

            return Err(if status == StatusCode::SERVICE_UNAVAILABLE {
                InferenceFailure::Unavailable { body }
            } else {
                InferenceFailure::Status {
                    status: status.as_u16(),
                    body,
                }
            });
        }

        let bytes = response.bytes().await.map_err(|e| self.classify(e))?;
        let payload: InferencePayload = serde_json::from_slice(&bytes)
            .map_err(|e| InferenceFailure::InvalidPayload(e.to_string()))?;

        debug!("Received inference payload: {}", payload.get());
        Ok(payload)
    }
}

fn predict_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), PREDICT_PATH)
}
