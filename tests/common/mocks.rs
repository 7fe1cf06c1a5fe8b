use async_trait::async_trait;
use emotion_relay::{
    inference::{InferenceClient, InferenceFailure, InferencePayload},
    upload::TempUpload,
};
use serde_json::{Value, value::RawValue};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the mock inference client answers with.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    Payload(Value),
    /// Exact JSON text, returned without re-encoding.
    Raw(String),
    Timeout,
    Unavailable,
    Status(u16),
    Transport,
}

/// A submitted upload as observed by the mock.
#[derive(Debug, Clone)]
pub struct SeenUpload {
    pub path: PathBuf,
    pub existed: bool,
    pub bytes: Vec<u8>,
}

/// Mock inference client for testing
#[derive(Debug)]
pub struct MockInferenceClient {
    pub outcome: MockOutcome,
    pub seen: Arc<Mutex<Vec<SeenUpload>>>,
}

impl MockInferenceClient {
    pub fn new(outcome: MockOutcome) -> Self {
        Self {
            outcome,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_payload(payload: Value) -> Self {
        Self::new(MockOutcome::Payload(payload))
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn get_seen(&self) -> Vec<SeenUpload> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceClient for MockInferenceClient {
    async fn submit(&self, upload: &TempUpload) -> Result<InferencePayload, InferenceFailure> {
        let path = upload.path().to_path_buf();
        let bytes = std::fs::read(&path).unwrap_or_default();
        self.seen.lock().unwrap().push(SeenUpload {
            existed: path.exists(),
            path,
            bytes,
        });

        match &self.outcome {
            MockOutcome::Payload(payload) => Ok(serde_json::value::to_raw_value(payload).unwrap()),
            MockOutcome::Raw(text) => Ok(RawValue::from_string(text.clone()).unwrap()),
            MockOutcome::Timeout => Err(InferenceFailure::Timeout(Duration::from_secs(60))),
            MockOutcome::Unavailable => Err(InferenceFailure::Unavailable {
                body: "model loading".to_string(),
            }),
            MockOutcome::Status(status) => Err(InferenceFailure::Status {
                status: *status,
                body: "boom".to_string(),
            }),
            MockOutcome::Transport => Err(InferenceFailure::Transport(
                "connection refused".to_string(),
            )),
        }
    }
}
