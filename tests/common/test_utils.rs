use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, header::CONTENT_TYPE},
};
use emotion_relay::{
    config::{Config, InferenceConfig, LogsConfig, ServerConfig},
    inference::InferenceClient,
    server::{self, ANALYZE_PATH},
    upload::TempUpload,
};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

pub const BOUNDARY: &str = "emotion-relay-test-boundary";

/// Create a test configuration storing uploads under `upload_dir`
pub fn create_test_config(upload_dir: &Path, base_url: &str) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            logs: LogsConfig {
                level: "debug".to_string(),
            },
            upload_dir: upload_dir.to_path_buf(),
            max_upload_bytes: 1024 * 1024,
        },
        inference: InferenceConfig {
            base_url: base_url.to_string(),
            timeout_ms: 60_000,
        },
    }
}

/// Router backed by `client`, with its own upload directory
pub async fn create_test_app(client: Arc<dyn InferenceClient>) -> (Router, TempDir) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let config = create_test_config(temp_dir.path(), "http://127.0.0.1:9");
    let app = create_app_with_config(&config, client).await;
    (app, temp_dir)
}

pub async fn create_app_with_config(config: &Config, client: Arc<dyn InferenceClient>) -> Router {
    let state = server::build_state(config, client)
        .await
        .expect("Failed to build app state");
    server::router(state, config.server.max_upload_bytes)
}

/// Encode a multipart body with a single file field
pub fn multipart_body(field: &str, file_name: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: audio/wav\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn upload_request(field: &str, file_name: &str, bytes: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(ANALYZE_PATH)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(field, file_name, bytes)))
        .unwrap()
}

pub fn empty_multipart_request() -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(ANALYZE_PATH)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(format!("--{}--\r\n", BOUNDARY)))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Number of entries left in a directory
pub fn dir_entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

/// Write `bytes` into `dir/name` and wrap the file in an upload guard
pub fn create_upload(dir: &TempDir, name: &str, bytes: &[u8]) -> TempUpload {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    TempUpload::new(path, Some(name.to_string()))
}

pub fn sample_wav() -> Vec<u8> {
    let mut bytes = b"RIFF\x24\x00\x00\x00WAVEfmt ".to_vec();
    bytes.extend_from_slice(&[0u8; 32]);
    bytes
}
