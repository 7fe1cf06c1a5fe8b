pub mod handlers;
pub mod types;

use crate::{
    Result,
    config::Config,
    inference::{HttpInferenceClient, InferenceClient},
    relay::UploadRelay,
    upload::UploadStore,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::info;

pub const ANALYZE_PATH: &str = "/api/audio/analyze";
pub const HEALTH_PATH: &str = "/health";

/// Builds the shared state with the given inference client, preparing the
/// upload directory from `config`.
pub async fn build_state(
    config: &Config,
    client: Arc<dyn InferenceClient>,
) -> Result<handlers::AppState> {
    let uploads = UploadStore::new(&config.server.upload_dir).await?;

    Ok(handlers::AppState {
        relay: UploadRelay::new(client),
        uploads: Arc::new(uploads),
    })
}

pub fn router(app_state: handlers::AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route(ANALYZE_PATH, post(handlers::analyze_emotion))
        .route(HEALTH_PATH, get(handlers::health))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

pub async fn run(config: Config) -> Result<()> {
    // Initialize inference client
    let client = HttpInferenceClient::new(&config.inference)?;
    info!(
        "Forwarding audio to {} (timeout {:?})",
        client.predict_url(),
        client.timeout()
    );

    // Create application state
    let app_state = build_state(&config, Arc::new(client)).await?;
    info!(
        "Storing uploads in {}",
        app_state.uploads.dir().display()
    );

    // Create router
    let app = router(app_state, config.server.max_upload_bytes);

    // Start server
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
