use anyhow::Result;
use emotion_relay::{config, server};
use tracing::info;

/// Validates a level or `EnvFilter` directive string
fn validate_log_level(level: &str) -> Result<()> {
    tracing_subscriber::EnvFilter::try_new(level).map_err(|e| {
        anyhow::anyhow!(
            "Invalid log level: '{}' ({}). Use a level (error, warn, info, debug, trace) or filter directives",
            level,
            e
        )
    })?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (before logging setup)
    let config = match config::load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Determine log level: environment variable overrides config
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| config.server.logs.level.clone());

    if let Err(e) = validate_log_level(&log_level) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&log_level))
        .json()
        .init();

    info!("Starting emotion relay with log level: {}", log_level);
    info!("Configuration loaded successfully");

    server::run(config).await?;

    Ok(())
}
