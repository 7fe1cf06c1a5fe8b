mod types;

pub use types::*;

use crate::{Error, Result};
use std::{env, path::Path};
use tracing::debug;

pub const CONFIG_PATH_VAR: &str = "CONFIG_PATH";
pub const BASE_URL_VAR: &str = "HUGGINGFACE_API_URL";
pub const UPLOAD_DIR_VAR: &str = "UPLOAD_DIR";

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Loads the configuration from `CONFIG_PATH` (or `config.yaml`) and applies
/// environment overrides. A missing default file falls back to built-in
/// defaults; a missing file named explicitly through `CONFIG_PATH` is an error.
pub async fn load() -> Result<Config> {
    let explicit = env::var(CONFIG_PATH_VAR).ok();
    let config_path = explicit
        .clone()
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let mut config = if explicit.is_some() || Path::new(&config_path).exists() {
        load_from_path(&config_path).await?
    } else {
        debug!("No {} found, using default configuration", config_path);
        Config::default()
    };

    apply_overrides(
        &mut config,
        env::var(BASE_URL_VAR).ok(),
        env::var(UPLOAD_DIR_VAR).ok(),
    );

    validate(&config)?;
    Ok(config)
}

pub async fn load_from_path(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    debug!("Loading configuration from: {}", path.display());

    let config_str = tokio::fs::read_to_string(path).await?;
    let config: Config = serde_yaml::from_str(&config_str)?;

    Ok(config)
}

/// Environment values win over the file. Empty values are ignored.
pub fn apply_overrides(config: &mut Config, base_url: Option<String>, upload_dir: Option<String>) {
    if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
        debug!("Overriding inference base URL from {}", BASE_URL_VAR);
        config.inference.base_url = url;
    }

    if let Some(dir) = upload_dir.filter(|d| !d.trim().is_empty()) {
        debug!("Overriding upload directory from {}", UPLOAD_DIR_VAR);
        config.server.upload_dir = dir.into();
    }
}

pub fn validate(config: &Config) -> Result<()> {
    if config.inference.base_url.trim().is_empty() {
        return Err(Error::config("inference.base_url must not be empty"));
    }
    if config.inference.timeout_ms == 0 {
        return Err(Error::config("inference.timeout_ms must be greater than zero"));
    }
    if config.server.max_upload_bytes == 0 {
        return Err(Error::config("server.max_upload_bytes must be greater than zero"));
    }
    Ok(())
}
