//! Spooling of multipart audio uploads into short-lived files.
//!
//! A [`TempUpload`] owns exactly one file on disk and deletes it when dropped,
//! so every path out of a request handler (success, mapped failure, early
//! return, or a cancelled future) leaves the upload directory clean.

use crate::{Error, Result};
use axum::extract::Multipart;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

/// Multipart field carrying the audio file.
pub const AUDIO_FIELD: &str = "audio";

const MAX_EXTENSION_LEN: usize = 8;

#[derive(Debug)]
pub struct TempUpload {
    path: PathBuf,
    original_name: Option<String>,
    removed: bool,
}

impl TempUpload {
    pub fn new(path: impl Into<PathBuf>, original_name: Option<String>) -> Self {
        Self {
            path: path.into(),
            original_name,
            removed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name as sent by the client, if any.
    pub fn original_name(&self) -> Option<&str> {
        self.original_name.as_deref()
    }

    /// Name to present to downstream services: the client's name when known,
    /// otherwise the spooled file's own name.
    pub fn display_name(&self) -> String {
        self.original_name
            .clone()
            .or_else(|| {
                self.path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| AUDIO_FIELD.to_string())
    }

    /// Deletes the file without blocking the runtime. Failures are logged and
    /// not retried by `Drop`.
    pub async fn cleanup(mut self) {
        let result = tokio::fs::remove_file(&self.path).await;
        self.removed = true;
        log_removal(&self.path, result);
    }
}

/// Fallback for paths that never reach [`TempUpload::cleanup`], such as early
/// returns or a cancelled request future.
impl Drop for TempUpload {
    fn drop(&mut self) {
        if !self.removed {
            log_removal(&self.path, std::fs::remove_file(&self.path));
        }
    }
}

fn log_removal(path: &Path, result: std::io::Result<()>) {
    match result {
        Ok(()) => debug!("Deleted uploaded file: {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("Uploaded file already removed: {}", path.display())
        }
        Err(e) => warn!("Error deleting uploaded file {}: {}", path.display(), e),
    }
}

/// Writes incoming audio fields into a dedicated directory.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Creates the upload directory if it does not exist yet.
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        debug!("Upload directory ready: {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Streams the first `audio` field of `multipart` to disk.
    ///
    /// Returns `Ok(None)` when the form has no such field. Fields with other
    /// names are skipped. Malformed multipart input surfaces as
    /// [`Error::Upload`], disk failures as [`Error::Io`]; in both cases any
    /// partially written file is removed before returning.
    pub async fn spool(&self, multipart: &mut Multipart) -> Result<Option<TempUpload>> {
        while let Some(mut field) = multipart
            .next_field()
            .await
            .map_err(|e| Error::upload(format!("Failed to read multipart: {}", e)))?
        {
            if field.name() != Some(AUDIO_FIELD) {
                debug!("Skipping multipart field: {:?}", field.name());
                continue;
            }

            let original_name = field.file_name().map(str::to_string);
            let upload = TempUpload::new(
                self.dir.join(stored_file_name(original_name.as_deref())),
                original_name,
            );

            let mut file = tokio::fs::File::create(upload.path()).await?;
            let mut written = 0usize;
            while let Some(chunk) = field
                .chunk()
                .await
                .map_err(|e| Error::upload(format!("Failed to read audio field: {}", e)))?
            {
                file.write_all(&chunk).await?;
                written += chunk.len();
            }
            file.flush().await?;

            debug!(
                "Stored {} bytes of uploaded audio at {}",
                written,
                upload.path().display()
            );
            return Ok(Some(upload));
        }

        Ok(None)
    }
}

/// Random file name, keeping a short alphanumeric extension from the client's
/// file name so the stored file is still recognisable as audio.
fn stored_file_name(original_name: Option<&str>) -> String {
    let id = Uuid::new_v4().simple().to_string();
    let extension = original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        });

    match extension {
        Some(ext) => format!("{}.{}", id, ext.to_ascii_lowercase()),
        None => id,
    }
}
