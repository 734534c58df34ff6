//! Local staging of uploaded files
//!
//! Every file created here is removed when its guard is dropped, so early
//! returns from a handler cannot leak files.

use axum::extract::multipart::Field;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::error::{ApiError, ApiResult};

/// A file deleted on drop
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
}

impl StagedFile {
    /// Take ownership of an existing file at `path`
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed staged file {}", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove staged file {}: {}", self.path.display(), e),
        }
    }
}

/// Stream a multipart field into a new temp file inside `dir`
pub async fn stage_field(field: &mut Field<'_>, dir: &Path) -> ApiResult<TempPath> {
    let temp = tempfile::Builder::new()
        .prefix("tubely-upload-")
        .suffix(".mp4")
        .tempfile_in(dir)
        .map_err(|e| staging_error("create", e))?;
    let (file, path) = temp.into_parts();
    let mut file = tokio::fs::File::from_std(file);

    let mut written: u64 = 0;
    while let Some(chunk) = field.chunk().await? {
        file.write_all(&chunk)
            .await
            .map_err(|e| staging_error("write", e))?;
        written += chunk.len() as u64;
    }
    file.flush().await.map_err(|e| staging_error("write", e))?;

    debug!(bytes = written, "Staged upload at {}", path.display());
    Ok(path)
}

fn staging_error(action: &str, err: io::Error) -> ApiError {
    warn!("Could not {} staging file: {}", action, err);
    ApiError::Internal("Could not save video".to_string())
}
