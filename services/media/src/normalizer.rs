use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::error::MediaResult;
use crate::process::run_tool;

/// Rewrites videos with `ffmpeg` so the `moov` atom precedes the media data
#[derive(Debug, Clone)]
pub struct MediaNormalizer {
    ffmpeg: PathBuf,
    timeout: Duration,
}

impl MediaNormalizer {
    pub fn new(ffmpeg: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            timeout,
        }
    }

    /// Remux `input` for progressive playback without re-encoding.
    ///
    /// Writes to `<input>.processing` and returns that path. The caller owns
    /// the returned file. On failure no output file is left behind.
    pub async fn faststart(&self, input: &Path) -> MediaResult<PathBuf> {
        let output = processing_path(input);
        info!("Relocating moov atom: {} -> {}", input.display(), output.display());

        let args = [
            OsStr::new("-y"),
            OsStr::new("-i"),
            input.as_os_str(),
            OsStr::new("-c"),
            OsStr::new("copy"),
            OsStr::new("-movflags"),
            OsStr::new("faststart"),
            OsStr::new("-f"),
            OsStr::new("mp4"),
            output.as_os_str(),
        ];

        if let Err(e) = run_tool(&self.ffmpeg, args, self.timeout).await {
            remove_partial_output(&output).await;
            return Err(e);
        }

        Ok(output)
    }
}

/// Sibling path the normalized copy of `input` is written to
pub fn processing_path(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(".processing");
    PathBuf::from(name)
}

async fn remove_partial_output(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove partial output {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MediaError;

    #[test]
    fn test_processing_path_is_a_sibling() {
        let input = Path::new("/tmp/staging/tubely-upload123.mp4");
        let output = processing_path(input);
        assert_eq!(output, Path::new("/tmp/staging/tubely-upload123.mp4.processing"));
        assert_eq!(output.parent(), input.parent());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_remux_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.mp4");
        tokio::fs::write(&input, b"xx").await.unwrap();
        // Simulate ffmpeg writing a partial file before failing
        tokio::fs::write(processing_path(&input), b"partial").await.unwrap();

        let normalizer = MediaNormalizer::new("false", Duration::from_secs(5));
        let result = normalizer.faststart(&input).await;

        assert!(matches!(result, Err(MediaError::ToolFailed { .. })));
        assert!(!processing_path(&input).exists());
        assert!(input.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_successful_remux_returns_output_path() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.mp4");

        let normalizer = MediaNormalizer::new("true", Duration::from_secs(5));
        let output = normalizer.faststart(&input).await.unwrap();

        assert_eq!(output, processing_path(&input));
    }
}
