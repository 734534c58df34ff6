//! The media tool seam the upload handlers depend on

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::MediaResult;
use crate::inspector::{AspectRatio, AspectThresholds, MediaInspector};
use crate::normalizer::MediaNormalizer;

/// Inspection and normalization of staged video files
#[async_trait]
pub trait MediaTool: Send + Sync {
    /// Classify the aspect ratio of the video at `path`
    async fn aspect_ratio(&self, path: &Path) -> MediaResult<AspectRatio>;

    /// Produce a faststart copy of `path` and return its location
    async fn faststart(&self, path: &Path) -> MediaResult<PathBuf>;
}

/// Settings for [`FfmpegTool`]
#[derive(Debug, Clone)]
pub struct MediaToolConfig {
    pub ffprobe_path: PathBuf,
    pub ffmpeg_path: PathBuf,
    /// Applied to each subprocess individually
    pub timeout: Duration,
    pub thresholds: AspectThresholds,
}

impl Default for MediaToolConfig {
    fn default() -> Self {
        Self {
            ffprobe_path: PathBuf::from("ffprobe"),
            ffmpeg_path: PathBuf::from("ffmpeg"),
            timeout: Duration::from_secs(300),
            thresholds: AspectThresholds::default(),
        }
    }
}

/// [`MediaTool`] backed by the `ffprobe` and `ffmpeg` binaries
#[derive(Debug, Clone)]
pub struct FfmpegTool {
    inspector: MediaInspector,
    normalizer: MediaNormalizer,
}

impl FfmpegTool {
    pub fn new(config: MediaToolConfig) -> Self {
        Self {
            inspector: MediaInspector::new(config.ffprobe_path, config.timeout, config.thresholds),
            normalizer: MediaNormalizer::new(config.ffmpeg_path, config.timeout),
        }
    }
}

#[async_trait]
impl MediaTool for FfmpegTool {
    async fn aspect_ratio(&self, path: &Path) -> MediaResult<AspectRatio> {
        self.inspector.aspect_ratio(path).await
    }

    async fn faststart(&self, path: &Path) -> MediaResult<PathBuf> {
        self.normalizer.faststart(path).await
    }
}
