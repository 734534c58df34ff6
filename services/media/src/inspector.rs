use serde::Deserialize;
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::error::{MediaError, MediaResult};
use crate::process::run_tool;

/// Aspect ratio bucket a video is filed under in the object store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectRatio {
    /// Roughly 16:9
    Landscape,
    /// Roughly 9:16
    Portrait,
    Other,
}

impl AspectRatio {
    /// Object key prefix for this bucket
    pub fn prefix(self) -> &'static str {
        match self {
            AspectRatio::Landscape => "landscape",
            AspectRatio::Portrait => "portrait",
            AspectRatio::Other => "other",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Target ratios and tolerance used by [`classify_ratio`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectThresholds {
    pub landscape: f64,
    /// Deliberately `9.01 / 16` rather than the exact reciprocal of 16:9
    pub portrait: f64,
    pub tolerance: f64,
}

impl Default for AspectThresholds {
    fn default() -> Self {
        Self {
            landscape: 16.0 / 9.0,
            portrait: 9.01 / 16.0,
            tolerance: 0.01,
        }
    }
}

/// Classify a width/height ratio. Landscape is checked first.
pub fn classify_ratio(ratio: f64, thresholds: &AspectThresholds) -> AspectRatio {
    if (ratio - thresholds.landscape).abs() < thresholds.tolerance {
        AspectRatio::Landscape
    } else if (ratio - thresholds.portrait).abs() < thresholds.tolerance {
        AspectRatio::Portrait
    } else {
        AspectRatio::Other
    }
}

/// Classify frame dimensions. Both must be non-zero.
pub fn classify(width: u32, height: u32, thresholds: &AspectThresholds) -> AspectRatio {
    classify_ratio(f64::from(width) / f64::from(height), thresholds)
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

impl ProbeStream {
    fn dimensions(&self) -> Option<(u32, u32)> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some((w, h)),
            _ => None,
        }
    }
}

/// Pull the frame size out of `ffprobe -print_format json -show_streams` output.
///
/// Prefers the first stream whose `codec_type` is `video`, falling back to
/// the first stream that reports dimensions at all.
pub fn parse_dimensions(ffprobe_json: &[u8]) -> MediaResult<(u32, u32)> {
    let probe: ProbeOutput = serde_json::from_slice(ffprobe_json)?;

    probe
        .streams
        .iter()
        .filter(|s| s.codec_type.as_deref() == Some("video"))
        .find_map(ProbeStream::dimensions)
        .or_else(|| probe.streams.iter().find_map(ProbeStream::dimensions))
        .ok_or(MediaError::NoVideoStream)
}

/// Runs `ffprobe` against local files
#[derive(Debug, Clone)]
pub struct MediaInspector {
    ffprobe: PathBuf,
    timeout: Duration,
    thresholds: AspectThresholds,
}

impl MediaInspector {
    pub fn new(ffprobe: impl Into<PathBuf>, timeout: Duration, thresholds: AspectThresholds) -> Self {
        Self {
            ffprobe: ffprobe.into(),
            timeout,
            thresholds,
        }
    }

    /// Probe `file_path` and classify its first video stream
    pub async fn aspect_ratio(&self, file_path: &Path) -> MediaResult<AspectRatio> {
        info!("Probing aspect ratio of {}", file_path.display());

        let args = [
            OsStr::new("-v"),
            OsStr::new("error"),
            OsStr::new("-print_format"),
            OsStr::new("json"),
            OsStr::new("-show_streams"),
            file_path.as_os_str(),
        ];
        let output = run_tool(&self.ffprobe, args, self.timeout).await?;

        let (width, height) = parse_dimensions(&output.stdout)?;
        let aspect = classify(width, height, &self.thresholds);
        info!(width, height, %aspect, "Classified video");

        Ok(aspect)
    }
}
