//! Service configuration loaded from the environment

use config::{Config, ConfigError, Environment};
use media::{AspectThresholds, MediaToolConfig, S3Config};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration for the API service
///
/// Every field maps to the upper-cased environment variable of the same name,
/// e.g. `jwt_secret` is read from `JWT_SECRET`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HS256 secret access tokens are signed with
    pub jwt_secret: String,
    pub s3_bucket: String,
    pub s3_region: String,
    /// Custom endpoint for S3-compatible providers
    pub s3_endpoint: Option<String>,
    /// Directory thumbnails are written to and served from
    pub assets_root: PathBuf,
    /// Directory uploads are staged in; the system temp dir when unset
    pub staging_dir: Option<PathBuf>,
    pub port: u16,
    /// Base for generated thumbnail URLs; `http://localhost:<port>` when unset
    pub public_base_url: Option<String>,
    pub ffprobe_path: PathBuf,
    pub ffmpeg_path: PathBuf,
    pub media_tool_timeout_secs: u64,
    pub aspect_tolerance: f64,
    pub portrait_ratio: f64,
    pub thumbnail_cache_capacity: usize,
    pub thumbnail_cache_max_bytes: usize,
}

impl AppConfig {
    /// Load configuration from environment variables, applying defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        let config: AppConfig = Config::builder()
            .set_default("s3_region", "us-east-1")?
            .set_default("assets_root", "./assets")?
            .set_default("port", 8091_i64)?
            .set_default("ffprobe_path", "ffprobe")?
            .set_default("ffmpeg_path", "ffmpeg")?
            .set_default("media_tool_timeout_secs", 300_i64)?
            .set_default("aspect_tolerance", 0.01)?
            .set_default("portrait_ratio", 9.01 / 16.0)?
            .set_default("thumbnail_cache_capacity", 256_i64)?
            .set_default("thumbnail_cache_max_bytes", 64_i64 * 1024 * 1024)?
            .add_source(Environment::default().try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::Message("JWT_SECRET must not be empty".to_string()));
        }
        if self.s3_bucket.is_empty() {
            return Err(ConfigError::Message("S3_BUCKET must not be empty".to_string()));
        }
        if self.media_tool_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "MEDIA_TOOL_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }
        if !(self.aspect_tolerance > 0.0) {
            return Err(ConfigError::Message(
                "ASPECT_TOLERANCE must be a positive number".to_string(),
            ));
        }
        Ok(())
    }

    pub fn staging_dir(&self) -> PathBuf {
        self.staging_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    pub fn public_base_url(&self) -> String {
        match &self.public_base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://localhost:{}", self.port),
        }
    }

    pub fn s3_config(&self) -> S3Config {
        S3Config {
            bucket: self.s3_bucket.clone(),
            region: self.s3_region.clone(),
            endpoint_url: self.s3_endpoint.clone(),
        }
    }

    pub fn media_tool_config(&self) -> MediaToolConfig {
        MediaToolConfig {
            ffprobe_path: self.ffprobe_path.clone(),
            ffmpeg_path: self.ffmpeg_path.clone(),
            timeout: Duration::from_secs(self.media_tool_timeout_secs),
            thresholds: AspectThresholds {
                portrait: self.portrait_ratio,
                tolerance: self.aspect_tolerance,
                ..AspectThresholds::default()
            },
        }
    }
}
