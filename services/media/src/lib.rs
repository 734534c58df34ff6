//! Media processing for Tubely uploads
//!
//! Wraps the external `ffprobe`/`ffmpeg` binaries, generates object keys and
//! talks to the S3-compatible object store.

pub mod error;
pub mod inspector;
pub mod keys;
pub mod normalizer;
pub mod object_store;
mod process;
pub mod tool;

pub use error::{MediaError, MediaResult, StorageError, StorageResult};
pub use inspector::{AspectRatio, AspectThresholds, MediaInspector};
pub use normalizer::MediaNormalizer;
pub use object_store::{ObjectStore, S3Config, S3ObjectStore};
pub use tool::{FfmpegTool, MediaTool, MediaToolConfig};
