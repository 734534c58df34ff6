//! Error types for media processing and object storage

use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while inspecting or rewriting media files
#[derive(Error, Debug)]
pub enum MediaError {
    /// The tool binary could not be started
    #[error("failed to start {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// The tool ran but exited unsuccessfully
    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        tool: String,
        status: ExitStatus,
        stderr: String,
    },

    /// The tool was killed after running past its deadline
    #[error("{tool} did not finish within {timeout:?}")]
    Timeout { tool: String, timeout: Duration },

    /// ffprobe output was not the JSON we expect
    #[error("could not parse ffprobe output: {0}")]
    Probe(#[from] serde_json::Error),

    /// No stream carried usable width and height
    #[error("no video stream with usable dimensions")]
    NoVideoStream,

    /// The declared media type has no registered file extension
    #[error("no file extension registered for media type {0}")]
    UnknownExtension(String),

    /// The OS random source failed
    #[error("random source unavailable: {0}")]
    Random(#[source] rand::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for media results
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors raised by the object store
#[derive(Error, Debug)]
pub enum StorageError {
    /// The local file could not be opened as an upload body
    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },

    /// The remote put failed
    #[error("failed to upload {key}: {message}")]
    Upload { key: String, message: String },
}

/// Type alias for storage results
pub type StorageResult<T> = Result<T, StorageError>;
