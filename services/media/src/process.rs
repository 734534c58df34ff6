//! Subprocess execution with a deadline

use std::ffi::OsStr;
use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, error};

use crate::error::{MediaError, MediaResult};

/// Run `program` with `args`, capturing stdout and stderr.
///
/// The child is killed if it outlives `timeout`. A non-zero exit status is
/// turned into [`MediaError::ToolFailed`].
pub(crate) async fn run_tool<I, S>(program: &Path, args: I, timeout: Duration) -> MediaResult<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let tool = program.display().to_string();
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    debug!(tool = %tool, "Running media tool");

    let child = command.spawn().map_err(|source| MediaError::Spawn {
        tool: tool.clone(),
        source,
    })?;

    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(result) => result?,
        Err(_) => {
            error!(tool = %tool, ?timeout, "Media tool timed out");
            return Err(MediaError::Timeout { tool, timeout });
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        error!(tool = %tool, status = ?output.status, "Media tool failed");
        return Err(MediaError::ToolFailed {
            tool,
            status: output.status,
            stderr,
        });
    }

    Ok(output)
}
