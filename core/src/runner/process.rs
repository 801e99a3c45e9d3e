//! Spawn one child, drain its output streams and bound the wait with a timeout.

use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;

/// Per-stream capture cap. Output past it is read and discarded so the child never blocks on a full pipe.
const MAX_CAPTURE_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ProcessSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to spawn process: {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed waiting for process: {0}")]
    Wait(#[source] std::io::Error),

    #[error("process timed out after {}s", .elapsed.as_secs())]
    Timeout { elapsed: Duration },
}

pub async fn run_process(spec: &ProcessSpec) -> Result<ProcessOutput, ProcessError> {
    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = &spec.cwd {
        cmd.current_dir(dir);
    }

    let start = Instant::now();
    let deadline = tokio::time::Instant::now() + spec.timeout;
    let mut child = cmd.spawn().map_err(|source| ProcessError::Spawn {
        program: spec.program.display().to_string(),
        source,
    })?;

    let mut stdout_task = tokio::spawn(drain(child.stdout.take()));
    let mut stderr_task = tokio::spawn(drain(child.stderr.take()));
    let abort_readers = |out: &JoinHandle<Vec<u8>>, err: &JoinHandle<Vec<u8>>| {
        out.abort();
        err.abort();
    };

    let status = match tokio::time::timeout_at(deadline, child.wait()).await {
        Ok(Ok(status)) => status,
        Ok(Err(e)) => {
            abort_readers(&stdout_task, &stderr_task);
            return Err(ProcessError::Wait(e));
        }
        Err(_) => {
            if let Err(e) = child.kill().await {
                tracing::warn!(error = %e, "failed to kill timed out process");
            }
            abort_readers(&stdout_task, &stderr_task);
            return Err(ProcessError::Timeout {
                elapsed: start.elapsed(),
            });
        }
    };

    // A background process started by the child inherits the pipes and can hold them open
    // after the child exits; draining shares the same deadline.
    let drained = tokio::time::timeout_at(deadline, async {
        let out = (&mut stdout_task).await.unwrap_or_default();
        let err = (&mut stderr_task).await.unwrap_or_default();
        (out, err)
    })
    .await;
    let Ok((stdout, stderr)) = drained else {
        abort_readers(&stdout_task, &stderr_task);
        return Err(ProcessError::Timeout {
            elapsed: start.elapsed(),
        });
    };

    Ok(ProcessOutput {
        exit_code: exit_code(status),
        stdout: decode_output(&stdout),
        stderr: decode_output(&stderr),
        duration: start.elapsed(),
    })
}

/// Exit code of a finished child; a signal death reports as `128 + signal`.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

async fn drain<R: AsyncRead + Unpin>(reader: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    let Some(mut reader) = reader else {
        return buf;
    };
    let mut chunk = [0u8; 8192];
    loop {
        match reader.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                let room = MAX_CAPTURE_BYTES.saturating_sub(buf.len());
                buf.extend_from_slice(&chunk[..n.min(room)]);
            }
        }
    }
    buf
}

/// Lossy UTF-8 decode: a leading BOM is dropped and malformed sequences become U+FFFD.
pub fn decode_output(bytes: &[u8]) -> String {
    let (text, _) = encoding_rs::UTF_8.decode_with_bom_removal(bytes);
    text.into_owned()
}
