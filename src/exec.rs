//! Confirmed-command execution.
//!
//! Commands run through `sh -c` under a caller-supplied timeout. Batches
//! are fail-fast: the first non-zero exit halts the remaining commands,
//! since later commands routinely assume earlier ones succeeded. Output is
//! captured up to a bound and truncated with an explicit marker.

use crate::core::error::{Result, ShellwrightError};
use std::time::{Duration, Instant};
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::time::timeout;

/// Exit code reported for timed-out commands, matching coreutils `timeout`.
pub const TIMEOUT_EXIT_CODE: i32 = 124;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
const DEFAULT_CAPTURE_LIMIT: usize = 64 * 1024;
const TRUNCATION_MARKER: &str = "\n... [output truncated]";

/// Result of running one command. Ephemeral; reported, never persisted.
#[derive(Debug, Clone)]
pub struct ExecutionOutcome {
    pub command: String,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
    pub timed_out: bool,
}

impl ExecutionOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

#[derive(Debug, Clone)]
pub struct ExecutionRunner {
    pub timeout: Duration,
    pub capture_limit: usize,
}

impl Default for ExecutionRunner {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            capture_limit: DEFAULT_CAPTURE_LIMIT,
        }
    }
}

impl ExecutionRunner {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }

    /// Run one command, capturing stdout/stderr and exit code.
    ///
    /// On timeout the child is killed best-effort and the outcome carries
    /// [`TIMEOUT_EXIT_CODE`] with whatever output was captured so far.
    pub async fn run(&self, command: &str) -> Result<ExecutionOutcome> {
        tracing::debug!(command, "executing");
        let started = Instant::now();

        let mut child = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .spawn()
            .map_err(|e| ShellwrightError::SpawnFailure(format!("{command}: {e}")))?;

        let mut stdout_pipe = child.stdout.take();
        let mut stderr_pipe = child.stderr.take();
        let mut stdout_buf: Vec<u8> = Vec::new();
        let mut stderr_buf: Vec<u8> = Vec::new();

        let limit = self.capture_limit;
        let wait = async {
            let (_, _, status) = tokio::join!(
                async {
                    if let Some(pipe) = stdout_pipe.as_mut() {
                        read_capped(pipe, limit, &mut stdout_buf).await;
                    }
                },
                async {
                    if let Some(pipe) = stderr_pipe.as_mut() {
                        read_capped(pipe, limit, &mut stderr_buf).await;
                    }
                },
                child.wait(),
            );
            status
        };

        let outcome = match timeout(self.timeout, wait).await {
            Ok(status) => {
                let status = status?;
                ExecutionOutcome {
                    command: command.to_string(),
                    // Terminated by signal reports -1.
                    exit_code: status.code().unwrap_or(-1),
                    stdout: self.bounded(&stdout_buf),
                    stderr: self.bounded(&stderr_buf),
                    duration: started.elapsed(),
                    timed_out: false,
                }
            }
            Err(_) => {
                tracing::warn!(command, timeout = ?self.timeout, "command timed out, killing");
                let _ = child.kill().await;
                ExecutionOutcome {
                    command: command.to_string(),
                    exit_code: TIMEOUT_EXIT_CODE,
                    stdout: self.bounded(&stdout_buf),
                    stderr: self.bounded(&stderr_buf),
                    duration: started.elapsed(),
                    timed_out: true,
                }
            }
        };

        tracing::debug!(
            command,
            exit_code = outcome.exit_code,
            duration_ms = outcome.duration.as_millis() as u64,
            "execution finished"
        );
        Ok(outcome)
    }

    /// Execute a batch in order, halting after the first failure.
    ///
    /// The returned outcomes cover exactly the commands that ran; commands
    /// after a failure are skipped, and already-run commands are never
    /// rolled back.
    pub async fn execute(&self, batch: &[String]) -> Result<Vec<ExecutionOutcome>> {
        let mut outcomes = Vec::with_capacity(batch.len());
        for command in batch {
            let outcome = self.run(command).await?;
            let failed = !outcome.success();
            outcomes.push(outcome);
            if failed {
                tracing::warn!(command, "halting batch after failure");
                break;
            }
        }
        Ok(outcomes)
    }

    /// Render a captured buffer, truncating at the limit with a marker.
    /// Buffers hold at most `capture_limit + 1` bytes (see [`read_capped`]),
    /// so exceeding the limit means the stream really was longer.
    fn bounded(&self, bytes: &[u8]) -> String {
        let text = String::from_utf8_lossy(bytes);
        if text.len() <= self.capture_limit {
            return text.into_owned();
        }
        let mut cut = self.capture_limit;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        let mut out = text[..cut].to_string();
        out.push_str(TRUNCATION_MARKER);
        out
    }
}

/// Read at most `limit + 1` bytes into `buf` (one past the limit so
/// truncation is detectable), then drain the remainder to a sink so the
/// child never blocks on a full pipe. Memory held stays bounded no matter
/// how much the child writes.
async fn read_capped<R>(pipe: &mut R, limit: usize, buf: &mut Vec<u8>)
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut capped = pipe.take(limit as u64 + 1);
    let _ = capped.read_to_end(buf).await;
    let _ = tokio::io::copy(capped.get_mut(), &mut tokio::io::sink()).await;
}
