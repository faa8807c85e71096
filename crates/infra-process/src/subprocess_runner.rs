// Subprocess runner implementation
// reason: async-trait, tokio for async process management
//
// The bridge has three concerns: spawning the child with piped streams
// (invoker), draining stdout and stderr incrementally into frozen buffers
// (aggregator), and deciding the single outcome from the exit status once
// all three completions have arrived (resolver). Resolving on termination
// alone would truncate buffered-but-undelivered output, so exit status,
// stdout EOF and stderr EOF are joined before the outcome is finalized.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::time::timeout;
use tracing::{info, warn};

use adoptml_core::domain::InvocationRequest;
use adoptml_core::port::{InvocationError, ModelRunner, TimeProvider};

const READ_CHUNK_BYTES: usize = 8 * 1024;

/// Subprocess runner
/// Spawns isolated child processes with environment allowlisting
pub struct SubprocessRunner {
    time_provider: Arc<dyn TimeProvider>,
    env_allowlist: Vec<String>,
    invoke_timeout: Option<Duration>,
}

impl SubprocessRunner {
    /// Create a new subprocess runner
    ///
    /// # Arguments
    /// * `time_provider` - Time provider for duration tracking
    /// * `env_allowlist` - Environment variables the child may inherit
    /// * `invoke_timeout` - Optional bound; on expiry the child is killed
    ///
    /// # Example
    /// ```ignore
    /// let runner = SubprocessRunner::new(
    ///     Arc::new(SystemTimeProvider),
    ///     vec!["PATH".to_string(), "HOME".to_string(), "USER".to_string()],
    ///     Some(Duration::from_secs(30)),
    /// );
    /// ```
    pub fn new(
        time_provider: Arc<dyn TimeProvider>,
        env_allowlist: Vec<String>,
        invoke_timeout: Option<Duration>,
    ) -> Self {
        Self {
            time_provider,
            env_allowlist,
            invoke_timeout,
        }
    }

    /// Invoker: start the child with piped stdout/stderr.
    ///
    /// A spawn failure (program missing, permission denied) surfaces
    /// immediately; no termination wait happens for it. The pipes are
    /// attached before this returns, so no output is lost between spawn
    /// and the aggregator taking over.
    fn spawn_child(&self, request: &InvocationRequest) -> Result<Child, InvocationError> {
        let mut command = Command::new(request.program());
        command
            .args(request.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = request.working_dir() {
            command.current_dir(dir);
        }

        // Children see only the allowlisted subset of our environment
        command.env_clear();
        for key in &self.env_allowlist {
            if let Ok(value) = std::env::var(key) {
                command.env(key, value);
            }
        }

        command
            .spawn()
            .map_err(|e| InvocationError::Spawn(e.to_string()))
    }

    /// Resolver: decide the outcome from the exit status and the frozen
    /// buffers. Stderr on a zero exit is diagnostic noise, not failure;
    /// it is logged at warn and otherwise ignored.
    fn resolve(
        &self,
        status: std::process::ExitStatus,
        stdout: Vec<u8>,
        stderr: Vec<u8>,
    ) -> Result<Vec<u8>, InvocationError> {
        if status.success() {
            if !stderr.is_empty() {
                warn!(
                    stderr = %String::from_utf8_lossy(&stderr),
                    "Child wrote to stderr on successful exit (ignored)"
                );
            }
            Ok(stdout)
        } else {
            Err(InvocationError::Exit {
                code: status.code(),
                stderr: String::from_utf8_lossy(&stderr).into_owned(),
            })
        }
    }
}

/// Aggregator: append every chunk until end-of-stream.
///
/// A single read never yields the whole output; stream closure is a
/// separate signal from process termination.
async fn drain_stream<R>(mut stream: R) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut buffer = Vec::new();
    let mut chunk = [0u8; READ_CHUNK_BYTES];
    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..n]);
    }
    Ok(buffer)
}

#[async_trait]
impl ModelRunner for SubprocessRunner {
    async fn run(&self, request: &InvocationRequest) -> Result<Vec<u8>, InvocationError> {
        let started_at = self.time_provider.now_millis();

        info!(
            program = %request.program(),
            args = ?request.args(),
            working_dir = ?request.working_dir(),
            timeout = ?self.invoke_timeout,
            "Spawning child process"
        );

        let mut child = self.spawn_child(request)?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| InvocationError::StreamIo("stdout pipe not captured".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| InvocationError::StreamIo("stderr pipe not captured".to_string()))?;

        // Exit status, stdout EOF and stderr EOF are independent
        // completions; all three must arrive before resolution.
        let joined = async {
            tokio::join!(child.wait(), drain_stream(stdout), drain_stream(stderr))
        };

        let (status, stdout_buf, stderr_buf) = match self.invoke_timeout {
            Some(bound) => {
                // Bind before matching so the joined future (and its
                // borrow of the child) is dropped on the timeout path.
                let completed = timeout(bound, joined).await;
                match completed {
                    Ok(completed) => completed,
                    Err(_) => {
                        let bound_ms = bound.as_millis() as u64;
                        warn!(
                            program = %request.program(),
                            timeout_ms = bound_ms,
                            "Invocation timed out, killing child"
                        );
                        let _ = child.start_kill();
                        let _ = child.wait().await;
                        return Err(InvocationError::Timeout(bound_ms));
                    }
                }
            }
            None => joined.await,
        };

        let status =
            status.map_err(|e| InvocationError::StreamIo(format!("process wait: {}", e)))?;
        let stdout_buf =
            stdout_buf.map_err(|e| InvocationError::StreamIo(format!("stdout: {}", e)))?;
        let stderr_buf =
            stderr_buf.map_err(|e| InvocationError::StreamIo(format!("stderr: {}", e)))?;

        let duration_ms = self.time_provider.now_millis() - started_at;
        info!(
            program = %request.program(),
            duration_ms = %duration_ms,
            exit_code = ?status.code(),
            stdout_bytes = stdout_buf.len(),
            stderr_bytes = stderr_buf.len(),
            "Child process terminated"
        );

        self.resolve(status, stdout_buf, stderr_buf)
    }
}
