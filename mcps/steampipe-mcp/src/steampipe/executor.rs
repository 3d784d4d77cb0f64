//! Async executor for steampipe CLI commands
//!
//! Runs `steampipe query <sql> --output json` as a child process with a
//! wall-clock timeout and captures its output. A non-zero exit is returned
//! as data; only launch failures and timeouts are errors.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use steampipe_mcp::steampipe::SteampipeExecutor;
//!
//! let executor = SteampipeExecutor::new("steampipe", Duration::from_secs(60));
//! let result = executor.run_query("select login from github_user limit 1").await?;
//! println!("exit {}: {}", result.exit_code, result.stdout);
//! ```

use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tracing::{debug, error, instrument, warn};

use super::error::{SteampipeError, SteampipeResult};
use crate::config::SteampipeConfig;

/// Captured outcome of a steampipe process that ran to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Process exit code; `-<signal>` if the process was killed by a signal
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Invokes the steampipe executable
#[derive(Debug, Clone)]
pub struct SteampipeExecutor {
    command: String,
    timeout: Duration,
}

impl SteampipeExecutor {
    pub fn new(command: impl Into<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            timeout,
        }
    }

    pub fn from_config(config: &SteampipeConfig) -> Self {
        Self::new(&config.command, Duration::from_secs(config.timeout_secs))
    }

    /// Executable name or path
    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run a SQL query and capture the process output
    ///
    /// The query text is passed as a single argument and never inspected.
    ///
    /// # Errors
    ///
    /// - [`SteampipeError::NotFound`] if the executable can't be located
    /// - [`SteampipeError::Timeout`] if the process outlives the timeout;
    ///   the process and its descendants are killed and reaped first
    /// - [`SteampipeError::SystemFault`] for any other spawn or wait failure
    #[instrument(skip(self), fields(command = %self.command))]
    pub async fn run_query(&self, query: &str) -> SteampipeResult<ExecutionResult> {
        let args = ["query", query, "--output", "json"];
        debug!("executing: {} {}", self.command, args.join(" "));

        let mut child = self.spawn(&args)?;

        match tokio::time::timeout(self.timeout, collect_output(&mut child)).await {
            Ok(Ok((status, stdout, stderr))) => Ok(ExecutionResult {
                exit_code: exit_code(status),
                stdout: String::from_utf8_lossy(&stdout).into_owned(),
                stderr: String::from_utf8_lossy(&stderr).into_owned(),
            }),
            Ok(Err(e)) => {
                error!(error = %e, "failed while waiting on steampipe");
                terminate(&mut child).await;
                Err(SteampipeError::SystemFault(e))
            }
            Err(_elapsed) => {
                let secs = self.timeout.as_secs();
                error!(timeout_secs = secs, "steampipe query timed out");
                terminate(&mut child).await;
                Err(SteampipeError::Timeout(secs))
            }
        }
    }

    /// Check that the executable can be launched, returning its version line
    #[instrument(skip(self), fields(command = %self.command))]
    pub async fn check_available(&self) -> SteampipeResult<String> {
        debug!("checking steampipe availability");

        let mut child = self.spawn(&["--version"])?;

        match tokio::time::timeout(self.timeout, collect_output(&mut child)).await {
            Ok(Ok((status, stdout, stderr))) => {
                if !status.success() {
                    return Err(SteampipeError::CommandFailed {
                        code: exit_code(status),
                        stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
                    });
                }
                let version = String::from_utf8_lossy(&stdout).trim().to_string();
                debug!(%version, "steampipe is available");
                Ok(version)
            }
            Ok(Err(e)) => {
                terminate(&mut child).await;
                Err(SteampipeError::SystemFault(e))
            }
            Err(_elapsed) => {
                terminate(&mut child).await;
                Err(SteampipeError::Timeout(self.timeout.as_secs()))
            }
        }
    }

    fn spawn(&self, args: &[&str]) -> SteampipeResult<Child> {
        let mut cmd = Command::new(&self.command);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Own process group, so a timeout can take down anything steampipe started
        #[cfg(unix)]
        cmd.process_group(0);

        cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                error!(command = %self.command, "steampipe executable not found");
                SteampipeError::NotFound
            } else {
                error!(command = %self.command, error = %e, "failed to spawn steampipe");
                SteampipeError::SystemFault(e)
            }
        })
    }
}

/// Exit code, or the negated signal number for a signal death
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }

    -1
}

/// Wait for the child to exit while draining both pipes
async fn collect_output(child: &mut Child) -> std::io::Result<(ExitStatus, Vec<u8>, Vec<u8>)> {
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    tokio::try_join!(child.wait(), drain(stdout), drain(stderr))
}

async fn drain<R: AsyncRead + Unpin>(pipe: Option<R>) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

/// Kill the child's whole process group, then kill and reap the child itself
async fn terminate(child: &mut Child) {
    #[cfg(unix)]
    if let Some(pid) = child.id() {
        // The child leads its own group (see `spawn`), so its pid is the pgid
        let rc = unsafe { libc::killpg(pid as libc::pid_t, libc::SIGKILL) };
        if rc != 0 {
            warn!(
                pid,
                error = %std::io::Error::last_os_error(),
                "failed to kill steampipe process group"
            );
        }
    }

    if let Err(e) = child.kill().await {
        warn!(error = %e, "failed to kill steampipe process");
    }
}
