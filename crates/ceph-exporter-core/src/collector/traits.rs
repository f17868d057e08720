//! Abstraction over running the `ceph` command line tool.
//!
//! The `CommandRunner` trait lets the collector run against the real binary
//! in production and against `MockCeph` in tests.

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::{Child, Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::error::InvocationError;

/// Arguments placed ahead of every subcommand so ceph answers in JSON.
pub const JSON_FORMAT_ARGS: [&str; 2] = ["-f", "json"];

/// How often a child is polled for exit while a timeout is armed.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Runs one `ceph` subcommand and returns its stdout.
pub trait CommandRunner: Send + Sync {
    /// Runs `ceph -f json <args...>`.
    ///
    /// # Arguments
    /// * `args` - Subcommand and its arguments, e.g. `["osd", "df"]`
    ///
    /// # Returns
    /// Raw stdout on a zero exit status, an `InvocationError` otherwise.
    fn run(&self, args: &[&str]) -> Result<Vec<u8>, InvocationError>;
}

/// Runs the real `ceph` binary, one process per call.
///
/// The path is taken as configured and not checked until the first call.
#[derive(Debug, Clone)]
pub struct CephCli {
    path: PathBuf,
    timeout: Option<Duration>,
}

impl CephCli {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            timeout: None,
        }
    }

    /// Kills the process if it runs longer than `timeout`.
    ///
    /// `None` or a zero duration waits forever.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout.filter(|t| !t.is_zero());
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn spawn_error(&self, source: io::Error) -> InvocationError {
        InvocationError::Spawn {
            program: self.path.display().to_string(),
            source,
        }
    }

    fn output_with_timeout(
        &self,
        mut command: Command,
        timeout: Duration,
    ) -> Result<Output, InvocationError> {
        let mut child = command
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        // Drain both pipes while waiting, a full pipe would stall the child.
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let stdout_reader = thread::spawn(move || read_pipe(stdout));
        let stderr_reader = thread::spawn(move || read_pipe(stderr));

        let deadline = Instant::now() + timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {}
                Err(e) => {
                    warn!(program = %self.path.display(), error = %e, "lost track of ceph process, killing it");
                    reap(&mut child);
                    return Err(InvocationError::Io(e));
                }
            }
            if Instant::now() >= deadline {
                warn!(program = %self.path.display(), timeout_ms = timeout.as_millis() as u64, "killing hung ceph process");
                reap(&mut child);
                // Reader threads are detached; they exit once every holder of the pipes is gone.
                return Err(InvocationError::TimedOut(timeout));
            }
            thread::sleep(POLL_INTERVAL);
        };

        Ok(Output {
            status,
            stdout: join_reader(stdout_reader)?,
            stderr: join_reader(stderr_reader)?,
        })
    }
}

impl CommandRunner for CephCli {
    fn run(&self, args: &[&str]) -> Result<Vec<u8>, InvocationError> {
        let mut command = Command::new(&self.path);
        command.args(JSON_FORMAT_ARGS).args(args).stdin(Stdio::null());

        debug!(program = %self.path.display(), ?args, "running ceph");
        let t0 = Instant::now();

        let output = match self.timeout {
            Some(timeout) => self.output_with_timeout(command, timeout)?,
            None => command.output().map_err(|e| self.spawn_error(e))?,
        };

        debug!(
            ?args,
            duration_ms = t0.elapsed().as_millis() as u64,
            stdout_bytes = output.stdout.len(),
            "ceph finished"
        );

        if !output.status.success() {
            return Err(InvocationError::Failed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }
}

/// Kills the child and collects its exit status so no zombie is left behind.
fn reap(child: &mut Child) {
    if let Err(e) = child.kill() {
        debug!(error = %e, "kill failed, process already gone");
    }
    let _ = child.wait();
}

fn read_pipe<R: Read>(pipe: Option<R>) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf)?;
    }
    Ok(buf)
}

fn join_reader(handle: thread::JoinHandle<io::Result<Vec<u8>>>) -> io::Result<Vec<u8>> {
    handle
        .join()
        .map_err(|_| io::Error::other("output reader thread panicked"))?
}
