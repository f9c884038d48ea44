//! Bounded execution of external tools.
//!
//! [`ProcessRunner`] spawns a command with captured output, optionally feeds
//! it stdin, and polls for exit until a deadline. A child still running at
//! the deadline is killed and reported as [`ProcessError::Timeout`].

use std::io::{self, Read, Write};
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, warn};

/// Tracing target for external process execution.
const PROCESS_TARGET: &str = "mender::process";

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Everything written to stdout (lossily decoded).
    pub stdout: String,
    /// Everything written to stderr (lossily decoded).
    pub stderr: String,
    /// Exit code, absent when the process was ended by a signal.
    pub exit_code: Option<i32>,
}

impl ProcessOutput {
    /// Returns whether the process exited with status 0.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Errors raised while running an external process.
#[derive(Debug, Clone, Error)]
pub enum ProcessError {
    /// The program could not be started.
    #[error("failed to start '{program}': {source}")]
    Spawn {
        /// Program name.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },

    /// The program exceeded its time budget and was killed.
    #[error("'{program}' did not finish within {timeout_secs} seconds")]
    Timeout {
        /// Program name.
        program: String,
        /// Budget that was exceeded.
        timeout_secs: u64,
    },

    /// Waiting on or talking to the program failed.
    #[error("I/O error while running '{program}': {source}")]
    Io {
        /// Program name.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },
}

/// Runs commands with a deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessRunner {
    timeout: Duration,
    poll_interval: Duration,
}

impl ProcessRunner {
    /// Creates a runner that kills processes after `timeout`.
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Overrides how often the child is polled for exit.
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Deadline applied to each process.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs `command`, writing `stdin` to it when given.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError`] when the process cannot be spawned, cannot be
    /// waited on, or exceeds the deadline.
    pub fn run(
        &self,
        command: &mut Command,
        stdin: Option<&str>,
    ) -> Result<ProcessOutput, ProcessError> {
        let program = command.get_program().to_string_lossy().into_owned();
        command
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!(target: PROCESS_TARGET, program = %program, "spawning process");
        let mut child = command.spawn().map_err(|source| ProcessError::Spawn {
            program: program.clone(),
            source: Arc::new(source),
        })?;

        let writer = stdin.and_then(|input| feed_stdin(&mut child, input.to_owned()));
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let exit_code = self.wait(&program, &mut child)?;
        if let Some(writer) = writer {
            drop(writer.join());
        }
        let output = ProcessOutput {
            stdout: collect(stdout),
            stderr: collect(stderr),
            exit_code,
        };
        debug!(
            target: PROCESS_TARGET,
            program = %program,
            exit_code = ?output.exit_code,
            stdout_bytes = output.stdout.len(),
            stderr_bytes = output.stderr.len(),
            "process finished"
        );
        Ok(output)
    }

    fn wait(&self, program: &str, child: &mut Child) -> Result<Option<i32>, ProcessError> {
        let start = Instant::now();
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status.code()),
                Ok(None) => {
                    if start.elapsed() > self.timeout {
                        warn!(
                            target: PROCESS_TARGET,
                            program,
                            timeout_secs = self.timeout.as_secs(),
                            "process timed out, killing it"
                        );
                        drop(child.kill());
                        drop(child.wait());
                        return Err(ProcessError::Timeout {
                            program: program.to_owned(),
                            timeout_secs: self.timeout.as_secs(),
                        });
                    }
                    thread::sleep(self.poll_interval);
                }
                Err(source) => {
                    return Err(ProcessError::Io {
                        program: program.to_owned(),
                        source: Arc::new(source),
                    });
                }
            }
        }
    }
}

/// Writes `input` on a separate thread so a child that does not read its
/// stdin cannot stall the poll loop. The pipe closes when the thread ends.
fn feed_stdin(child: &mut Child, input: String) -> Option<JoinHandle<()>> {
    let mut pipe = child.stdin.take()?;
    Some(thread::spawn(move || {
        if let Err(error) = pipe.write_all(input.as_bytes()) {
            debug!(target: PROCESS_TARGET, %error, "child closed stdin early");
        }
    }))
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        drop(pipe.read_to_end(&mut buffer));
        buffer
    })
}

fn collect(handle: Option<JoinHandle<Vec<u8>>>) -> String {
    handle
        .and_then(|handle| handle.join().ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}
