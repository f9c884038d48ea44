//! Static validation of staged files.
//!
//! A [`ValidationGate`] inspects one staged file and reports a
//! [`GateVerdict`]. A verdict that did not pass is an expected outcome; a
//! [`GateError`] means the gate itself could not run (missing program,
//! timeout, unreadable file).

mod command;
mod formatter;
mod routed;
mod syntax;
mod test_doubles;

use std::convert::Infallible;
use std::fmt;
use std::io;
use std::str::FromStr;
use std::sync::Arc;

use camino::Utf8Path;
use thiserror::Error;

use crate::process::{ProcessError, ProcessOutput};

pub use command::CommandGate;
pub use formatter::{CommandFormatter, Formatter, NoopFormatter};
pub use routed::RoutedGate;
pub use syntax::SyntaxGate;
pub use test_doubles::{ConfigurableGate, GateCall, RecordingFormatter};

/// Tracing target for gate and formatter activity.
pub(crate) const GATE_TARGET: &str = "mender::gate";

/// Diagnostic codes a checker is restricted to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticCodes(Vec<String>);

impl DiagnosticCodes {
    /// Builds a code set from individual codes, dropping blanks.
    #[must_use]
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            codes
                .into_iter()
                .map(|code| code.as_ref().trim().to_ascii_uppercase())
                .filter(|code| !code.is_empty())
                .collect(),
        )
    }

    /// Returns whether no codes are selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the codes in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Returns whether `code` is selected.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.0.iter().any(|selected| selected == code)
    }
}

impl FromStr for DiagnosticCodes {
    type Err = Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(raw.split(',')))
    }
}

impl fmt::Display for DiagnosticCodes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(","))
    }
}

/// Result of running a gate against a staged file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GateVerdict {
    /// Whether the staged file may be promoted.
    pub passed: bool,
    /// Checker stdout.
    pub stdout: String,
    /// Checker stderr.
    pub stderr: String,
    /// Checker exit code, when one was produced.
    pub exit_code: Option<i32>,
}

impl GateVerdict {
    /// A passing verdict with no output.
    #[must_use]
    pub fn passing() -> Self {
        Self {
            passed: true,
            exit_code: Some(0),
            ..Self::default()
        }
    }

    /// A failing verdict carrying `stdout` as the diagnostics.
    #[must_use]
    pub fn failing(stdout: impl Into<String>) -> Self {
        Self {
            passed: false,
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code: Some(1),
        }
    }

    /// Combined stdout and stderr, separated by a newline when both exist.
    #[must_use]
    pub fn combined_output(&self) -> String {
        match (self.stdout.trim_end(), self.stderr.trim_end()) {
            (out, "") => out.to_owned(),
            ("", err) => err.to_owned(),
            (out, err) => format!("{out}\n{err}"),
        }
    }
}

impl From<ProcessOutput> for GateVerdict {
    fn from(output: ProcessOutput) -> Self {
        Self {
            passed: output.success(),
            stdout: output.stdout,
            stderr: output.stderr,
            exit_code: output.exit_code,
        }
    }
}

/// Failures that prevent a gate from producing a verdict.
#[derive(Debug, Clone, Error)]
pub enum GateError {
    /// The checker program could not be started.
    #[error("the checker '{program}' is unavailable: {source}")]
    Unavailable {
        /// Checker program.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },

    /// The checker exceeded its time budget.
    #[error("the checker '{program}' timed out after {timeout_secs} seconds")]
    Timeout {
        /// Checker program.
        program: String,
        /// Budget that was exceeded.
        timeout_secs: u64,
    },

    /// The staged file could not be read.
    #[error("could not read staged file {path}: {source}")]
    Read {
        /// Staged file path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },

    /// Any other failure while running the check.
    #[error("validation could not run: {message}")]
    Internal {
        /// Description of the failure.
        message: String,
    },
}

impl GateError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<ProcessError> for GateError {
    fn from(error: ProcessError) -> Self {
        match error {
            ProcessError::Spawn { program, source } => Self::Unavailable { program, source },
            ProcessError::Timeout {
                program,
                timeout_secs,
            } => Self::Timeout {
                program,
                timeout_secs,
            },
            ProcessError::Io { program, source } => Self::Internal {
                message: format!("I/O error while running '{program}': {source}"),
            },
        }
    }
}

/// Static check of one staged file.
///
/// Implementations must not modify the file, so repeated calls on the same
/// content give the same verdict.
pub trait ValidationGate: Send + Sync {
    /// Checks `path`, restricted to `codes` where the checker supports it.
    ///
    /// # Errors
    ///
    /// Returns [`GateError`] when no verdict could be produced.
    fn validate(&self, path: &Utf8Path, codes: &DiagnosticCodes)
    -> Result<GateVerdict, GateError>;
}

/// Lower-cased extension of `path`, when it has one.
pub(crate) fn extension_of(path: &Utf8Path) -> Option<String> {
    path.extension().map(str::to_ascii_lowercase)
}
