//! Configurable gate and formatter doubles.
//!
//! These mirror the production traits closely enough for edit-loop tests to
//! script pass, fail and infrastructure-failure paths without external
//! tools, and they record what they saw while the staged file existed.

use std::fs;
use std::sync::{Arc, Mutex, PoisonError};

use camino::{Utf8Path, Utf8PathBuf};

use super::{DiagnosticCodes, Formatter, GateError, GateVerdict, ValidationGate};

/// One observed gate invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateCall {
    /// Path handed to the gate.
    pub path: Utf8PathBuf,
    /// File content at the time of the call, when readable.
    pub content: Option<String>,
    /// Codes handed to the gate.
    pub codes: String,
}

/// Gate returning a scripted result.
#[derive(Debug)]
pub struct ConfigurableGate {
    result: Result<GateVerdict, GateError>,
    calls: Mutex<Vec<GateCall>>,
}

impl ConfigurableGate {
    /// Creates a gate that always passes.
    #[must_use]
    pub fn passing() -> Self {
        Self::returning(Ok(GateVerdict::passing()))
    }

    /// Creates a gate that fails with `diagnostics` on stdout.
    ///
    /// `{path}` in the diagnostics is replaced with the validated path.
    #[must_use]
    pub fn failing(diagnostics: impl Into<String>) -> Self {
        Self::returning(Ok(GateVerdict::failing(diagnostics)))
    }

    /// Creates a gate whose checker times out.
    #[must_use]
    pub fn timing_out() -> Self {
        Self::returning(Err(GateError::Timeout {
            program: "flake8".to_owned(),
            timeout_secs: 60,
        }))
    }

    /// Creates a gate returning `result` on every call.
    #[must_use]
    pub fn returning(result: Result<GateVerdict, GateError>) -> Self {
        Self {
            result,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Invocations observed so far.
    #[must_use]
    pub fn calls(&self) -> Vec<GateCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ValidationGate for ConfigurableGate {
    fn validate(
        &self,
        path: &Utf8Path,
        codes: &DiagnosticCodes,
    ) -> Result<GateVerdict, GateError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(GateCall {
                path: path.to_path_buf(),
                content: fs::read_to_string(path).ok(),
                codes: codes.to_string(),
            });
        self.result.clone().map(|mut verdict| {
            verdict.stdout = verdict.stdout.replace("{path}", path.as_str());
            verdict
        })
    }
}

/// Formatter that records paths and optionally rewrites content.
#[derive(Debug, Default, Clone)]
pub struct RecordingFormatter {
    rewrite: Option<(String, String)>,
    fail: bool,
    seen: Arc<Mutex<Vec<Utf8PathBuf>>>,
}

impl RecordingFormatter {
    /// Creates a formatter that only records.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a formatter that replaces `from` with `to` in the file.
    #[must_use]
    pub fn rewriting(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            rewrite: Some((from.into(), to.into())),
            ..Self::default()
        }
    }

    /// Creates a formatter that always reports failure.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Paths formatted so far.
    #[must_use]
    pub fn seen(&self) -> Vec<Utf8PathBuf> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Formatter for RecordingFormatter {
    fn format(&self, path: &Utf8Path) -> Result<(), GateError> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_path_buf());
        if self.fail {
            return Err(GateError::internal("formatter failed"));
        }
        if let Some((from, to)) = &self.rewrite {
            let content = fs::read_to_string(path).map_err(|source| GateError::Read {
                path: path.to_string(),
                source: Arc::new(source),
            })?;
            fs::write(path, content.replace(from.as_str(), to))
                .map_err(|error| GateError::internal(error.to_string()))?;
        }
        Ok(())
    }
}
