//! Gate backed by the tree-sitter syntax checker.

use std::fs;
use std::sync::Arc;

use camino::Utf8Path;
use mender_syntax::SyntaxChecker;

use super::{DiagnosticCodes, GateError, GateVerdict, ValidationGate};

/// Code reported for every tree-sitter syntax failure.
const SYNTAX_ERROR_CODE: &str = "E999";

/// Reports parse errors for languages with a bundled grammar.
///
/// Only syntax is checked, so the selected codes do not narrow the output.
/// Files in unsupported languages always pass.
#[derive(Debug, Default)]
pub struct SyntaxGate {
    checker: SyntaxChecker,
}

impl SyntaxGate {
    /// Creates a gate with its own parser cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ValidationGate for SyntaxGate {
    fn validate(
        &self,
        path: &Utf8Path,
        _codes: &DiagnosticCodes,
    ) -> Result<GateVerdict, GateError> {
        let content = fs::read_to_string(path).map_err(|source| GateError::Read {
            path: path.to_string(),
            source: Arc::new(source),
        })?;
        let failures = self
            .checker
            .check(path.as_std_path(), &content)
            .map_err(|error| GateError::internal(error.to_string()))?;

        if failures.is_empty() {
            return Ok(GateVerdict::passing());
        }
        let report: String = failures
            .iter()
            .map(|failure| {
                format!(
                    "{path}:{}:{}: {SYNTAX_ERROR_CODE} {}\n",
                    failure.line, failure.column, failure.message
                )
            })
            .collect();
        Ok(GateVerdict::failing(report))
    }
}
