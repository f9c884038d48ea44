//! Gate backed by an external static checker.

use std::process::Command;

use camino::Utf8Path;
use tracing::debug;

use super::{DiagnosticCodes, GATE_TARGET, GateError, GateVerdict, ValidationGate};
use crate::process::ProcessRunner;

/// Runs a flake8-compatible checker against the staged file.
///
/// The checker is invoked as `<program> --isolated --select=<codes> <path>`
/// so user configuration cannot widen or narrow the checked codes.
#[derive(Debug, Clone)]
pub struct CommandGate {
    program: String,
    runner: ProcessRunner,
}

impl CommandGate {
    /// Creates a gate running `program` under `runner`.
    #[must_use]
    pub fn new(program: impl Into<String>, runner: ProcessRunner) -> Self {
        Self {
            program: program.into(),
            runner,
        }
    }

    /// Checker program.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    fn command(&self, path: &Utf8Path, codes: &DiagnosticCodes) -> Command {
        let mut command = Command::new(&self.program);
        command.arg("--isolated");
        if !codes.is_empty() {
            command.arg(format!("--select={codes}"));
        }
        command.arg(path.as_str());
        command
    }
}

impl ValidationGate for CommandGate {
    fn validate(
        &self,
        path: &Utf8Path,
        codes: &DiagnosticCodes,
    ) -> Result<GateVerdict, GateError> {
        let mut command = self.command(path, codes);
        let output = self.runner.run(&mut command, None)?;
        debug!(
            target: GATE_TARGET,
            program = %self.program,
            path = %path,
            exit_code = ?output.exit_code,
            "checker finished"
        );
        Ok(GateVerdict::from(output))
    }
}
