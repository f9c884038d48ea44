//! Best-effort formatting of staged files.

use std::process::Command;

use camino::Utf8Path;
use tracing::debug;

use super::{GATE_TARGET, GateError, extension_of};
use crate::process::ProcessRunner;

/// Normalises a staged file in place before it is checked.
///
/// Failures are reported but never abort an edit.
pub trait Formatter: Send + Sync {
    /// Formats `path` in place.
    ///
    /// # Errors
    ///
    /// Returns [`GateError`] when the formatter cannot run or reports failure.
    fn format(&self, path: &Utf8Path) -> Result<(), GateError>;
}

/// Formatter that leaves files untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopFormatter;

impl Formatter for NoopFormatter {
    fn format(&self, _path: &Utf8Path) -> Result<(), GateError> {
        Ok(())
    }
}

/// Runs an autopep8-compatible formatter as
/// `<program> --in-place --aggressive <path>`.
///
/// Only files with one of the configured extensions are formatted.
#[derive(Debug, Clone)]
pub struct CommandFormatter {
    program: String,
    extensions: Vec<String>,
    runner: ProcessRunner,
}

impl CommandFormatter {
    /// Creates a formatter for files with the given extensions.
    #[must_use]
    pub fn new<I, S>(program: impl Into<String>, extensions: I, runner: ProcessRunner) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            program: program.into(),
            extensions: extensions
                .into_iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            runner,
        }
    }

    fn applies_to(&self, path: &Utf8Path) -> bool {
        extension_of(path).is_some_and(|ext| self.extensions.contains(&ext))
    }
}

impl Formatter for CommandFormatter {
    fn format(&self, path: &Utf8Path) -> Result<(), GateError> {
        if !self.applies_to(path) {
            return Ok(());
        }
        let mut command = Command::new(&self.program);
        command.args(["--in-place", "--aggressive", path.as_str()]);
        let output = self.runner.run(&mut command, None)?;
        debug!(
            target: GATE_TARGET,
            program = %self.program,
            path = %path,
            exit_code = ?output.exit_code,
            "formatter finished"
        );
        if output.success() {
            Ok(())
        } else {
            Err(GateError::internal(format!(
                "formatter '{}' exited with {:?}: {}",
                self.program,
                output.exit_code,
                output.stderr.trim()
            )))
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn skips_files_outside_its_extensions() {
        let formatter = CommandFormatter::new(
            "mender-test-no-such-formatter",
            ["py"],
            ProcessRunner::new(Duration::from_secs(1)),
        );
        formatter
            .format(Utf8Path::new("src/lib.rs"))
            .expect("skipped without running");
        assert!(formatter.format(Utf8Path::new("app.py")).is_err());
    }
}
