//! Summariser delegating to an external language-model CLI.

use std::process::Command;

use tracing::debug;

use super::{FeedbackSummarizer, SummarizeError, bound_tokens};
use crate::process::ProcessRunner;

/// Instruction placed ahead of the raw diagnostics on stdin.
pub const SUMMARY_PROMPT: &str = "Describe this error message in plain text.";

const SUMMARIZER_TARGET: &str = "mender::summarizer";

/// Pipes the prompt and diagnostics to a command and returns its stdout.
#[derive(Debug, Clone)]
pub struct CommandSummarizer {
    argv: Vec<String>,
    runner: ProcessRunner,
}

impl CommandSummarizer {
    /// Creates a summariser from a whitespace-separated command line.
    ///
    /// # Errors
    ///
    /// Returns [`SummarizeError::EmptyCommand`] when `command_line` has no
    /// words.
    pub fn from_command_line(
        command_line: &str,
        runner: ProcessRunner,
    ) -> Result<Self, SummarizeError> {
        let argv: Vec<String> = command_line
            .split_whitespace()
            .map(str::to_owned)
            .collect();
        if argv.is_empty() {
            return Err(SummarizeError::EmptyCommand);
        }
        Ok(Self { argv, runner })
    }

    fn program(&self) -> &str {
        self.argv.first().map_or("", String::as_str)
    }
}

impl FeedbackSummarizer for CommandSummarizer {
    fn summarize(&self, raw: &str, max_tokens: usize) -> Result<String, SummarizeError> {
        let program = self.program().to_owned();
        let mut command = Command::new(&program);
        command.args(self.argv.iter().skip(1));

        let prompt = format!("{SUMMARY_PROMPT}\n\n{raw}\n");
        let output = self.runner.run(&mut command, Some(&prompt))?;
        if !output.success() {
            return Err(SummarizeError::Failed {
                program,
                exit_code: output.exit_code,
                stderr: output.stderr.trim().to_owned(),
            });
        }
        let summary = output.stdout.trim();
        if summary.is_empty() {
            return Err(SummarizeError::Empty { program });
        }
        debug!(
            target: SUMMARIZER_TARGET,
            program = %program,
            summary_bytes = summary.len(),
            "summary produced"
        );
        Ok(bound_tokens(summary, max_tokens))
    }
}
