//! Shared configuration for the mender edit loop.
//!
//! [`Config`] is loaded through `ortho_config`, layering built-in defaults,
//! an optional configuration file (`--config-path` or `MENDER_CONFIG_PATH`),
//! `MENDER_*` environment variables and finally command-line flags.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

mod defaults;
mod logging;

pub use defaults::{
    DEFAULT_CHECKED_EXTENSIONS, DEFAULT_CHECKER_PROGRAM, DEFAULT_DIAGNOSTIC_CODES,
    DEFAULT_FORMATTER_PROGRAM, DEFAULT_LEADING_CONTEXT_LINES, DEFAULT_LOG_FILTER,
    DEFAULT_MAX_RESULTS, DEFAULT_MAX_WINDOW_LINES, DEFAULT_PREVIEW_SIZE,
    DEFAULT_PROCESS_TIMEOUT_SECS, DEFAULT_SUMMARY_MAX_TOKENS, default_log_filter,
    default_log_format,
};
pub use logging::LogFormat;

/// Runtime configuration for the `mender` binary and library.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "MENDER")]
pub struct Config {
    /// Tracing filter expression (`RUST_LOG` syntax).
    #[ortho_config(default = DEFAULT_LOG_FILTER.to_owned())]
    pub log_filter: String,
    /// Output format for log events.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
    /// Static checker run against staged files with a checked extension.
    #[ortho_config(default = DEFAULT_CHECKER_PROGRAM.to_owned())]
    pub checker_program: String,
    /// Comma-separated diagnostic codes the checker is restricted to.
    #[ortho_config(default = DEFAULT_DIAGNOSTIC_CODES.to_owned())]
    pub diagnostic_codes: String,
    /// Comma-separated extensions routed to the external checker.
    #[ortho_config(default = DEFAULT_CHECKED_EXTENSIONS.to_owned())]
    pub checked_extensions: String,
    /// Formatter applied to staged files; empty disables formatting.
    #[ortho_config(default = DEFAULT_FORMATTER_PROGRAM.to_owned())]
    pub formatter_program: String,
    /// Command line of an external summariser reading the prompt on stdin.
    pub summarizer_command: Option<String>,
    /// Token budget for summarised diagnostics.
    #[ortho_config(default = DEFAULT_SUMMARY_MAX_TOKENS)]
    pub summary_max_tokens: usize,
    /// Upper bound on external processes, in seconds.
    #[ortho_config(default = DEFAULT_PROCESS_TIMEOUT_SECS)]
    pub process_timeout_secs: u64,
    /// Widest explicit range a locate call may request.
    #[ortho_config(default = DEFAULT_MAX_WINDOW_LINES)]
    pub max_window_lines: usize,
    /// Leading lines shown ahead of keyword results.
    #[ortho_config(default = DEFAULT_LEADING_CONTEXT_LINES)]
    pub leading_context_lines: usize,
    /// Default keyword window half-width.
    #[ortho_config(default = DEFAULT_PREVIEW_SIZE)]
    pub default_preview_size: usize,
    /// Default number of matches kept per keyword.
    #[ortho_config(default = DEFAULT_MAX_RESULTS)]
    pub default_max_results: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
            log_format: default_log_format(),
            checker_program: DEFAULT_CHECKER_PROGRAM.to_owned(),
            diagnostic_codes: DEFAULT_DIAGNOSTIC_CODES.to_owned(),
            checked_extensions: DEFAULT_CHECKED_EXTENSIONS.to_owned(),
            formatter_program: DEFAULT_FORMATTER_PROGRAM.to_owned(),
            summarizer_command: None,
            summary_max_tokens: DEFAULT_SUMMARY_MAX_TOKENS,
            process_timeout_secs: DEFAULT_PROCESS_TIMEOUT_SECS,
            max_window_lines: DEFAULT_MAX_WINDOW_LINES,
            leading_context_lines: DEFAULT_LEADING_CONTEXT_LINES,
            default_preview_size: DEFAULT_PREVIEW_SIZE,
            default_max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl Config {
    /// Tracing filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Checker program name or path.
    #[must_use]
    pub fn checker_program(&self) -> &str {
        &self.checker_program
    }

    /// Diagnostic codes, trimmed, with empty entries dropped.
    #[must_use]
    pub fn diagnostic_codes(&self) -> Vec<String> {
        split_list(&self.diagnostic_codes)
    }

    /// Extensions routed to the external checker, without leading dots.
    #[must_use]
    pub fn checked_extensions(&self) -> Vec<String> {
        split_list(&self.checked_extensions)
            .into_iter()
            .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect()
    }

    /// Formatter program, or `None` when formatting is disabled.
    #[must_use]
    pub fn formatter_program(&self) -> Option<&str> {
        Some(self.formatter_program.trim()).filter(|program| !program.is_empty())
    }

    /// External summariser command line, when configured.
    #[must_use]
    pub fn summarizer_command(&self) -> Option<&str> {
        self.summarizer_command
            .as_deref()
            .map(str::trim)
            .filter(|command| !command.is_empty())
    }

    /// Token budget for summaries.
    #[must_use]
    pub const fn summary_max_tokens(&self) -> usize {
        self.summary_max_tokens
    }

    /// Timeout applied to every external process.
    #[must_use]
    pub const fn process_timeout(&self) -> Duration {
        Duration::from_secs(self.process_timeout_secs)
    }

    /// Widest explicit locate range.
    #[must_use]
    pub const fn max_window_lines(&self) -> usize {
        self.max_window_lines
    }

    /// Leading context lines for keyword results.
    #[must_use]
    pub const fn leading_context_lines(&self) -> usize {
        self.leading_context_lines
    }

    /// Default keyword window half-width.
    #[must_use]
    pub const fn default_preview_size(&self) -> usize {
        self.default_preview_size
    }

    /// Default per-keyword match limit.
    #[must_use]
    pub const fn default_max_results(&self) -> usize {
        self.default_max_results
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}
