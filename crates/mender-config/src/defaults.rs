//! Built-in defaults for every configuration field.

/// Default log filter expression.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Checker invoked on staged files with a checked extension.
pub const DEFAULT_CHECKER_PROGRAM: &str = "flake8";

/// Diagnostic codes the checker is restricted to: syntax errors, undefined
/// names, redefinitions of unused names, indentation and tokenizer errors.
pub const DEFAULT_DIAGNOSTIC_CODES: &str = "F821,F822,F831,E111,E112,E113,E999,E902";

/// Extensions routed to the external checker.
pub const DEFAULT_CHECKED_EXTENSIONS: &str = "py";

/// Best-effort formatter run on staged files before checking.
pub const DEFAULT_FORMATTER_PROGRAM: &str = "autopep8";

/// Token budget for summarised diagnostics.
pub const DEFAULT_SUMMARY_MAX_TOKENS: usize = 512;

/// Upper bound on any single external process, in seconds.
pub const DEFAULT_PROCESS_TIMEOUT_SECS: u64 = 60;

/// Widest explicit line range a single locate call may request.
pub const DEFAULT_MAX_WINDOW_LINES: usize = 150;

/// Lines from the top of a file shown before keyword results.
pub const DEFAULT_LEADING_CONTEXT_LINES: usize = 80;

/// Half-width of the window around a keyword outside any structure.
pub const DEFAULT_PREVIEW_SIZE: usize = 10;

/// Matches kept per keyword.
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// Default log filter expression.
#[must_use]
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Default logging format.
#[must_use]
pub fn default_log_format() -> crate::logging::LogFormat {
    crate::logging::LogFormat::Compact
}
