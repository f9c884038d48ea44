//! Condensing checker output into short corrective feedback.
//!
//! The editor never returns raw checker output on its own: it goes through a
//! [`FeedbackSummarizer`] first. [`CommandSummarizer`] delegates to an
//! external language-model CLI; [`DiagnosticDigest`] is the deterministic
//! fallback used when none is configured or the external one fails.

mod command;

use thiserror::Error;

use crate::process::ProcessError;

pub use command::{CommandSummarizer, SUMMARY_PROMPT};

/// Turns raw diagnostics into a short natural-language summary.
#[cfg_attr(test, mockall::automock)]
pub trait FeedbackSummarizer: Send + Sync {
    /// Summarises `raw` in at most `max_tokens` whitespace-delimited tokens.
    ///
    /// # Errors
    ///
    /// Returns [`SummarizeError`] when no summary could be produced.
    fn summarize(&self, raw: &str, max_tokens: usize) -> Result<String, SummarizeError>;
}

/// Failures producing a summary.
#[derive(Debug, Clone, Error)]
pub enum SummarizeError {
    /// The summariser process could not run to completion.
    #[error(transparent)]
    Process(#[from] ProcessError),

    /// The summariser exited unsuccessfully.
    #[error("summariser '{program}' exited with {exit_code:?}: {stderr}")]
    Failed {
        /// Summariser program.
        program: String,
        /// Exit code, if any.
        exit_code: Option<i32>,
        /// Captured stderr.
        stderr: String,
    },

    /// The summariser produced no text.
    #[error("summariser '{program}' produced no output")]
    Empty {
        /// Summariser program.
        program: String,
    },

    /// The configured command line was empty.
    #[error("summariser command is empty")]
    EmptyCommand,
}

/// Returns the same text for every input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CannedSummarizer {
    text: String,
}

impl CannedSummarizer {
    /// Creates a summariser answering with `text`.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl FeedbackSummarizer for CannedSummarizer {
    fn summarize(&self, _raw: &str, max_tokens: usize) -> Result<String, SummarizeError> {
        Ok(bound_tokens(&self.text, max_tokens))
    }
}

/// Deterministic condenser for `path:line:col: CODE message` diagnostics.
///
/// Recognised lines become `- line N: message (CODE)` bullets. When nothing
/// is recognised the first few non-empty lines are kept verbatim.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiagnosticDigest;

const FALLBACK_LINES: usize = 5;

impl DiagnosticDigest {
    /// Produces the digest without a fallible signature.
    #[must_use]
    pub fn digest(raw: &str, max_tokens: usize) -> String {
        let bullets: Vec<String> = raw
            .lines()
            .filter_map(parse_diagnostic)
            .map(|d| format!("- line {}: {} ({})", d.line, d.message, d.code))
            .collect();
        let body = if bullets.is_empty() {
            raw.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .take(FALLBACK_LINES)
                .collect::<Vec<_>>()
                .join("\n")
        } else {
            bullets.join("\n")
        };
        bound_tokens(&body, max_tokens)
    }
}

impl FeedbackSummarizer for DiagnosticDigest {
    fn summarize(&self, raw: &str, max_tokens: usize) -> Result<String, SummarizeError> {
        Ok(Self::digest(raw, max_tokens))
    }
}

struct Diagnostic<'a> {
    line: usize,
    code: &'a str,
    message: &'a str,
}

fn parse_diagnostic(line: &str) -> Option<Diagnostic<'_>> {
    let mut parts = line.splitn(4, ':');
    let _path = parts.next().filter(|path| !path.trim().is_empty())?;
    let line_no: usize = parts.next()?.trim().parse().ok()?;
    let _column: usize = parts.next()?.trim().parse().ok()?;
    let (code, message) = parts.next()?.trim().split_once(' ')?;

    let looks_like_code = code.len() >= 2
        && code.starts_with(|c: char| c.is_ascii_uppercase())
        && code.chars().skip(1).all(|c| c.is_ascii_digit());
    looks_like_code.then(|| Diagnostic {
        line: line_no,
        code,
        message: message.trim(),
    })
}

/// Keeps at most `max_tokens` whitespace-delimited tokens of `text`,
/// preserving line breaks. Truncated output ends with ` ...`.
#[must_use]
pub fn bound_tokens(text: &str, max_tokens: usize) -> String {
    let mut kept: Vec<String> = Vec::new();
    let mut used = 0usize;
    for line in text.trim().lines() {
        let words: Vec<&str> = line.split_whitespace().collect();
        if used + words.len() <= max_tokens {
            used += words.len();
            kept.push(line.trim_end().to_owned());
            continue;
        }
        let remaining = max_tokens - used;
        let partial: Vec<&str> = words.into_iter().take(remaining).collect();
        if partial.is_empty() {
            kept.push("...".to_owned());
        } else {
            kept.push(format!("{} ...", partial.join(" ")));
        }
        break;
    }
    kept.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn digest_condenses_checker_lines() {
        let raw = concat!(
            "pkg/app.py:12:5: F821 undefined name 'sock'\n",
            "pkg/app.py:14:1: E999 IndentationError: unexpected indent\n",
        );
        assert_eq!(
            DiagnosticDigest::digest(raw, 100),
            "- line 12: undefined name 'sock' (F821)\n\
             - line 14: IndentationError: unexpected indent (E999)"
        );
    }

    #[test]
    fn digest_falls_back_to_leading_lines() {
        let raw = "\n\nTraceback (most recent call last):\n  boom\n";
        assert_eq!(
            DiagnosticDigest::digest(raw, 100),
            "Traceback (most recent call last):\nboom"
        );
    }

    #[rstest]
    #[case("a b c\nd e", 10, "a b c\nd e")]
    #[case("a b c\nd e", 4, "a b c\nd ...")]
    #[case("a b c\nd e", 3, "a b c\n...")]
    #[case("a b c", 0, "...")]
    fn bounds_tokens(#[case] text: &str, #[case] max: usize, #[case] expected: &str) {
        assert_eq!(bound_tokens(text, max), expected);
    }

    #[test]
    fn canned_summarizer_ignores_input() {
        let summarizer = CannedSummarizer::new("use the defined name");
        let summary = summarizer.summarize("anything", 10).expect("summary");
        assert_eq!(summary, "use the defined name");
    }
}
