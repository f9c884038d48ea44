//! Edit request schema.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// Request to replace a line range of one file.
///
/// `start_line` and `end_line` are 1-indexed and inclusive. The range is
/// replaced wholesale by `patch`, whose indentation is the caller's
/// responsibility.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EditRequest {
    /// Path relative to the repository root.
    pub relative_file_path: Utf8PathBuf,
    /// First line replaced.
    pub start_line: usize,
    /// Last line replaced.
    pub end_line: usize,
    /// Replacement text.
    pub patch: String,
    /// Free-form rationale, logged but never interpreted.
    #[serde(default)]
    pub context: Option<String>,
}

impl EditRequest {
    /// Creates a request without a rationale.
    #[must_use]
    pub fn new(
        path: impl Into<Utf8PathBuf>,
        start_line: usize,
        end_line: usize,
        patch: impl Into<String>,
    ) -> Self {
        Self {
            relative_file_path: path.into(),
            start_line,
            end_line,
            patch: patch.into(),
            context: None,
        }
    }

    /// Attaches a rationale.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}
