//! Locate request schema.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// Request to show part of a file.
///
/// Either `keywords` or both `start_line` and `end_line` (1-indexed,
/// inclusive) must be supplied. Unset sizes fall back to the locator's
/// configured defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LocateRequest {
    /// Path relative to the repository root.
    pub relative_file_path: Utf8PathBuf,
    /// Literal, case-sensitive search terms.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// First line of an explicit range.
    #[serde(default)]
    pub start_line: Option<usize>,
    /// Last line of an explicit range.
    #[serde(default)]
    pub end_line: Option<usize>,
    /// Half-width of the window around a match outside any structure.
    #[serde(default)]
    pub preview_size: Option<usize>,
    /// Matches kept per keyword.
    #[serde(default)]
    pub max_num_result: Option<usize>,
}

impl LocateRequest {
    /// Creates a request for `path` with no query yet.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            relative_file_path: path.into(),
            keywords: Vec::new(),
            start_line: None,
            end_line: None,
            preview_size: None,
            max_num_result: None,
        }
    }

    /// Adds keywords to search for.
    #[must_use]
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords.extend(keywords.into_iter().map(Into::into));
        self
    }

    /// Requests an explicit line range.
    #[must_use]
    pub const fn with_range(mut self, start_line: usize, end_line: usize) -> Self {
        self.start_line = Some(start_line);
        self.end_line = Some(end_line);
        self
    }

    /// Overrides the preview window half-width.
    #[must_use]
    pub const fn with_preview_size(mut self, preview_size: usize) -> Self {
        self.preview_size = Some(preview_size);
        self
    }

    /// Overrides the per-keyword match limit.
    #[must_use]
    pub const fn with_max_results(mut self, max_num_result: usize) -> Self {
        self.max_num_result = Some(max_num_result);
        self
    }

    /// Keywords with empty entries removed.
    pub fn effective_keywords(&self) -> impl Iterator<Item = &str> {
        self.keywords
            .iter()
            .map(String::as_str)
            .filter(|keyword| !keyword.is_empty())
    }
}
