//! Locator failures.

use std::io;
use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::workspace::WorkspaceError;

/// Reasons a locate request produced no excerpt.
///
/// Finding no keyword is not an error; see
/// [`Located::NothingFound`](super::Located::NothingFound).
#[derive(Debug, Clone, Error)]
pub enum LocateError {
    /// The path could not be resolved.
    #[error(transparent)]
    Path(#[from] WorkspaceError),

    /// The file exists but could not be read.
    #[error("could not read {path}: {source}")]
    Read {
        /// Repository-relative path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },

    /// Neither keywords nor a line range were given.
    #[error("Please provide at least one keyword or a start_line and end_line to open the file")]
    MissingQuery,

    /// Only one end of the range was given.
    #[error("Please provide both start_line and end_line, or use keywords instead")]
    IncompleteRange,

    /// The range ends before it starts.
    #[error(
        "Invalid line range: start_line {start} is after end_line {end}, please swap or fix the bounds"
    )]
    InvertedRange {
        /// Requested first line.
        start: usize,
        /// Requested last line.
        end: usize,
    },

    /// The range is wider than a single call may show.
    #[error(
        "The requested range {start}-{end} spans {width} lines, which exceeds the limit of \
         {max} lines. Please narrow the range or search with keywords instead"
    )]
    WindowTooWide {
        /// Requested first line.
        start: usize,
        /// Requested last line.
        end: usize,
        /// `end - start`.
        width: usize,
        /// Configured limit.
        max: usize,
    },

    /// The range holds no line once clamped to the file.
    #[error(
        "The range {start}-{end} contains no lines; line numbers start at 1. \
         Please request at least one line"
    )]
    EmptyRange {
        /// Requested first line.
        start: usize,
        /// Requested last line.
        end: usize,
    },

    /// The range starts after the last line of the file.
    #[error(
        "start_line {start} is beyond the end of the file, which has {line_count} lines. \
         Please choose a start line within the file"
    )]
    StartBeyondEnd {
        /// Requested first line.
        start: usize,
        /// Lines in the file.
        line_count: usize,
    },
}

impl LocateError {
    /// Returns whether the file itself is missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Path(error) if error.is_not_found())
    }

    /// Returns whether the error is an infrastructure failure.
    #[must_use]
    pub const fn is_infrastructure(&self) -> bool {
        match self {
            Self::Read { .. } => true,
            Self::Path(error) => error.is_infrastructure(),
            _ => false,
        }
    }
}
