//! Operational editor failures.

use std::io;
use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Failures that stop an edit before an outcome can be decided.
///
/// Rejections and failed validation are outcomes, not errors; see
/// [`EditOutcome`](super::EditOutcome). The target file is never left
/// half-written when one of these is returned.
#[derive(Debug, Clone, Error)]
pub enum EditorError {
    /// The target could not be read.
    #[error("could not read {path}: {source}")]
    Read {
        /// Repository-relative path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },

    /// The staging copy could not be written.
    #[error("could not write staging file {path}: {source}")]
    Stage {
        /// Staging path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },

    /// The validated content could not replace the target.
    #[error("could not update {path}: {source}")]
    Promote {
        /// Repository-relative path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },
}

impl EditorError {
    pub(super) fn read(path: impl Into<Utf8PathBuf>, source: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source: Arc::new(source),
        }
    }

    pub(super) fn stage(path: impl Into<Utf8PathBuf>, source: io::Error) -> Self {
        Self::Stage {
            path: path.into(),
            source: Arc::new(source),
        }
    }

    pub(super) fn promote(path: impl Into<Utf8PathBuf>, source: io::Error) -> Self {
        Self::Promote {
            path: path.into(),
            source: Arc::new(source),
        }
    }
}
