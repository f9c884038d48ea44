//! Edit outcomes and their plain-text rendering.

use camino::Utf8PathBuf;
use thiserror::Error;

use super::EditRequest;
use crate::workspace::WorkspaceError;

/// Result of one edit call.
#[derive(Debug, Clone)]
pub enum EditOutcome {
    /// The file now contains the replacement.
    Applied(AppliedEdit),
    /// The request was refused before anything was written.
    Rejected {
        /// Why it was refused.
        reason: RejectReason,
    },
    /// Validation failed; the file is unchanged.
    Failed {
        /// Summarised diagnostics.
        diagnostics: String,
    },
}

impl EditOutcome {
    /// Returns whether the edit was applied.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    /// Plain-text description for the calling agent.
    #[must_use]
    pub fn describe(&self, request: &EditRequest) -> String {
        let EditRequest {
            relative_file_path: path,
            start_line,
            end_line,
            ..
        } = request;
        match self {
            Self::Applied(applied) => applied.to_string(),
            Self::Rejected { reason } => reason.to_string(),
            Self::Failed { diagnostics } => format!(
                "The edit to {path} from line {start_line} to {end_line} was not applied because \
                 it did not pass validation:\n{diagnostics}\n\
                 The file is unchanged. Please reopen the file to check the current lines and \
                 indentation, then send a corrected edit."
            ),
        }
    }
}

/// Details of a promoted edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedEdit {
    /// Repository-relative path.
    pub path: Utf8PathBuf,
    /// First replaced line.
    pub start_line: usize,
    /// Last replaced line in the original file.
    pub end_line: usize,
    /// Last line of the replacement in the updated file.
    pub new_end_line: usize,
    /// Lines in the updated file.
    pub line_count: usize,
    /// Numbered excerpt of the replacement with surrounding context.
    pub preview: String,
}

impl std::fmt::Display for AppliedEdit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Successfully edited the file {} from line {} to {}.",
            self.path, self.start_line, self.end_line
        )?;
        writeln!(
            f,
            "The replacement now occupies lines {} to {}. Updated region:",
            self.start_line, self.new_end_line
        )?;
        f.write_str(&self.preview)
    }
}

/// Why a request was refused.
#[derive(Debug, Clone, Error)]
pub enum RejectReason {
    /// The path could not be resolved.
    #[error(transparent)]
    Path(#[from] WorkspaceError),

    /// Lines are numbered from 1.
    #[error("Invalid start_line {start}: line numbers start at 1, please reopen the file and use the numbers shown")]
    StartBelowOne {
        /// Requested first line.
        start: usize,
    },

    /// The range ends before it starts.
    #[error("Invalid line range: start_line {start} is after end_line {end}, please fix the bounds and try again")]
    InvertedRange {
        /// Requested first line.
        start: usize,
        /// Requested last line.
        end: usize,
    },

    /// The range runs past the end of the file.
    #[error("end_line {end} is beyond the end of the file, which has {line_count} lines. Please reopen the file and adjust the range")]
    EndBeyondFile {
        /// Requested last line.
        end: usize,
        /// Lines in the file.
        line_count: usize,
    },

    /// The replacement text is empty.
    #[error("The patch is empty, please provide the replacement code")]
    EmptyPatch,
}

impl RejectReason {
    /// Returns whether the target file is missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Path(error) if error.is_not_found())
    }
}
