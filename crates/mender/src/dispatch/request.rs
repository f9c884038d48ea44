//! Tool request deserialisation.
//!
//! Each JSONL line carries one request, tagged by its `tool` field:
//!
//! ```json
//! {"tool":"open_file","relative_file_path":"pkg/app.py","keywords":["connect"]}
//! {"tool":"editor_file","relative_file_path":"pkg/app.py","start_line":5,"end_line":5,"patch":"    return None\n"}
//! ```

use serde::{Deserialize, Serialize};

use super::errors::DispatchError;
use crate::editor::EditRequest;
use crate::locator::LocateRequest;

/// A request for one of the two tools.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "tool", rename_all = "snake_case")]
pub enum ToolRequest {
    /// Read an excerpt of a file.
    OpenFile(LocateRequest),
    /// Replace a line range of a file.
    EditorFile(EditRequest),
}

impl ToolRequest {
    /// Tool name as it appears on the wire.
    #[must_use]
    pub const fn tool(&self) -> &'static str {
        match self {
            Self::OpenFile(_) => "open_file",
            Self::EditorFile(_) => "editor_file",
        }
    }

    /// Parses one JSONL line.
    ///
    /// Trailing whitespace, including the newline delimiter, is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::MalformedJsonl`] for empty lines and invalid
    /// JSON, and [`DispatchError::InvalidArguments`] for unknown tools and
    /// schema violations.
    pub fn parse(line: &[u8]) -> Result<Self, DispatchError> {
        let trimmed = trim_trailing_whitespace(line);
        if trimmed.is_empty() {
            return Err(DispatchError::malformed("empty request line"));
        }
        serde_json::from_slice(trimmed).map_err(DispatchError::from_json_error)
    }
}

fn trim_trailing_whitespace(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |pos| pos + 1);
    bytes.get(..end).unwrap_or_default()
}
