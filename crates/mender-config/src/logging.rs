//! Log output format selection.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How log events are rendered on stderr.
///
/// Parsed case-insensitively from `json` or `compact`, whether it comes from
/// a file, `MENDER_LOG_FORMAT` or `--log-format`.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// One JSON object per event, fields flattened into the top level.
    Json,
    /// Terse single-line text for people watching a terminal.
    #[default]
    Compact,
}

impl LogFormat {
    /// Whether the output is meant for machines; such output never carries
    /// terminal colour codes.
    #[must_use]
    pub const fn is_structured(self) -> bool {
        matches!(self, Self::Json)
    }
}
