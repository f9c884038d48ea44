//! Line-addressed view of a source file.
//!
//! Lines keep their terminators so that text outside an edited range is
//! written back byte for byte. Callers address lines 1-indexed and
//! inclusive; storage is 0-indexed.

use std::fs;
use std::io;
use std::path::Path;

/// Ordered lines of one text snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineIndex {
    lines: Vec<String>,
}

impl LineIndex {
    /// Reads `path` and splits it into lines.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the file cannot be read or is
    /// not valid UTF-8.
    pub fn load(path: &Path) -> io::Result<Self> {
        fs::read_to_string(path).map(|text| Self::from_text(&text))
    }

    /// Splits `text` into lines, keeping `\n` and `\r\n` terminators.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.split_inclusive('\n').map(str::to_owned).collect(),
        }
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns whether the snapshot has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines with their terminators, 0-indexed.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Text of lines `start..=end` (1-indexed), clamped to the file.
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> String {
        let first = start.max(1) - 1;
        let last = end.min(self.lines.len());
        self.lines
            .get(first..last)
            .map(<[String]>::concat)
            .unwrap_or_default()
    }

    /// Text of lines `start..=end` (1-indexed), each prefixed with its number.
    #[must_use]
    pub fn numbered_slice(&self, start: usize, end: usize) -> String {
        numbered(&self.slice(start, end), start.max(1))
    }

    /// Replaces lines `start..=end` (1-indexed) with `replacement` wholesale.
    ///
    /// Out-of-range bounds are clamped; callers validate them first.
    #[must_use]
    pub fn replace_lines(&self, start: usize, end: usize, replacement: &str) -> String {
        let head = start.max(1) - 1;
        let tail = end.min(self.lines.len()).max(head);
        let mut updated = String::new();
        for line in self.lines.iter().take(head) {
            updated.push_str(line);
        }
        updated.push_str(replacement);
        for line in self.lines.iter().skip(tail) {
            updated.push_str(line);
        }
        updated
    }

    /// Reassembles the full text.
    #[must_use]
    pub fn text(&self) -> String {
        self.lines.concat()
    }
}

/// Prefixes each line of `text` with its absolute line number.
///
/// The first line is numbered `first_line`; the format is `<n> <line>`.
#[must_use]
pub fn numbered(text: &str, first_line: usize) -> String {
    text.split_inclusive('\n')
        .enumerate()
        .map(|(offset, line)| format!("{} {line}", first_line + offset))
        .collect()
}

/// Removes the prefixes added by [`numbered`].
#[must_use]
pub fn strip_numbers(numbered_text: &str) -> String {
    numbered_text
        .split_inclusive('\n')
        .map(|line| {
            let rest = line.trim_start_matches(|c: char| c.is_ascii_digit());
            rest.strip_prefix(' ').unwrap_or(rest)
        })
        .collect()
}
