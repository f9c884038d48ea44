//! Tree-sitter syntax checking with cached parsers.
//!
//! [`SyntaxChecker`] reports parse errors for files in a supported language
//! and passes everything else through untouched.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::SyntaxError;
use crate::language::SourceLanguage;
use crate::parser::SourceParser;

/// A syntax error located in a specific file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxFailure {
    /// File the failure belongs to.
    pub path: PathBuf,
    /// One-based line.
    pub line: usize,
    /// One-based column.
    pub column: usize,
    /// Description of the problem.
    pub message: String,
}

impl std::fmt::Display for SyntaxFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}",
            self.path.display(),
            self.line,
            self.column,
            self.message
        )
    }
}

/// Thread-safe syntax checker.
///
/// Parsers are created lazily, one per language, and reused.
pub struct SyntaxChecker {
    parsers: Mutex<HashMap<SourceLanguage, SourceParser>>,
}

impl SyntaxChecker {
    /// Creates a checker with no parsers loaded yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parsers: Mutex::new(HashMap::new()),
        }
    }

    /// Returns whether `path` has a language this checker understands.
    #[must_use]
    pub fn supports(path: &Path) -> bool {
        SourceLanguage::from_path(path).is_some()
    }

    /// Checks `content` as the source of `path`.
    ///
    /// Files in unsupported languages produce no failures.
    ///
    /// # Errors
    ///
    /// Returns an error if a parser cannot be created or the parser cache
    /// lock is poisoned.
    pub fn check(&self, path: &Path, content: &str) -> Result<Vec<SyntaxFailure>, SyntaxError> {
        let Some(language) = SourceLanguage::from_path(path) else {
            return Ok(Vec::new());
        };

        let mut parsers = self
            .parsers
            .lock()
            .map_err(|_| SyntaxError::parser_init(language, "lock poisoned"))?;

        let parser = if let Some(parser) = parsers.get_mut(&language) {
            parser
        } else {
            parsers.insert(language, SourceParser::new(language)?);
            parsers.get_mut(&language).ok_or_else(|| {
                SyntaxError::parser_init(language, "parser not found after insert")
            })?
        };

        let parsed = parser.parse(content)?;
        Ok(parsed
            .errors()
            .into_iter()
            .map(|error| SyntaxFailure {
                path: path.to_path_buf(),
                line: error.line,
                column: error.column,
                message: error.message,
            })
            .collect())
    }
}

impl Default for SyntaxChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SyntaxChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxChecker")
            .field("languages", &SourceLanguage::all())
            .finish_non_exhaustive()
    }
}
