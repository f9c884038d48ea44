//! Error types for parsing and syntax checking.

use thiserror::Error;

use crate::language::SourceLanguage;

/// Errors from parsing operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SyntaxError {
    /// Failed to initialise the Tree-sitter parser for a language.
    #[error("failed to initialise parser for {language}: {message}")]
    ParserInit {
        /// The language that failed to initialise.
        language: SourceLanguage,
        /// Description of the failure.
        message: String,
    },

    /// Tree-sitter did not produce a tree.
    #[error("failed to parse {language}: {message}")]
    Parse {
        /// The language that failed to parse.
        language: SourceLanguage,
        /// Description of the failure.
        message: String,
    },
}

impl SyntaxError {
    /// Creates a parser initialisation error.
    #[must_use]
    pub fn parser_init(language: SourceLanguage, message: impl Into<String>) -> Self {
        Self::ParserInit {
            language,
            message: message.into(),
        }
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse(language: SourceLanguage, message: impl Into<String>) -> Self {
        Self::Parse {
            language,
            message: message.into(),
        }
    }
}
