//! Source language detection and grammar lookup.
//!
//! [`SourceLanguage`] identifies the grammar used for a file and knows which
//! Tree-sitter node kinds delimit structural units (functions and classes)
//! in that grammar.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::structure::StructureKind;

/// Languages with a bundled Tree-sitter grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceLanguage {
    /// Python modules (`.py`, `.pyi`).
    Python,
    /// Rust sources (`.rs`).
    Rust,
    /// TypeScript and TSX sources (`.ts`, `.tsx`, `.mts`, `.cts`).
    TypeScript,
}

impl SourceLanguage {
    /// Maps a file extension (without the dot) to a language.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "py" | "pyi" => Some(Self::Python),
            "rs" => Some(Self::Rust),
            "ts" | "tsx" | "mts" | "cts" => Some(Self::TypeScript),
            _ => None,
        }
    }

    /// Maps a path to a language using its extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Tree-sitter grammar for this language.
    #[must_use]
    pub fn grammar(self) -> tree_sitter::Language {
        match self {
            Self::Python => tree_sitter_python::LANGUAGE.into(),
            Self::Rust => tree_sitter_rust::LANGUAGE.into(),
            // TSX is a superset, so plain `.ts` parses with it too.
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    /// Lower-case identifier used in configuration and messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Rust => "rust",
            Self::TypeScript => "typescript",
        }
    }

    /// Every language with a bundled grammar.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Python, Self::Rust, Self::TypeScript]
    }

    /// Classifies a node kind as a structural unit for this grammar.
    ///
    /// Python `decorated_definition` nodes are handled by the structure
    /// walker because their kind depends on the wrapped definition.
    #[must_use]
    pub fn structure_kind(self, node_kind: &str) -> Option<StructureKind> {
        match (self, node_kind) {
            (Self::Python, "function_definition")
            | (Self::Rust, "function_item")
            | (
                Self::TypeScript,
                "function_declaration" | "generator_function_declaration" | "method_definition",
            ) => Some(StructureKind::Function),
            (Self::Python, "class_definition")
            | (Self::Rust, "impl_item" | "trait_item" | "struct_item" | "enum_item" | "mod_item")
            | (
                Self::TypeScript,
                "class_declaration" | "abstract_class_declaration" | "interface_declaration",
            ) => Some(StructureKind::Class),
            _ => None,
        }
    }
}

impl fmt::Display for SourceLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a language name is not recognised.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unsupported language: '{0}'")]
pub struct UnknownLanguageName(String);

impl UnknownLanguageName {
    /// The rejected input.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.0
    }
}

impl FromStr for SourceLanguage {
    type Err = UnknownLanguageName;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "python" | "py" => Ok(Self::Python),
            "rust" | "rs" => Ok(Self::Rust),
            "typescript" | "ts" | "tsx" => Ok(Self::TypeScript),
            other => Err(UnknownLanguageName(other.to_owned())),
        }
    }
}
