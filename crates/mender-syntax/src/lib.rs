//! Tree-sitter powered source analysis for the mender edit loop.
//!
//! This crate provides:
//!
//! - **Language detection** via [`SourceLanguage`]
//! - **Structural ranges** via [`CodeStructureIndex`], mapping a line to the
//!   innermost function or class that contains it
//! - **Syntax checking** via [`SyntaxChecker`] for languages without an
//!   external checker
//!
//! # Supported Languages
//!
//! - Python (`.py`, `.pyi`)
//! - Rust (`.rs`)
//! - TypeScript (`.ts`, `.tsx`, `.mts`, `.cts`)
//!
//! # Example
//!
//! ```
//! use mender_syntax::{CodeStructureIndex, SourceLanguage, StructureKind};
//!
//! let source = "class Pool:\n    def connect(self):\n        return 1\n";
//! let index = CodeStructureIndex::build(source, SourceLanguage::Python);
//! let range = index.innermost_containing(2).expect("inside connect");
//! assert_eq!(range.kind, StructureKind::Function);
//! assert_eq!((range.start_line, range.end_line), (1, 2));
//! ```

mod error;
mod language;
mod parser;
mod structure;
mod syntax_check;

pub use error::SyntaxError;
pub use language::{SourceLanguage, UnknownLanguageName};
pub use parser::{ParsedSource, SourceParser, SyntaxDiagnostic};
pub use structure::{CodeStructureIndex, StructuralRange, StructureKind, structural_ranges};
pub use syntax_check::{SyntaxChecker, SyntaxFailure};

#[cfg(test)]
mod tests;
