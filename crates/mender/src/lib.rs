//! Validated, line-addressed source editing for language-model agents.
//!
//! The crate exposes two tools bound to one repository:
//!
//! - the [`locator::Locator`] answers "show me where X is" with numbered
//!   excerpts, expanding keyword hits to the enclosing function or class;
//! - the [`editor::Editor`] replaces a line range only after the result has
//!   been staged, formatted and passed through a [`gate::ValidationGate`].
//!
//! Failed validations come back as short corrective feedback produced by a
//! [`summarizer::FeedbackSummarizer`], and the real file is never left
//! half-written. The [`dispatch::Toolbox`] routes typed JSONL requests to
//! both tools; the `mender` binary wraps it in a CLI.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use mender::editor::{EditRequest, Editor};
//! use mender::gate::SyntaxGate;
//! use mender::summarizer::DiagnosticDigest;
//! use mender::workspace::Workspace;
//!
//! let mut editor = Editor::new(
//!     Workspace::new("/path/to/repo"),
//!     Arc::new(SyntaxGate::new()),
//!     Arc::new(DiagnosticDigest),
//! );
//! let request = EditRequest::new("src/lib.rs", 5, 5, "    42\n");
//! let outcome = editor.edit(&request)?;
//! println!("{}", outcome.describe(&request));
//! # Ok::<(), mender::editor::EditorError>(())
//! ```

pub mod cli;
pub mod dispatch;
pub mod editor;
pub mod gate;
pub mod line_index;
pub mod locator;
pub mod process;
pub mod summarizer;
pub mod telemetry;
pub mod workspace;

pub use cli::run;

#[cfg(test)]
mod tests;
