//! Gated line-range editing.
//!
//! Every edit follows write-then-gate-then-promote:
//!
//! 1. The request is checked against the current file. Violations are
//!    [`EditOutcome::Rejected`] and touch nothing.
//! 2. The updated text is written to a staging sibling
//!    (`<stem>_patched.<ext>`), formatted on a best-effort basis, and
//!    handed to the [`ValidationGate`].
//! 3. A passing verdict promotes the staged content over the real file
//!    atomically. A failing verdict is summarised by the
//!    [`FeedbackSummarizer`] and returned as [`EditOutcome::Failed`].
//!
//! The staging copy is owned by a guard and removed on every exit path, so
//! any outcome other than `Applied` leaves the real file byte-identical.

mod error;
mod outcome;
mod request;
mod staging;

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{info, warn};

use crate::gate::{DiagnosticCodes, Formatter, GateError, NoopFormatter, ValidationGate};
use crate::line_index::LineIndex;
use crate::summarizer::{DiagnosticDigest, FeedbackSummarizer};
use crate::workspace::Workspace;

pub use error::EditorError;
pub use outcome::{AppliedEdit, EditOutcome, RejectReason};
pub use request::EditRequest;
pub use staging::{StagedFile, staging_path, write_atomic};

/// Tracing target for editor activity.
pub(crate) const EDITOR_TARGET: &str = "mender::editor";

/// Context lines shown around the replacement in an applied preview.
const PREVIEW_CONTEXT_LINES: usize = 10;

/// Applies validated line-range replacements within one repository.
///
/// [`Editor::edit`] takes `&mut self`: one editor per repository serialises
/// writes through the borrow checker.
pub struct Editor {
    workspace: Workspace,
    gate: Arc<dyn ValidationGate>,
    summarizer: Arc<dyn FeedbackSummarizer>,
    formatter: Arc<dyn Formatter>,
    codes: DiagnosticCodes,
    summary_budget: usize,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("workspace", &self.workspace)
            .field("codes", &self.codes)
            .field("summary_budget", &self.summary_budget)
            .finish_non_exhaustive()
    }
}

impl Editor {
    /// Creates an editor with no formatter and the default code set.
    #[must_use]
    pub fn new(
        workspace: Workspace,
        gate: Arc<dyn ValidationGate>,
        summarizer: Arc<dyn FeedbackSummarizer>,
    ) -> Self {
        Self {
            workspace,
            gate,
            summarizer,
            formatter: Arc::new(NoopFormatter),
            codes: DiagnosticCodes::new(mender_config::DEFAULT_DIAGNOSTIC_CODES.split(',')),
            summary_budget: mender_config::DEFAULT_SUMMARY_MAX_TOKENS,
        }
    }

    /// Sets the formatter run on staged files.
    #[must_use]
    pub fn with_formatter(mut self, formatter: Arc<dyn Formatter>) -> Self {
        self.formatter = formatter;
        self
    }

    /// Restricts the gate to `codes`.
    #[must_use]
    pub fn with_diagnostic_codes(mut self, codes: DiagnosticCodes) -> Self {
        self.codes = codes;
        self
    }

    /// Sets the token budget for summaries.
    #[must_use]
    pub const fn with_summary_budget(mut self, summary_budget: usize) -> Self {
        self.summary_budget = summary_budget;
        self
    }

    /// Repository the editor writes to.
    #[must_use]
    pub const fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Applies `request` if the result passes validation.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError`] when the target cannot be read, the staging
    /// copy cannot be written, or promotion fails. The real file is
    /// unchanged in every error case.
    pub fn edit(&mut self, request: &EditRequest) -> Result<EditOutcome, EditorError> {
        info!(
            target: EDITOR_TARGET,
            path = %request.relative_file_path,
            start_line = request.start_line,
            end_line = request.end_line,
            context = request.context.as_deref().unwrap_or_default(),
            "edit requested"
        );

        let (target, index) = match self.prepare(request)? {
            Ok(prepared) => prepared,
            Err(reason) => {
                info!(target: EDITOR_TARGET, %reason, "edit rejected");
                return Ok(EditOutcome::Rejected { reason });
            }
        };

        let replacement = with_trailing_newline(&request.patch);
        let updated = index.replace_lines(request.start_line, request.end_line, &replacement);

        let staged_path = staging_path(&target);
        let staged = StagedFile::create(staged_path.clone(), &updated)
            .map_err(|source| EditorError::stage(staged_path, source))?;

        if let Err(error) = self.formatter.format(staged.path()) {
            warn!(
                target: EDITOR_TARGET,
                path = %request.relative_file_path,
                %error,
                "formatting skipped"
            );
        }

        let verdict = match self.gate.validate(staged.path(), &self.codes) {
            Ok(verdict) => verdict,
            Err(error) => return Ok(Self::gate_unavailable(request, &error)),
        };

        if !verdict.passed {
            let raw = rewrite_staging_references(
                &verdict.combined_output(),
                staged.path(),
                &request.relative_file_path,
            );
            // The summariser may be slow; the staged copy goes first.
            drop(staged);
            let diagnostics = self.summarize(&raw);
            info!(
                target: EDITOR_TARGET,
                path = %request.relative_file_path,
                exit_code = ?verdict.exit_code,
                "edit failed validation"
            );
            return Ok(EditOutcome::Failed { diagnostics });
        }

        let promoted = staged
            .read()
            .map_err(|source| EditorError::stage(staged.path(), source))?;
        write_atomic(&target, &promoted)
            .map_err(|source| EditorError::promote(request.relative_file_path.clone(), source))?;
        drop(staged);

        let applied = applied_edit(request, &index, &promoted);
        info!(
            target: EDITOR_TARGET,
            path = %applied.path,
            start_line = applied.start_line,
            new_end_line = applied.new_end_line,
            line_count = applied.line_count,
            "edit applied"
        );
        Ok(EditOutcome::Applied(applied))
    }

    /// Checks preconditions and loads the target.
    ///
    /// The outer `Result` carries operational failures; the inner one the
    /// rejection reason.
    #[expect(
        clippy::type_complexity,
        reason = "nested result separates rejections from I/O failures"
    )]
    fn prepare(
        &self,
        request: &EditRequest,
    ) -> Result<Result<(Utf8PathBuf, LineIndex), RejectReason>, EditorError> {
        let EditRequest {
            start_line: start,
            end_line: end,
            ..
        } = *request;
        if start < 1 {
            return Ok(Err(RejectReason::StartBelowOne { start }));
        }
        if start > end {
            return Ok(Err(RejectReason::InvertedRange { start, end }));
        }
        if request.patch.is_empty() {
            return Ok(Err(RejectReason::EmptyPatch));
        }
        let target = match self.workspace.resolve(&request.relative_file_path) {
            Ok(target) => target,
            Err(error) => return Ok(Err(RejectReason::Path(error))),
        };
        let index = LineIndex::load(target.as_std_path())
            .map_err(|source| EditorError::read(request.relative_file_path.clone(), source))?;
        if end > index.len() {
            return Ok(Err(RejectReason::EndBeyondFile {
                end,
                line_count: index.len(),
            }));
        }
        Ok(Ok((target, index)))
    }

    fn summarize(&self, raw: &str) -> String {
        match self.summarizer.summarize(raw, self.summary_budget) {
            Ok(summary) if !summary.trim().is_empty() => summary,
            Ok(_) => DiagnosticDigest::digest(raw, self.summary_budget),
            Err(error) => {
                warn!(
                    target: EDITOR_TARGET,
                    %error,
                    "summariser failed, using diagnostic digest"
                );
                DiagnosticDigest::digest(raw, self.summary_budget)
            }
        }
    }

    fn gate_unavailable(request: &EditRequest, error: &GateError) -> EditOutcome {
        warn!(
            target: EDITOR_TARGET,
            path = %request.relative_file_path,
            %error,
            "validation could not run"
        );
        EditOutcome::Failed {
            diagnostics: format!(
                "Validation could not be completed: {error}. The change was discarded to keep \
                 the file safe."
            ),
        }
    }
}

fn with_trailing_newline(patch: &str) -> String {
    if patch.ends_with('\n') {
        patch.to_owned()
    } else {
        format!("{patch}\n")
    }
}

/// Points diagnostics about the staging copy at the real file instead.
fn rewrite_staging_references(raw: &str, staged: &Utf8Path, relative: &Utf8Path) -> String {
    let rewritten = raw.replace(staged.as_str(), relative.as_str());
    match (staged.file_name(), relative.file_name()) {
        (Some(staged_name), Some(real_name)) => rewritten.replace(staged_name, real_name),
        _ => rewritten,
    }
}

fn applied_edit(request: &EditRequest, original: &LineIndex, promoted: &str) -> AppliedEdit {
    let updated = LineIndex::from_text(promoted);
    let removed = request.end_line - request.start_line + 1;
    let kept = original.len() - removed;
    let inserted = updated.len().saturating_sub(kept);
    let new_end_line = (request.start_line + inserted).saturating_sub(1).max(request.start_line);

    let first = request.start_line.saturating_sub(PREVIEW_CONTEXT_LINES).max(1);
    let last = new_end_line.saturating_add(PREVIEW_CONTEXT_LINES).min(updated.len());
    AppliedEdit {
        path: request.relative_file_path.clone(),
        start_line: request.start_line,
        end_line: request.end_line,
        new_end_line,
        line_count: updated.len(),
        preview: updated.numbered_slice(first, last),
    }
}
