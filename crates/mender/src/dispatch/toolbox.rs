//! Routing of tool requests to the locator and editor.

use std::io::{BufRead, Write};
use std::sync::Arc;

use camino::Utf8PathBuf;
use mender_config::Config;
use tracing::{debug, info, warn};

use super::errors::DispatchError;
use super::request::ToolRequest;
use super::response::{ResponseStatus, ResponseWriter, ToolResponse};
use crate::editor::{EditOutcome, EditRequest, Editor, RejectReason};
use crate::gate::{
    CommandFormatter, CommandGate, DiagnosticCodes, Formatter, NoopFormatter, RoutedGate,
    SyntaxGate, ValidationGate,
};
use crate::locator::{LocateRequest, Located, Locator, LocatorSettings};
use crate::process::ProcessRunner;
use crate::summarizer::{CommandSummarizer, DiagnosticDigest, FeedbackSummarizer};
use crate::workspace::{Workspace, WorkspaceError};

/// Tracing target for dispatch operations.
pub(crate) const DISPATCH_TARGET: &str = "mender::dispatch";

/// The two tools bound to one repository.
#[derive(Debug)]
pub struct Toolbox {
    locator: Locator,
    editor: Editor,
}

impl Toolbox {
    /// Combines a locator and an editor.
    #[must_use]
    pub const fn new(locator: Locator, editor: Editor) -> Self {
        Self { locator, editor }
    }

    /// Builds the production toolbox for the repository at `root`.
    ///
    /// Files with a checked extension go through the external checker and
    /// formatter; other files get a tree-sitter syntax check. Without a
    /// summariser command, failures are condensed by [`DiagnosticDigest`].
    #[must_use]
    pub fn from_config(root: impl Into<Utf8PathBuf>, config: &Config) -> Self {
        let workspace = Workspace::new(root);
        let runner = ProcessRunner::new(config.process_timeout());
        let extensions = config.checked_extensions();

        let gate: Arc<dyn ValidationGate> = Arc::new(RoutedGate::new(
            extensions.iter(),
            Arc::new(CommandGate::new(config.checker_program(), runner)),
            Arc::new(SyntaxGate::new()),
        ));
        let formatter: Arc<dyn Formatter> = match config.formatter_program() {
            Some(program) => Arc::new(CommandFormatter::new(program, extensions.iter(), runner)),
            None => Arc::new(NoopFormatter),
        };
        let summarizer = summarizer_for(config, runner);

        let locator = Locator::new(workspace.clone(), LocatorSettings::from(config));
        let editor = Editor::new(workspace, gate, summarizer)
            .with_formatter(formatter)
            .with_diagnostic_codes(DiagnosticCodes::new(config.diagnostic_codes()))
            .with_summary_budget(config.summary_max_tokens());
        Self::new(locator, editor)
    }

    /// Runs one request and describes the result in plain text.
    pub fn handle(&mut self, request: &ToolRequest) -> ToolResponse {
        debug!(target: DISPATCH_TARGET, tool = request.tool(), "dispatching request");
        let response = match request {
            ToolRequest::OpenFile(locate) => self.open_file(locate),
            ToolRequest::EditorFile(edit) => self.editor_file(edit),
        };
        info!(
            target: DISPATCH_TARGET,
            tool = request.tool(),
            status = ?response.status,
            "request handled"
        );
        response
    }

    /// Parses and runs one JSONL request line.
    pub fn handle_line(&mut self, line: &[u8]) -> ToolResponse {
        match ToolRequest::parse(line) {
            Ok(request) => self.handle(&request),
            Err(error) => {
                warn!(target: DISPATCH_TARGET, %error, "rejected request line");
                ToolResponse::from_error(&error)
            }
        }
    }

    /// Answers every non-blank line of `reader` with one line on `writer`.
    ///
    /// Returns the most severe status seen, or `None` when no request was
    /// read.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] when reading or writing fails.
    pub fn serve<R: BufRead, W: Write>(
        &mut self,
        reader: R,
        writer: W,
    ) -> Result<Option<ResponseStatus>, DispatchError> {
        let mut responses = ResponseWriter::new(writer);
        let mut worst: Option<ResponseStatus> = None;
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let response = self.handle_line(line.as_bytes());
            responses.write_response(&response)?;
            worst = Some(match worst {
                Some(previous) if previous.exit_code() >= response.status.exit_code() => previous,
                _ => response.status,
            });
        }
        Ok(worst)
    }

    fn open_file(&self, request: &LocateRequest) -> ToolResponse {
        match self.locator.locate(request) {
            Ok(located @ Located::NothingFound { .. }) => {
                ToolResponse::new(ResponseStatus::NotFound, located.to_string())
            }
            Ok(located) => ToolResponse::success(located.to_string()),
            Err(error) => {
                let status = if error.is_not_found() {
                    ResponseStatus::NotFound
                } else if error.is_infrastructure() {
                    ResponseStatus::InfrastructureError
                } else {
                    ResponseStatus::UsageError
                };
                ToolResponse::new(status, error.to_string())
            }
        }
    }

    fn editor_file(&mut self, request: &EditRequest) -> ToolResponse {
        match self.editor.edit(request) {
            Ok(outcome) => {
                let status = match &outcome {
                    EditOutcome::Applied(_) => ResponseStatus::Success,
                    EditOutcome::Rejected { reason } => rejection_status(reason),
                    EditOutcome::Failed { .. } => ResponseStatus::ValidationFailed,
                };
                ToolResponse::new(status, outcome.describe(request))
            }
            Err(error) => {
                warn!(target: DISPATCH_TARGET, %error, "edit aborted");
                ToolResponse::new(
                    ResponseStatus::InfrastructureError,
                    format!(
                        "The edit to {} could not be completed: {error}. The file is unchanged.",
                        request.relative_file_path
                    ),
                )
            }
        }
    }
}

fn rejection_status(reason: &RejectReason) -> ResponseStatus {
    match reason {
        RejectReason::Path(WorkspaceError::NotFound { .. }) => ResponseStatus::NotFound,
        RejectReason::Path(error) if error.is_infrastructure() => {
            ResponseStatus::InfrastructureError
        }
        _ => ResponseStatus::UsageError,
    }
}

fn summarizer_for(config: &Config, runner: ProcessRunner) -> Arc<dyn FeedbackSummarizer> {
    let Some(command_line) = config.summarizer_command() else {
        return Arc::new(DiagnosticDigest);
    };
    match CommandSummarizer::from_command_line(command_line, runner) {
        Ok(summarizer) => Arc::new(summarizer),
        Err(error) => {
            warn!(
                target: DISPATCH_TARGET,
                %error,
                "ignoring summariser command, using diagnostic digest"
            );
            Arc::new(DiagnosticDigest)
        }
    }
}
