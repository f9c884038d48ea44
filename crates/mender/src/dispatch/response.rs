//! Plain-text responses and their JSONL framing.

use std::io::Write;

use serde::{Deserialize, Serialize};

use super::errors::DispatchError;

/// Classification of a response, used for exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    /// The tool did what was asked.
    Success,
    /// The request was malformed or out of bounds.
    UsageError,
    /// The file or keyword was not found.
    NotFound,
    /// The edit did not pass validation.
    ValidationFailed,
    /// The filesystem or an external tool failed.
    InfrastructureError,
}

impl ResponseStatus {
    /// Process exit code for this status.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::UsageError | Self::NotFound | Self::ValidationFailed => 1,
            Self::InfrastructureError => 2,
        }
    }
}

/// Plain-text answer to one tool request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ToolResponse {
    /// Outcome class.
    pub status: ResponseStatus,
    /// Text for the calling agent.
    pub text: String,
}

impl ToolResponse {
    /// Creates a response.
    #[must_use]
    pub fn new(status: ResponseStatus, text: impl Into<String>) -> Self {
        Self {
            status,
            text: text.into(),
        }
    }

    /// Creates a success response.
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self::new(ResponseStatus::Success, text)
    }

    /// Creates a response describing a dispatch error.
    #[must_use]
    pub fn from_error(error: &DispatchError) -> Self {
        let status = if error.exit_status() == 1 {
            ResponseStatus::UsageError
        } else {
            ResponseStatus::InfrastructureError
        };
        Self::new(status, error.to_string())
    }
}

/// Writes responses as JSONL.
pub struct ResponseWriter<W> {
    writer: W,
}

impl<W: Write> ResponseWriter<W> {
    /// Wraps `writer`.
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes one response line and flushes.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation or writing fails.
    pub fn write_response(&mut self, response: &ToolResponse) -> Result<(), DispatchError> {
        serde_json::to_writer(&mut self.writer, response)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}
