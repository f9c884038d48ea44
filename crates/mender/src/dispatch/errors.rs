//! Error types for request parsing and serving.

use std::io;

use thiserror::Error;

/// Errors surfaced while reading requests or writing responses.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The request line is not valid JSON.
    #[error("malformed request: {message}")]
    MalformedJsonl {
        /// Parser message.
        message: String,
        /// Underlying parser error, if any.
        #[source]
        source: Option<serde_json::Error>,
    },

    /// The JSON does not match any tool schema.
    #[error("invalid arguments: {message}. Please send an open_file or editor_file request")]
    InvalidArguments {
        /// Schema violation.
        message: String,
    },

    /// Reading requests or writing responses failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A response could not be serialised.
    #[error("failed to serialize response: {0}")]
    SerializeResponse(#[from] serde_json::Error),
}

impl DispatchError {
    /// Exit status for this error.
    ///
    /// Caller mistakes map to 1; I/O and serialisation failures map to 2.
    #[must_use]
    pub const fn exit_status(&self) -> i32 {
        match self {
            Self::MalformedJsonl { .. } | Self::InvalidArguments { .. } => 1,
            Self::Io(_) | Self::SerializeResponse(_) => 2,
        }
    }

    /// Classifies a request parse error.
    ///
    /// Well-formed JSON with the wrong shape is an argument problem;
    /// everything else is malformed input.
    #[must_use]
    pub fn from_json_error(source: serde_json::Error) -> Self {
        if source.is_data() {
            Self::invalid_arguments(source.to_string())
        } else {
            Self::MalformedJsonl {
                message: source.to_string(),
                source: Some(source),
            }
        }
    }

    /// Creates a malformed-request error with a custom message.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedJsonl {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an invalid-arguments error.
    #[must_use]
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            message: message.into(),
        }
    }
}
