//! Log subscriber setup for the `mender` binary.
//!
//! Stdout carries tool responses, so every log line goes to stderr. The
//! subscriber is process-global and installed at most once.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tracing::{Subscriber, subscriber::SetGlobalDefaultError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::{self, time::UtcTime};

use mender_config::{Config, LogFormat};

static INSTALLED: OnceCell<()> = OnceCell::new();

/// Reasons logging could not be set up.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// `log_filter` is not a valid `EnvFilter` directive list.
    #[error("log filter '{filter}' is invalid: {reason}")]
    InvalidFilter {
        /// Configured filter.
        filter: String,
        /// Parser message.
        reason: String,
    },
    /// Something else already owns the global subscriber.
    #[error("a log subscriber is already installed: {0}")]
    AlreadyInstalled(SetGlobalDefaultError),
}

/// Installs the stderr subscriber described by `config`.
///
/// Only the first successful call has an effect; later calls return `Ok`
/// without rebuilding anything, whatever their configuration.
///
/// # Examples
///
/// ```rust
/// use mender::telemetry;
/// use mender_config::Config;
///
/// # fn main() -> Result<(), mender::telemetry::TelemetryError> {
/// telemetry::initialise(&Config::default())?;
/// telemetry::initialise(&Config::default())?;
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns [`TelemetryError`] for an unparseable filter or when another
/// subscriber was installed first.
pub fn initialise(config: &Config) -> Result<(), TelemetryError> {
    INSTALLED
        .get_or_try_init(|| {
            let subscriber = build_subscriber(config, io::stderr().is_terminal())?;
            tracing::subscriber::set_global_default(subscriber)
                .map_err(TelemetryError::AlreadyInstalled)
        })
        .map(|_| ())
}

/// Builds the subscriber without installing it.
///
/// Colour is used only for compact output on a terminal.
fn build_subscriber(
    config: &Config,
    stderr_is_terminal: bool,
) -> Result<Box<dyn Subscriber + Send + Sync>, TelemetryError> {
    let filter =
        EnvFilter::try_new(config.log_filter()).map_err(|error| TelemetryError::InvalidFilter {
            filter: config.log_filter().to_owned(),
            reason: error.to_string(),
        })?;
    let format = config.log_format();

    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .with_ansi(stderr_is_terminal && !format.is_structured())
        .with_timer(UtcTime::rfc_3339());

    Ok(match format {
        LogFormat::Json => Box::new(builder.json().flatten_event(true).finish()),
        LogFormat::Compact => Box::new(builder.compact().finish()),
    })
}
