//! Command-line runtime for the `mender` binary.
//!
//! The runtime splits configuration flags from command tokens, loads the
//! layered configuration, installs logging and routes the subcommand through
//! the same [`Toolbox`] used for JSONL requests. Responses go to stdout as
//! plain text; logs go to stderr.

mod config;

use std::ffi::OsString;
use std::fs;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use mender_config::Config;
use thiserror::Error;

use crate::dispatch::{DispatchError, ToolRequest, Toolbox};
use crate::editor::EditRequest;
use crate::locator::LocateRequest;
use crate::telemetry;

use config::{ConfigLoader, OrthoConfigLoader, split_config_arguments};

/// CLI flags recognised by the configuration loader.
///
/// MAINTENANCE: keep in sync with the fields of `mender_config::Config`.
const CONFIG_CLI_FLAGS: &[&str] = &[
    "--config-path",
    "--log-filter",
    "--log-format",
    "--checker-program",
    "--diagnostic-codes",
    "--checked-extensions",
    "--formatter-program",
    "--summarizer-command",
    "--summary-max-tokens",
    "--process-timeout-secs",
    "--max-window-lines",
    "--leading-context-lines",
    "--default-preview-size",
    "--default-max-results",
];

/// Locate and edit source files with validated, line-addressed edits.
#[derive(Parser, Debug)]
#[command(name = "mender", version, disable_help_subcommand = true)]
struct Cli {
    /// Repository root; defaults to the current directory.
    #[arg(long, value_name = "DIR")]
    workspace: Option<Utf8PathBuf>,
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Shows a numbered excerpt of a file by keyword or line range.
    Open(OpenArgs),
    /// Replaces a line range if the result passes validation.
    Edit(EditArgs),
    /// Answers JSONL tool requests read from stdin.
    Request,
}

#[derive(Args, Debug)]
struct OpenArgs {
    /// File path relative to the repository root.
    #[arg(value_name = "FILE")]
    file: Utf8PathBuf,
    /// Literal search term; repeat for several.
    #[arg(long = "keyword", short = 'k', value_name = "KEYWORD")]
    keywords: Vec<String>,
    /// First line of an explicit range (1-indexed).
    #[arg(long)]
    start: Option<usize>,
    /// Last line of an explicit range (inclusive).
    #[arg(long)]
    end: Option<usize>,
    /// Window half-width around matches outside any function or class.
    #[arg(long)]
    preview_size: Option<usize>,
    /// Matches kept per keyword.
    #[arg(long)]
    max_results: Option<usize>,
}

#[derive(Args, Debug)]
struct EditArgs {
    /// File path relative to the repository root.
    #[arg(value_name = "FILE")]
    file: Utf8PathBuf,
    /// First line replaced (1-indexed).
    #[arg(long)]
    start: usize,
    /// Last line replaced (inclusive).
    #[arg(long)]
    end: usize,
    /// Replacement text.
    #[arg(long, required_unless_present = "patch_file", conflicts_with = "patch_file")]
    patch: Option<String>,
    /// File holding the replacement text.
    #[arg(long, value_name = "PATH")]
    patch_file: Option<Utf8PathBuf>,
    /// Rationale recorded in the logs.
    #[arg(long)]
    context: Option<String>,
}

/// Failures that stop the CLI before a tool response exists.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    /// The arguments did not parse.
    #[error("{0}")]
    CliUsage(clap::Error),
    /// The patch file could not be read.
    #[error("could not read patch file {path}: {source}")]
    ReadPatch {
        /// Patch file path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The current directory is unusable as a workspace.
    #[error("could not determine the workspace directory: {message}")]
    Workspace {
        /// Description of the failure.
        message: String,
    },
    /// Serving JSONL requests failed.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl CliError {
    /// Process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::LoadConfiguration(_) | Self::CliUsage(_) | Self::ReadPatch { .. } => 1,
            Self::Workspace { .. } => 2,
            Self::Dispatch(error) => {
                if error.exit_status() == 1 {
                    1
                } else {
                    2
                }
            }
        }
    }
}

/// Runs the CLI with the process's stdin.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    run_with_input(args, io::stdin().lock(), stdout, stderr)
}

/// Runs the CLI reading JSONL requests from `stdin`.
#[must_use]
pub fn run_with_input<I, R, W, E>(args: I, stdin: R, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    R: BufRead,
    W: Write,
    E: Write,
{
    run_with_loader(args, stdin, stdout, stderr, &OrthoConfigLoader)
}

fn run_with_loader<I, R, W, E, L>(
    args: I,
    stdin: R,
    stdout: &mut W,
    stderr: &mut E,
    loader: &L,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    R: BufRead,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    let args: Vec<OsString> = args.into_iter().collect();
    let split = split_config_arguments(&args);
    let cli_arguments = split
        .config_arguments
        .first()
        .cloned()
        .into_iter()
        .chain(args.iter().skip(split.command_start).cloned());

    let cli = match Cli::try_parse_from(cli_arguments) {
        Ok(cli) => cli,
        Err(error) if !error.use_stderr() => {
            // --help and --version
            let _ = write!(stdout, "{error}");
            return ExitCode::SUCCESS;
        }
        Err(error) => return report(stderr, &CliError::CliUsage(error)),
    };

    let result = loader.load(&split.config_arguments).and_then(|config| {
        if let Err(error) = telemetry::initialise(&config) {
            let _ = writeln!(stderr, "warning: logging disabled: {error}");
        }
        execute(cli, &config, stdin, stdout)
    });
    match result {
        Ok(code) => ExitCode::from(code),
        Err(error) => report(stderr, &error),
    }
}

fn execute<R: BufRead, W: Write>(
    cli: Cli,
    config: &Config,
    stdin: R,
    stdout: &mut W,
) -> Result<u8, CliError> {
    let root = match cli.workspace {
        Some(root) => root,
        None => current_dir()?,
    };
    let mut toolbox = Toolbox::from_config(root, config);

    let request = match cli.command {
        CliCommand::Request => {
            let worst = toolbox.serve(stdin, &mut *stdout)?;
            return Ok(worst.map_or(0, |status| status.exit_code()));
        }
        CliCommand::Open(args) => ToolRequest::OpenFile(locate_request(args)),
        CliCommand::Edit(args) => ToolRequest::EditorFile(edit_request(args)?),
    };

    let response = toolbox.handle(&request);
    write_text(stdout, &response.text).map_err(DispatchError::from)?;
    Ok(response.status.exit_code())
}

fn locate_request(args: OpenArgs) -> LocateRequest {
    LocateRequest {
        relative_file_path: args.file,
        keywords: args.keywords,
        start_line: args.start,
        end_line: args.end,
        preview_size: args.preview_size,
        max_num_result: args.max_results,
    }
}

fn edit_request(args: EditArgs) -> Result<EditRequest, CliError> {
    let patch = match (args.patch, args.patch_file) {
        (Some(patch), _) => patch,
        (None, Some(path)) => {
            fs::read_to_string(&path).map_err(|source| CliError::ReadPatch { path, source })?
        }
        (None, None) => String::new(),
    };
    let request = EditRequest::new(args.file, args.start, args.end, patch);
    Ok(match args.context {
        Some(context) => request.with_context(context),
        None => request,
    })
}

fn current_dir() -> Result<Utf8PathBuf, CliError> {
    let cwd = std::env::current_dir().map_err(|error| CliError::Workspace {
        message: error.to_string(),
    })?;
    Utf8PathBuf::from_path_buf(cwd).map_err(|path| CliError::Workspace {
        message: format!("{} is not valid UTF-8", path.display()),
    })
}

fn write_text<W: Write>(stdout: &mut W, text: &str) -> io::Result<()> {
    stdout.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()
}

fn report<E: Write>(stderr: &mut E, error: &CliError) -> ExitCode {
    let _ = writeln!(stderr, "{error}");
    ExitCode::from(error.exit_code())
}

#[cfg(test)]
mod tests;
