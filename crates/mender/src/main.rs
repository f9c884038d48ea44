//! CLI entrypoint for `mender`.
//!
//! The binary delegates to [`mender::run`], which loads configuration,
//! installs logging and runs the requested tool against the workspace.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    mender::run(std::env::args_os(), &mut stdout, &mut stderr)
}
