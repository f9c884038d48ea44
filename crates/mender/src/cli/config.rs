//! Configuration loading for the `mender` binary.
//!
//! Configuration flags are peeled off the front of the argument list and
//! handed to `ortho_config`; the remaining tokens belong to clap.

use std::ffi::{OsStr, OsString};

use mender_config::Config;
use ortho_config::OrthoConfig;

use super::CliError;

pub(crate) trait ConfigLoader {
    /// Loads configuration from the config-flag portion of the arguments.
    ///
    /// # Flag Ordering
    ///
    /// Flags listed in `CONFIG_CLI_FLAGS` must come before `--workspace` and
    /// the subcommand. Later occurrences are left for clap, which rejects
    /// them.
    fn load(&self, args: &[OsString]) -> Result<Config, CliError>;
}

pub(crate) struct OrthoConfigLoader;

impl ConfigLoader for OrthoConfigLoader {
    fn load(&self, args: &[OsString]) -> Result<Config, CliError> {
        Config::load_from_iter(args.iter().cloned())
            .map_err(CliError::LoadConfiguration)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlagAction {
    Include { needs_value: bool },
    Stop,
}

fn classify(argument: &OsStr) -> FlagAction {
    let text = argument.to_string_lossy();
    if !text.starts_with("--") {
        return FlagAction::Stop;
    }
    let (flag, inline_value) = match text.split_once('=') {
        Some((flag, _)) => (flag, true),
        None => (text.as_ref(), false),
    };
    if super::CONFIG_CLI_FLAGS.contains(&flag) {
        FlagAction::Include {
            needs_value: !inline_value,
        }
    } else {
        FlagAction::Stop
    }
}

/// Config-flag arguments (with the program name first) and the index where
/// command tokens begin.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ConfigArgumentSplit {
    pub(crate) config_arguments: Vec<OsString>,
    pub(crate) command_start: usize,
}

pub(crate) fn split_config_arguments(args: &[OsString]) -> ConfigArgumentSplit {
    let Some(program) = args.first() else {
        return ConfigArgumentSplit {
            config_arguments: Vec::new(),
            command_start: 0,
        };
    };

    let mut config_arguments = vec![program.clone()];
    let mut index = 1usize;
    while let Some(argument) = args.get(index) {
        match classify(argument) {
            FlagAction::Include { needs_value } => {
                config_arguments.push(argument.clone());
                index += 1;
                if needs_value && let Some(value) = args.get(index) {
                    config_arguments.push(value.clone());
                    index += 1;
                }
            }
            FlagAction::Stop => break,
        }
    }

    ConfigArgumentSplit {
        config_arguments,
        command_start: index,
    }
}
