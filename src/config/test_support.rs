use std::path::Path;

use clap::{CommandFactory, FromArgMatches};

use crate::args::RelayArgs;
use crate::error::{AppError, AppResult};

use super::apply_config;
use super::loader::load_config_file;

/// Parses CLI args, then layers the config file at `path` underneath them.
pub(crate) fn args_with_config(cli: &[&str], path: &Path) -> AppResult<RelayArgs> {
    let matches = RelayArgs::command().try_get_matches_from(cli)?;
    let mut args = RelayArgs::from_arg_matches(&matches)?;
    let config = load_config_file(path)?;
    apply_config(&mut args, &matches, &config)?;
    Ok(args)
}

pub(crate) fn write_config(path: &Path, content: &str) -> AppResult<()> {
    std::fs::write(path, content).map_err(AppError::from)
}
