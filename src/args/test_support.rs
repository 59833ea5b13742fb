use clap::Parser;

use crate::error::{AppError, AppResult};

use super::RelayArgs;

pub(crate) fn parse_test_args<I, T>(args: I) -> AppResult<RelayArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    RelayArgs::try_parse_from(args).map_err(AppError::from)
}
