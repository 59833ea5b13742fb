//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;
mod types;

#[cfg(test)]
mod test_support;

pub use cli::RelayArgs;
pub use types::{Environment, PlanType, PositiveU64};

pub(crate) use defaults::{
    DEFAULT_DELAY_MS, DEFAULT_USER_AGENT, default_env_file_path, user_home_dir,
};
pub(crate) use parsers::{parse_duration_value, parse_header};
