use std::path::PathBuf;

pub(crate) const DEFAULT_USER_AGENT: &str = concat!("relay-bench/", env!("CARGO_PKG_VERSION"));

/// Stagger between worker starts when `--delay` is not given.
pub(crate) const DEFAULT_DELAY_MS: i64 = 10;

const DEFAULT_ENV_FILE: &str = ".env.relaybench";

/// `~/.env.relaybench`, or the bare file name when no home is known.
pub(crate) fn default_env_file_path() -> PathBuf {
    user_home_dir().map_or_else(
        || PathBuf::from(DEFAULT_ENV_FILE),
        |home| home.join(DEFAULT_ENV_FILE),
    )
}

pub(crate) fn user_home_dir() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        if let Some(value) = std::env::var_os("USERPROFILE") {
            return Some(PathBuf::from(value));
        }
    }

    std::env::var_os("HOME").map(PathBuf::from)
}
