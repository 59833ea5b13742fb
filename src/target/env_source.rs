use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::args::{default_env_file_path, user_home_dir};
use crate::error::ConfigError;

/// Credential lookup: process environment first, then the env file.
///
/// The env file is parsed into a private map; the process environment is
/// never modified.
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    file_values: BTreeMap<String, String>,
    use_process_env: bool,
}

impl EnvSource {
    /// Loads the env file at `path`, or the default `~/.env.relaybench`.
    ///
    /// A missing default file is not an error; a missing explicit file is.
    ///
    /// # Errors
    ///
    /// Returns an error when the env file exists but cannot be parsed, or
    /// when an explicitly requested file does not exist.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let (path, explicit) = path.map_or_else(
            || (default_env_file_path(), false),
            |path| (expand_home(path), true),
        );

        if !explicit && !path.exists() {
            debug!("no env file at {}", path.display());
            return Ok(Self {
                file_values: BTreeMap::new(),
                use_process_env: true,
            });
        }

        let file_values = read_env_file(&path)?;
        debug!(
            "loaded {} entries from env file {}",
            file_values.len(),
            path.display()
        );
        Ok(Self {
            file_values,
            use_process_env: true,
        })
    }

    /// Builds a source from fixed pairs, ignoring the process environment.
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            file_values: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
            use_process_env: false,
        }
    }

    /// Returns the first non-empty value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        if self.use_process_env
            && let Ok(value) = std::env::var(key)
            && !value.is_empty()
        {
            return Some(value);
        }
        self.file_values
            .get(key)
            .filter(|value| !value.is_empty())
            .cloned()
    }
}

fn read_env_file(path: &Path) -> Result<BTreeMap<String, String>, ConfigError> {
    let to_error = |err: dotenvy::Error| ConfigError::ReadEnvFile {
        path: path.to_path_buf(),
        source: err,
    };
    let mut values = BTreeMap::new();
    for item in dotenvy::from_path_iter(path).map_err(to_error)? {
        let (key, value) = item.map_err(to_error)?;
        values.insert(key, value);
    }
    Ok(values)
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = user_home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}
