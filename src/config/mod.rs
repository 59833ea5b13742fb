//! Configuration loading and application.
pub(crate) mod apply;
mod loader;
pub mod types;

#[cfg(test)]
mod test_support;

pub use apply::apply_config;
pub use loader::load_config;

pub(crate) use loader::DEFAULT_CONFIG_FILES;
