//! Resolves where relays go and which credentials they carry.
//!
//! Nothing in here touches the network; the output is a URL and an optional
//! secret that the relay engine attaches to every request.
mod env_source;
mod mask;
mod plan;
mod resolve;

#[cfg(test)]
mod tests;

pub use env_source::EnvSource;
pub use mask::mask_url;
pub use plan::{RunSizing, STARTER_DELAY_MS, STARTER_WORKERS, resolve_sizing};
pub use resolve::{ResolvedTarget, TargetSpec, app_id_variable, key_variable, resolve_target};
