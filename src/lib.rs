//! Core library for the `relay-bench` CLI.
//!
//! `relay` holds the load engine: request classification, the dispatch pool,
//! result aggregation and the run orchestrator that ties them together. The
//! remaining modules resolve targets from flags, config files and env files,
//! and render the console output. The primary user-facing interface is the
//! `relay-bench` binary; library APIs may evolve as the CLI grows.
pub mod app;
pub mod args;
pub mod config;
pub mod error;
pub mod relay;
pub mod target;

mod entry;
mod logger;

pub use entry::run;
