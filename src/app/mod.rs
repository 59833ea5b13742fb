//! Console side of a run: banner, progress line and report.
mod banner;
mod format;
mod progress;
mod report;
mod runner;
mod settings;


pub use banner::print_config;
pub use format::{
    compare_bodies, decode_hex_body, failure_color, format_elapsed, format_with_commas,
    hex_number, latency_color, plural_suffix, success_color,
};
pub use report::print_report;
pub use runner::run_relays;
pub use settings::RunSettings;
