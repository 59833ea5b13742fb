use clap::Parser;
use std::time::Duration;

use super::parsers::{parse_bool_env, parse_duration_arg, parse_header, parse_positive_u64};
use super::types::{Environment, PlanType, PositiveU64};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Load generator for JSON-RPC relays - fires N identical requests through a bounded, staggered worker pool and reports success rates, error reasons and latency.",
    next_help_heading = "Advanced Options"
)]
pub struct RelayArgs {
    /// Chain alias used in the relay host name (e.g. eth, poly)
    #[arg(long, short = 'c', help_heading = "Target")]
    pub chain: Option<String>,

    /// Portal environment
    #[arg(long = "env", short = 'e', value_enum, help_heading = "Target")]
    pub environment: Option<Environment>,

    /// Portal plan type; starter plans are throttled
    #[arg(long = "plan-type", short = 'p', value_enum, help_heading = "Target")]
    pub plan_type: Option<PlanType>,

    /// Use a local gateway (http://{chain}.localhost:3000) instead of the public one
    #[arg(long, short = 'l', help_heading = "Target")]
    pub local: bool,

    /// Send relays to this URL verbatim; no app ID or key is attached
    #[arg(long = "override-url", short = 'o', help_heading = "Target")]
    pub override_url: Option<String>,

    /// JSON-RPC request body (single object or batch array)
    #[arg(long, short = 'r', help_heading = "Run")]
    pub request: Option<String>,

    /// Number of relays to send
    #[arg(long, short = 'x', default_value = "1", value_parser = parse_positive_u64, help_heading = "Run")]
    pub executions: PositiveU64,

    /// Concurrent workers (required for enterprise plans)
    #[arg(
        long,
        short = 'w',
        visible_alias = "goroutines",
        short_alias = 'g',
        help_heading = "Run"
    )]
    pub workers: Option<usize>,

    /// Delay between worker starts in milliseconds [default: 10]
    #[arg(long, short = 'd', allow_negative_numbers = true, help_heading = "Run")]
    pub delay: Option<i64>,

    /// Per-request timeout (supports ms/s/m/h)
    #[arg(long, default_value = "5s", value_parser = parse_duration_arg, help_heading = "Run")]
    pub timeout: Duration,

    /// Extra HTTP headers in 'Key: Value' format (repeatable)
    #[arg(long = "header", short = 'H', value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Show every distinct success body with its count
    #[arg(long = "success-bodies", short = 's', help_heading = "Output")]
    pub success_bodies: bool,

    /// Path to config file (TOML/JSON). Defaults to ./relay-bench.toml or ./relay-bench.json if present.
    #[arg(long)]
    pub config: Option<String>,

    /// Env file with app IDs and keys [default: ~/.env.relaybench]
    #[arg(long = "env-file")]
    pub env_file: Option<String>,

    /// Enable verbose logging (sets log level to debug unless overridden by RELAY_BENCH_LOG/RUST_LOG)
    #[arg(long, short = 'v', help_heading = "Output")]
    pub verbose: bool,

    /// Disable color output
    #[arg(long = "no-color", env = "NO_COLOR", value_parser = parse_bool_env, help_heading = "Output")]
    pub no_color: bool,
}
