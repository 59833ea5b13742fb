use std::time::Duration;

use crate::args::{Environment, PlanType};
use crate::target::{ResolvedTarget, RunSizing};

/// Everything a run needs once flags, config and env file are merged.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub target: ResolvedTarget,
    pub request_body: String,
    pub executions: u64,
    pub sizing: RunSizing,
    pub timeout: Duration,
    pub headers: Vec<(String, String)>,
    pub environment: Option<Environment>,
    pub plan_type: Option<PlanType>,
    pub chain: Option<String>,
    pub success_bodies: bool,
    pub no_color: bool,
    /// Suppresses the progress line so debug logs stay readable.
    pub verbose: bool,
}
