use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::args::{Environment, PlanType, parse_duration_value};
use crate::error::ValidationError;

/// On-disk run configuration. Every key mirrors a CLI flag; flags given on
/// the command line win.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub chain: Option<String>,
    #[serde(alias = "environment")]
    pub env: Option<Environment>,
    #[serde(alias = "planType", alias = "plan-type")]
    pub plan_type: Option<PlanType>,
    pub executions: Option<u64>,
    pub request: Option<RequestValue>,
    pub local: Option<bool>,
    #[serde(alias = "success-bodies")]
    pub success_bodies: Option<bool>,
    #[serde(alias = "override-url")]
    pub override_url: Option<String>,
    #[serde(alias = "goroutines")]
    pub workers: Option<usize>,
    pub delay: Option<i64>,
    pub timeout: Option<DurationValue>,
    pub headers: Option<Vec<String>>,
    #[serde(alias = "env-file")]
    pub env_file: Option<String>,
    pub no_color: Option<bool>,
}

/// A request body given either as raw text or as inline JSON/TOML data.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RequestValue {
    Text(String),
    Inline(Value),
}

impl RequestValue {
    pub(crate) fn to_body(&self) -> Result<String, serde_json::Error> {
        match self {
            RequestValue::Text(text) => Ok(text.clone()),
            RequestValue::Inline(value) => serde_json::to_string(value),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(secs) => {
                if *secs == 0 {
                    Err(ValidationError::DurationZero)
                } else {
                    Ok(Duration::from_secs(*secs))
                }
            }
            DurationValue::Text(text) => parse_duration_value(text),
        }
    }
}
