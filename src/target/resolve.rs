use url::Url;

use crate::args::{Environment, PlanType};
use crate::error::ValidationError;

use super::EnvSource;

const PLACEHOLDER_MARKER: &str = "dummy";

/// What the user asked for; borrowed from the parsed arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetSpec<'args> {
    pub chain: Option<&'args str>,
    pub environment: Option<Environment>,
    pub plan_type: Option<PlanType>,
    pub local: bool,
    pub override_url: Option<&'args str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub url: Url,
    /// Sent as `Authorization` when present.
    pub secret: Option<String>,
    /// The URL came from `--override-url`.
    pub overridden: bool,
}

#[must_use]
pub const fn app_id_variable(environment: Environment, plan: PlanType) -> &'static str {
    match (environment, plan) {
        (Environment::Production, PlanType::Starter) => "PRODUCTION_STARTER_APP_ID",
        (Environment::Production, PlanType::Enterprise) => "PRODUCTION_ENTERPRISE_APP_ID",
        (Environment::Staging, PlanType::Starter) => "STAGING_STARTER_APP_ID",
        (Environment::Staging, PlanType::Enterprise) => "STAGING_ENTERPRISE_APP_ID",
    }
}

#[must_use]
pub const fn key_variable(environment: Environment, plan: PlanType) -> &'static str {
    match (environment, plan) {
        (Environment::Production, PlanType::Starter) => "PRODUCTION_STARTER_KEY",
        (Environment::Production, PlanType::Enterprise) => "PRODUCTION_ENTERPRISE_KEY",
        (Environment::Staging, PlanType::Starter) => "STAGING_STARTER_KEY",
        (Environment::Staging, PlanType::Enterprise) => "STAGING_ENTERPRISE_KEY",
    }
}

/// Turns the user's target selection into a URL and optional secret.
///
/// # Errors
///
/// Returns an error when a required flag is missing, the app ID is unset or
/// still a placeholder, or the resulting URL does not parse.
pub fn resolve_target(
    spec: &TargetSpec<'_>,
    env: &EnvSource,
) -> Result<ResolvedTarget, ValidationError> {
    if let Some(raw) = spec.override_url {
        return Ok(ResolvedTarget {
            url: parse_url(raw)?,
            secret: None,
            overridden: true,
        });
    }

    let chain = spec
        .chain
        .filter(|chain| !chain.trim().is_empty())
        .ok_or(ValidationError::MissingTargetFlag { flag: "--chain" })?;
    let environment = spec
        .environment
        .ok_or(ValidationError::MissingTargetFlag { flag: "--env" })?;
    let plan = spec
        .plan_type
        .ok_or(ValidationError::MissingTargetFlag { flag: "--plan-type" })?;

    let variable = app_id_variable(environment, plan);
    let app_id = env
        .get(variable)
        .ok_or(ValidationError::MissingAppId { variable })?;
    if app_id.contains(PLACEHOLDER_MARKER) {
        return Err(ValidationError::PlaceholderAppId {
            variable,
            value: app_id,
        });
    }

    let raw = if spec.local {
        format!("http://{}.localhost:3000/v1/{}", chain.trim(), app_id)
    } else {
        format!(
            "https://{}.rpc.grove.{}/v1/{}",
            chain.trim(),
            environment.gateway_tld(),
            app_id
        )
    };

    Ok(ResolvedTarget {
        url: parse_url(&raw)?,
        secret: env.get(key_variable(environment, plan)),
        overridden: false,
    })
}

fn parse_url(raw: &str) -> Result<Url, ValidationError> {
    Url::parse(raw).map_err(|err| ValidationError::InvalidUrl {
        url: raw.to_owned(),
        source: err,
    })
}
