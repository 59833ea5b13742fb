use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{PositiveU64, RelayArgs, parse_header};
use crate::error::{AppError, AppResult, ConfigError, ValidationError};

use super::types::ConfigFile;

/// Applies configuration values to CLI arguments.
///
/// Values the user typed on the command line are never overwritten.
///
/// # Errors
///
/// Returns an error when a config value is invalid.
pub fn apply_config(
    args: &mut RelayArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_cli(matches, "chain")
        && let Some(chain) = config.chain.clone()
    {
        args.chain = Some(chain);
    }

    if !is_cli(matches, "environment")
        && let Some(environment) = config.env
    {
        args.environment = Some(environment);
    }

    if !is_cli(matches, "plan_type")
        && let Some(plan_type) = config.plan_type
    {
        args.plan_type = Some(plan_type);
    }

    if !is_cli(matches, "executions")
        && let Some(executions) = config.executions
    {
        args.executions = ensure_positive_u64(executions, "executions")?;
    }

    if !is_cli(matches, "request")
        && let Some(request) = config.request.as_ref()
    {
        let body = request.to_body().map_err(|err| {
            AppError::config(ConfigError::InvalidField {
                field: "request",
                source: ValidationError::InvalidRequestJson { source: err },
            })
        })?;
        args.request = Some(body);
    }

    if !is_cli(matches, "local")
        && let Some(local) = config.local
    {
        args.local = local;
    }

    if !is_cli(matches, "success_bodies")
        && let Some(success_bodies) = config.success_bodies
    {
        args.success_bodies = success_bodies;
    }

    if !is_cli(matches, "override_url")
        && let Some(override_url) = config.override_url.clone()
    {
        args.override_url = Some(override_url);
    }

    if !is_cli(matches, "workers")
        && let Some(workers) = config.workers
    {
        args.workers = Some(workers);
    }

    if !is_cli(matches, "delay")
        && let Some(delay) = config.delay
    {
        args.delay = Some(delay);
    }

    if !is_cli(matches, "timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.timeout = timeout.to_duration().map_err(|err| {
            AppError::config(ConfigError::InvalidField {
                field: "timeout",
                source: err,
            })
        })?;
    }

    if !is_cli(matches, "headers")
        && let Some(headers) = config.headers.as_ref()
    {
        args.headers = parse_headers(headers)?;
    }

    if !is_cli(matches, "env_file")
        && let Some(env_file) = config.env_file.clone()
    {
        args.env_file = Some(env_file);
    }

    if !is_cli(matches, "no_color")
        && matches.value_source("no_color") != Some(ValueSource::EnvVariable)
        && let Some(no_color) = config.no_color
    {
        args.no_color = no_color;
    }

    Ok(())
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

fn ensure_positive_u64(value: u64, field: &str) -> AppResult<PositiveU64> {
    PositiveU64::try_from(value).map_err(|err| {
        AppError::config(ConfigError::FieldMustBePositive {
            field: field.to_owned(),
            source: err,
        })
    })
}

fn parse_headers(headers: &[String]) -> AppResult<Vec<(String, String)>> {
    let mut parsed = Vec::with_capacity(headers.len());
    for header in headers {
        parsed.push(
            parse_header(header)
                .map_err(|err| AppError::config(ConfigError::InvalidHeader { source: err }))?,
        );
    }
    Ok(parsed)
}
