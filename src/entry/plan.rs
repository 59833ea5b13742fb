use clap::ArgMatches;
use serde_json::Value;

use crate::app::{RunSettings, run_relays};
use crate::args::RelayArgs;
use crate::config::{apply_config, load_config};
use crate::error::{AppError, AppResult, ValidationError};
use crate::target::{EnvSource, TargetSpec, resolve_sizing, resolve_target};

/// Merges flags, config file and env file into the settings for one run.
pub(super) fn build_plan(mut args: RelayArgs, matches: &ArgMatches) -> AppResult<RunSettings> {
    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, matches, &config)?;
    }

    let request_body = validate_request(args.request.take())?;
    let env = EnvSource::load(args.env_file.as_deref())?;
    let spec = TargetSpec {
        chain: args.chain.as_deref(),
        environment: args.environment,
        plan_type: args.plan_type,
        local: args.local,
        override_url: args.override_url.as_deref(),
    };
    let target = resolve_target(&spec, &env)?;
    let sizing = resolve_sizing(args.plan_type, args.workers, args.delay)?;

    Ok(RunSettings {
        target,
        request_body,
        executions: args.executions.get(),
        sizing,
        timeout: args.timeout,
        headers: args.headers,
        environment: args.environment,
        plan_type: args.plan_type,
        chain: args.chain,
        success_bodies: args.success_bodies,
        no_color: args.no_color,
        verbose: args.verbose,
    })
}

pub(super) async fn execute_plan(settings: &RunSettings) -> AppResult<()> {
    run_relays(settings).await.map(drop)
}

fn validate_request(request: Option<String>) -> AppResult<String> {
    let body = request
        .filter(|body| !body.trim().is_empty())
        .ok_or_else(|| AppError::validation(ValidationError::MissingRequest))?;
    serde_json::from_str::<Value>(&body).map_err(|err| {
        AppError::validation(ValidationError::InvalidRequestJson { source: err })
    })?;
    Ok(body)
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, FromArgMatches};
    use tempfile::tempdir;

    use super::*;
    use crate::args::PlanType;

    fn plan_from(cli: &[&str]) -> AppResult<RunSettings> {
        let matches = RelayArgs::command().try_get_matches_from(cli)?;
        let args = RelayArgs::from_arg_matches(&matches)?;
        build_plan(args, &matches)
    }

    #[test]
    fn override_url_needs_no_env_or_plan() -> AppResult<()> {
        let dir = tempdir()?;
        let env_file = dir.path().join("empty.env");
        std::fs::write(&env_file, "")?;
        let env_file = env_file
            .to_str()
            .ok_or_else(|| AppError::validation("Non UTF-8 temp path"))?;
        let settings = plan_from(&[
            "relay-bench",
            "-o",
            "http://127.0.0.1:9/rpc",
            "-r",
            r#"{"jsonrpc":"2.0","id":1,"method":"eth_blockNumber"}"#,
            "-x",
            "7",
            "--env-file",
            env_file,
        ])?;
        if !settings.target.overridden || settings.target.secret.is_some() {
            return Err(AppError::validation("Expected override without secret"));
        }
        if settings.executions != 7 || settings.sizing.workers != 1 {
            return Err(AppError::validation(format!(
                "Unexpected sizing: {:?}",
                settings.sizing
            )));
        }
        Ok(())
    }

    #[test]
    fn starter_plan_resolves_from_env_file() -> AppResult<()> {
        let dir = tempdir()?;
        let env_file = dir.path().join("relay.env");
        std::fs::write(
            &env_file,
            "STAGING_STARTER_APP_ID=0a1b2c3d\nSTAGING_STARTER_KEY=starter-key\n",
        )?;
        let env_file = env_file
            .to_str()
            .ok_or_else(|| AppError::validation("Non UTF-8 temp path"))?;
        let settings = plan_from(&[
            "relay-bench",
            "-c",
            "poly",
            "-e",
            "staging",
            "-p",
            "starter",
            "-w",
            "50",
            "-r",
            "[]",
            "--env-file",
            env_file,
        ])?;
        if settings.target.url.as_str() != "https://poly.rpc.grove.town/v1/0a1b2c3d" {
            return Err(AppError::validation(format!(
                "Unexpected url: {}",
                settings.target.url
            )));
        }
        if settings.plan_type != Some(PlanType::Starter)
            || settings.sizing.workers != 30
            || !settings.sizing.clamped
        {
            return Err(AppError::validation("Expected starter clamp"));
        }
        Ok(())
    }

    #[test]
    fn request_must_be_present_json() -> AppResult<()> {
        if !matches!(
            validate_request(None),
            Err(AppError::Validation(ValidationError::MissingRequest))
        ) {
            return Err(AppError::validation("Expected missing request"));
        }
        if !matches!(
            validate_request(Some("   ".to_owned())),
            Err(AppError::Validation(ValidationError::MissingRequest))
        ) {
            return Err(AppError::validation("Expected blank request to be missing"));
        }
        if !matches!(
            validate_request(Some("{not json".to_owned())),
            Err(AppError::Validation(ValidationError::InvalidRequestJson { .. }))
        ) {
            return Err(AppError::validation("Expected invalid JSON to fail"));
        }
        Ok(())
    }

    #[test]
    fn enterprise_without_workers_is_rejected() -> AppResult<()> {
        let dir = tempdir()?;
        let env_file = dir.path().join("relay.env");
        std::fs::write(&env_file, "PRODUCTION_ENTERPRISE_APP_ID=0a1b2c3d\n")?;
        let env_file = env_file
            .to_str()
            .ok_or_else(|| AppError::validation("Non UTF-8 temp path"))?;
        let result = plan_from(&[
            "relay-bench",
            "-c",
            "eth",
            "-e",
            "production",
            "-p",
            "enterprise",
            "-r",
            "{}",
            "--env-file",
            env_file,
        ]);
        if !matches!(
            result,
            Err(AppError::Validation(
                ValidationError::EnterpriseRequiresWorkers
            ))
        ) {
            return Err(AppError::validation("Expected enterprise worker error"));
        }
        Ok(())
    }
}
