use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::args::DEFAULT_USER_AGENT;
use crate::error::{AppError, AppResult, DispatchError};
use crate::relay::{
    DispatchConfig, ProgressTracker, RelayRequest, ReqwestTransport, RunOrchestrator, RunReport,
};

use super::banner::print_config;
use super::progress::spawn_progress_line;
use super::report::print_report;
use super::settings::RunSettings;

/// Prints the banner, runs every relay and prints the report.
///
/// # Errors
///
/// Returns an error when the HTTP client or request cannot be built, when
/// dispatch rejects the run parameters, or when the run is interrupted.
pub async fn run_relays(settings: &RunSettings) -> AppResult<RunReport> {
    print_config(settings);

    let transport = ReqwestTransport::new(DEFAULT_USER_AGENT)?;
    let request = RelayRequest::new(
        settings.target.url.clone(),
        settings.target.secret.as_deref(),
        &settings.headers,
        Bytes::from(settings.request_body.clone()),
        settings.timeout,
    )?;
    debug!("relay mode: {:?}", request.mode());

    let config = DispatchConfig::new(
        request,
        settings.executions,
        settings.sizing.workers,
        settings.sizing.delay_ms,
    );
    let tracker = Arc::new(ProgressTracker::new(settings.executions));
    let orchestrator =
        RunOrchestrator::new(config, Arc::new(transport)).with_progress(tracker.clone());

    let (stop_tx, stop_rx) = watch::channel(false);
    let progress_handle = if settings.verbose {
        None
    } else {
        Some(spawn_progress_line(tracker, settings.no_color, stop_rx))
    };

    let result = until_cancelled(
        async { orchestrator.execute().await.map_err(AppError::from) },
        tokio::signal::ctrl_c(),
    )
    .await;

    if stop_tx.send(true).is_err() {
        debug!("progress line already stopped");
    }
    if let Some(handle) = progress_handle
        && let Err(err) = handle.await
    {
        warn!("progress line task failed: {}", err);
    }

    let run = result?;
    print_report(&run, settings.success_bodies, settings.no_color);
    Ok(run)
}

/// Races a run against an interrupt; the interrupt drops the run unfinished.
pub(super) async fn until_cancelled<R, C>(run: R, cancel: C) -> AppResult<RunReport>
where
    R: Future<Output = AppResult<RunReport>>,
    C: Future<Output = std::io::Result<()>>,
{
    tokio::select! {
        result = run => result,
        signal = cancel => match signal {
            Ok(()) => Err(AppError::dispatch(DispatchError::RunCancelled)),
            Err(err) => Err(AppError::from(err)),
        },
    }
}
