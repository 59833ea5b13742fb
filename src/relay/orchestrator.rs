//! Wires pool, transport, classifier and aggregator into one run.
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::{info, warn};

use crate::error::DispatchError;

use super::aggregate::{AggregateReport, Aggregator};
use super::config::DispatchConfig;
use super::outcome::RequestOutcome;
use super::pool::{DispatchPool, JobTicket};
use super::progress::{NoProgress, ProgressObserver};
use super::transport::{RelayRequest, Transport};

const MAX_OUTCOME_BUFFER: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Dispatching,
    /// Every job has been handed to a worker; some may still be in flight.
    Draining,
    Finalized,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RunPhase::Idle => "idle",
            RunPhase::Dispatching => "dispatching",
            RunPhase::Draining => "draining",
            RunPhase::Finalized => "finalized",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub report: AggregateReport,
    /// Wall clock from first worker start until the last job finished.
    pub elapsed: Duration,
    /// Requests per second, fixed-point x100.
    pub throughput_x100: u64,
    pub dispatched: u64,
    pub workers: usize,
}

/// Single-use run driver. `execute` consumes it, so a finished run cannot
/// be restarted.
pub struct RunOrchestrator {
    config: DispatchConfig,
    transport: Arc<dyn Transport>,
    progress: Arc<dyn ProgressObserver>,
    phase: Arc<watch::Sender<RunPhase>>,
}

impl RunOrchestrator {
    #[must_use]
    pub fn new(config: DispatchConfig, transport: Arc<dyn Transport>) -> Self {
        let (phase, _) = watch::channel(RunPhase::Idle);
        Self {
            config,
            transport,
            progress: Arc::new(NoProgress),
            phase: Arc::new(phase),
        }
    }

    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressObserver>) -> Self {
        self.progress = progress;
        self
    }

    #[must_use]
    pub fn phase(&self) -> RunPhase {
        *self.phase.borrow()
    }

    /// Phase updates for observers outside the run.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RunPhase> {
        self.phase.subscribe()
    }

    /// Runs every execution and returns the finalized report.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration is invalid (nothing is sent in
    /// that case) or when a worker or the aggregator task fails.
    pub async fn execute(self) -> Result<RunReport, DispatchError> {
        let pool_config = self.config.validate()?;
        let executions = self.config.executions;
        let pool = DispatchPool::new(pool_config);

        let (outcome_tx, outcome_rx) =
            mpsc::channel(pool_config.workers().clamp(1, MAX_OUTCOME_BUFFER));
        let aggregator = tokio::spawn(Aggregator::new().consume(outcome_rx));

        set_phase(&self.phase, RunPhase::Dispatching);
        let started = Instant::now();

        let request = Arc::new(self.config.request);
        let transport = self.transport;
        let progress = self.progress;
        let phase = Arc::clone(&self.phase);
        let stats = pool
            .run(executions, move |ticket| {
                if ticket.is_last() {
                    set_phase(&phase, RunPhase::Draining);
                }
                relay_once(
                    ticket,
                    Arc::clone(&transport),
                    Arc::clone(&request),
                    outcome_tx.clone(),
                    Arc::clone(&progress),
                )
            })
            .await?;
        let elapsed = started.elapsed();

        let report = aggregator
            .await
            .map_err(|err| DispatchError::AggregatorFailed { source: err })?;
        if report.total != executions {
            warn!(
                "aggregated {} outcomes for {} executions",
                report.total, executions
            );
        }
        set_phase(&self.phase, RunPhase::Finalized);

        Ok(RunReport {
            report,
            elapsed,
            throughput_x100: throughput_x100(executions, elapsed),
            dispatched: stats.dispatched,
            workers: stats.workers_started,
        })
    }
}

impl fmt::Debug for RunOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunOrchestrator")
            .field("config", &self.config)
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}

fn set_phase(phase: &watch::Sender<RunPhase>, next: RunPhase) {
    let previous = phase.send_replace(next);
    if previous != next {
        info!("run phase: {} -> {}", previous, next);
    }
}

async fn relay_once(
    ticket: JobTicket,
    transport: Arc<dyn Transport>,
    request: Arc<RelayRequest>,
    outcome_tx: mpsc::Sender<RequestOutcome>,
    progress: Arc<dyn ProgressObserver>,
) {
    let started = Instant::now();
    let result = transport.send(&request).await;
    let latency_ms = measured_latency_ms(started.elapsed());

    let outcome = match result {
        Ok(response) => RequestOutcome::from_response(
            ticket.sequence,
            request.mode(),
            response.status,
            &response.body,
            latency_ms,
        ),
        Err(err) => RequestOutcome::from_transport_error(ticket.sequence, &err, latency_ms),
    };

    if outcome_tx.send(outcome).await.is_err() {
        warn!("outcome for relay {} dropped: aggregator closed", ticket.sequence);
    }
    progress.on_complete(ticket.sequence, ticket.total);
}

/// Sub-millisecond timings round up so a measured latency is never the
/// `0` "unmeasured" sentinel.
fn measured_latency_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis())
        .map_or(u64::MAX, |value| value)
        .max(1)
}

/// `executions / seconds`, x100, with the elapsed time floored at 1ms.
#[must_use]
pub fn throughput_x100(executions: u64, elapsed: Duration) -> u64 {
    let elapsed_ms = elapsed.as_millis().max(1);
    let scaled = u128::from(executions)
        .saturating_mul(100_000)
        .checked_div(elapsed_ms)
        .unwrap_or(0);
    u64::try_from(scaled).map_or(u64::MAX, |value| value)
}
