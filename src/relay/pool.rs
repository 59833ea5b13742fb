//! Bounded worker pool.
//!
//! `workers` long-lived tasks drain a pre-filled, closed token queue. Each
//! job additionally takes a permit from a semaphore sized to the worker
//! count, so the number of in-flight jobs never exceeds `workers`.
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{Mutex, Semaphore, mpsc};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::debug;

use crate::error::DispatchError;

/// Validated pool parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    workers: usize,
    delay: Duration,
}

impl PoolConfig {
    /// # Errors
    ///
    /// Returns an error when `workers` is zero or `delay_ms` is negative.
    pub fn new(workers: usize, delay_ms: i64) -> Result<Self, DispatchError> {
        if workers == 0 {
            return Err(DispatchError::NoWorkers);
        }
        let delay_ms =
            u64::try_from(delay_ms).map_err(|_err| DispatchError::NegativeDelay { delay_ms })?;
        Ok(Self {
            workers,
            delay: Duration::from_millis(delay_ms),
        })
    }

    #[must_use]
    pub const fn workers(&self) -> usize {
        self.workers
    }

    /// Stagger between consecutive worker starts.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }
}

/// Handed to every job invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobTicket {
    /// 1-based, assigned when the job starts.
    pub sequence: u64,
    pub total: u64,
}

impl JobTicket {
    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.sequence == self.total
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub dispatched: u64,
    pub workers_started: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct DispatchPool {
    config: PoolConfig,
}

impl DispatchPool {
    #[must_use]
    pub const fn new(config: PoolConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> PoolConfig {
        self.config
    }

    /// Runs `job` exactly `executions` times and waits for every worker.
    ///
    /// # Errors
    ///
    /// Returns an error when `executions` is zero or too large for the token
    /// queue, or when a worker task panics.
    pub async fn run<F, Fut>(&self, executions: u64, job: F) -> Result<PoolStats, DispatchError>
    where
        F: Fn(JobTicket) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let tokens = fill_token_queue(executions)?;
        let tokens = Arc::new(Mutex::new(tokens));
        let permits = Arc::new(Semaphore::new(
            self.config.workers.min(Semaphore::MAX_PERMITS),
        ));
        let counter = Arc::new(AtomicU64::new(0));
        let job = Arc::new(job);

        let mut handles: Vec<JoinHandle<()>> = Vec::with_capacity(self.config.workers);
        for worker_id in 0..self.config.workers {
            if worker_id > 0 && !self.config.delay.is_zero() {
                sleep(self.config.delay).await;
            }
            handles.push(spawn_worker(
                worker_id,
                executions,
                Arc::clone(&tokens),
                Arc::clone(&permits),
                Arc::clone(&counter),
                Arc::clone(&job),
            ));
        }

        let workers_started = handles.len();
        let mut first_failure = None;
        for handle in handles {
            if let Err(err) = handle.await
                && first_failure.is_none()
            {
                first_failure = Some(err);
            }
        }
        if let Some(source) = first_failure {
            return Err(DispatchError::WorkerFailed { source });
        }

        Ok(PoolStats {
            dispatched: counter.load(Ordering::Acquire),
            workers_started,
        })
    }
}

fn fill_token_queue(executions: u64) -> Result<mpsc::Receiver<()>, DispatchError> {
    if executions == 0 {
        return Err(DispatchError::NoExecutions);
    }
    let too_large = DispatchError::ExecutionsTooLarge {
        executions,
        max: Semaphore::MAX_PERMITS,
    };
    let capacity = match usize::try_from(executions) {
        Ok(capacity) if capacity <= Semaphore::MAX_PERMITS => capacity,
        Ok(_) | Err(_) => return Err(too_large),
    };

    let (sender, receiver) = mpsc::channel::<()>(capacity);
    for _ in 0..executions {
        if sender.try_send(()).is_err() {
            return Err(too_large);
        }
    }
    drop(sender);
    Ok(receiver)
}

fn spawn_worker<F, Fut>(
    worker_id: usize,
    total: u64,
    tokens: Arc<Mutex<mpsc::Receiver<()>>>,
    permits: Arc<Semaphore>,
    counter: Arc<AtomicU64>,
    job: Arc<F>,
) -> JoinHandle<()>
where
    F: Fn(JobTicket) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        debug!("worker {} started", worker_id);
        let mut completed: u64 = 0;
        loop {
            let token = tokens.lock().await.recv().await;
            if token.is_none() {
                break;
            }
            let Ok(_permit) = permits.acquire().await else {
                break;
            };
            let sequence = counter.fetch_add(1, Ordering::AcqRel).saturating_add(1);
            job(JobTicket { sequence, total }).await;
            completed = completed.saturating_add(1);
        }
        debug!("worker {} exited after {} jobs", worker_id, completed);
    })
}
