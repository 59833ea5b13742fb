use tracing::warn;

use crate::args::{DEFAULT_DELAY_MS, PlanType};
use crate::error::ValidationError;

/// Starter plans are locked to this many workers.
pub const STARTER_WORKERS: usize = 30;
/// Starter plans start one worker per second.
pub const STARTER_DELAY_MS: i64 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSizing {
    pub workers: usize,
    pub delay_ms: i64,
    /// The plan replaced what the user asked for.
    pub clamped: bool,
}

/// Applies plan limits to the requested worker count and delay.
///
/// Values are not range-checked here; a zero worker count or negative delay
/// is left for dispatch validation to reject.
///
/// # Errors
///
/// Returns an error when an enterprise plan has no explicit worker count.
pub fn resolve_sizing(
    plan: Option<PlanType>,
    workers: Option<usize>,
    delay_ms: Option<i64>,
) -> Result<RunSizing, ValidationError> {
    match plan {
        Some(PlanType::Starter) => {
            if workers.is_some_and(|requested| requested > STARTER_WORKERS) {
                warn!(
                    "Starter plans are locked at {} workers to avoid hitting the throughput limit.",
                    STARTER_WORKERS
                );
            }
            let clamped = workers.is_some_and(|requested| requested != STARTER_WORKERS)
                || delay_ms.is_some_and(|requested| requested != STARTER_DELAY_MS);
            Ok(RunSizing {
                workers: STARTER_WORKERS,
                delay_ms: STARTER_DELAY_MS,
                clamped,
            })
        }
        Some(PlanType::Enterprise) => {
            let workers = workers.ok_or(ValidationError::EnterpriseRequiresWorkers)?;
            Ok(RunSizing {
                workers,
                delay_ms: delay_ms.unwrap_or(DEFAULT_DELAY_MS),
                clamped: false,
            })
        }
        None => Ok(RunSizing {
            workers: workers.unwrap_or(1),
            delay_ms: delay_ms.unwrap_or(DEFAULT_DELAY_MS),
            clamped: false,
        }),
    }
}
