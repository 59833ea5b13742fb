//! Folds the outcome stream into a report.
use std::collections::BTreeMap;

use tokio::sync::mpsc;

use super::classify::Classification;
use super::outcome::RequestOutcome;

const P90: u64 = 90;

/// Nearest-rank percentile over an ascending slice.
///
/// `index = floor(count * pct / 100)`; index 0 selects the smallest value,
/// otherwise the value at `index - 1` is returned. No interpolation.
#[must_use]
pub fn nearest_rank(sorted: &[u64], pct: u64) -> Option<u64> {
    let count = u64::try_from(sorted.len()).ok()?;
    let index = count.saturating_mul(pct).checked_div(100)?;
    let index = usize::try_from(index).ok()?;
    if index == 0 {
        sorted.first().copied()
    } else {
        sorted.get(index.saturating_sub(1)).copied()
    }
}

/// Renders a fixed-point x100 value as `whole.frac`.
#[must_use]
pub fn format_x100(value: u64) -> String {
    format!("{}.{:02}", value / 100, value % 100)
}

fn ratio_x100(part: u64, total: u64) -> u64 {
    let scaled = u128::from(part)
        .saturating_mul(10_000)
        .checked_div(u128::from(total))
        .unwrap_or(0);
    u64::try_from(scaled).map_or(u64::MAX, |value| value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyStats {
    pub samples: u64,
    pub min_ms: u64,
    pub max_ms: u64,
    pub mean_ms_x100: u64,
    pub p90_ms: u64,
}

impl LatencyStats {
    /// Returns `None` when there are no samples.
    #[must_use]
    pub fn from_samples(mut samples: Vec<u64>) -> Option<Self> {
        samples.sort_unstable();
        let min_ms = samples.first().copied()?;
        let max_ms = samples.last().copied()?;
        let p90_ms = nearest_rank(&samples, P90)?;
        let count = u64::try_from(samples.len()).ok()?;
        let sum: u128 = samples.iter().map(|value| u128::from(*value)).sum();
        let mean = sum
            .saturating_mul(100)
            .checked_div(u128::from(count))
            .unwrap_or(0);
        Some(Self {
            samples: count,
            min_ms,
            max_ms,
            mean_ms_x100: u64::try_from(mean).map_or(u64::MAX, |value| value),
            p90_ms,
        })
    }
}

/// Final, read-only statistics for one run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AggregateReport {
    pub total: u64,
    pub successes: u64,
    pub failures: u64,
    /// Distinct success bodies with occurrence counts.
    pub bodies: BTreeMap<String, u64>,
    /// Distinct failure reasons with occurrence counts.
    pub errors: BTreeMap<String, u64>,
    /// Success latencies only; `None` when no success carried a latency.
    pub latency: Option<LatencyStats>,
}

impl AggregateReport {
    #[must_use]
    pub fn success_rate_x100(&self) -> u64 {
        ratio_x100(self.successes, self.total)
    }

    #[must_use]
    pub fn failure_rate_x100(&self) -> u64 {
        ratio_x100(self.failures, self.total)
    }

    /// Bodies by descending count, ties broken by body text.
    #[must_use]
    pub fn ranked_bodies(&self) -> Vec<(&str, u64)> {
        rank(&self.bodies)
    }

    /// Reasons by descending count, ties broken by reason text.
    #[must_use]
    pub fn ranked_errors(&self) -> Vec<(&str, u64)> {
        rank(&self.errors)
    }

    #[must_use]
    pub fn most_common_body(&self) -> Option<(&str, u64)> {
        self.ranked_bodies().into_iter().next()
    }

    #[must_use]
    pub fn most_common_error(&self) -> Option<(&str, u64)> {
        self.ranked_errors().into_iter().next()
    }
}

fn rank(counts: &BTreeMap<String, u64>) -> Vec<(&str, u64)> {
    let mut ranked: Vec<(&str, u64)> = counts
        .iter()
        .map(|(key, count)| (key.as_str(), *count))
        .collect();
    ranked.sort_by(|left, right| right.1.cmp(&left.1).then_with(|| left.0.cmp(right.0)));
    ranked
}

/// Exclusive owner of the running tallies.
#[derive(Debug, Default)]
pub struct Aggregator {
    total: u64,
    successes: u64,
    failures: u64,
    bodies: BTreeMap<String, u64>,
    errors: BTreeMap<String, u64>,
    latencies: Vec<u64>,
}

impl Aggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    pub fn record(&mut self, outcome: RequestOutcome) {
        self.total = self.total.saturating_add(1);
        match outcome.classification {
            Classification::Success { body } => {
                self.successes = self.successes.saturating_add(1);
                if outcome.latency_ms != 0 {
                    self.latencies.push(outcome.latency_ms);
                }
                bump(&mut self.bodies, body);
            }
            Classification::Failure { reason } => {
                self.failures = self.failures.saturating_add(1);
                bump(&mut self.errors, reason);
            }
        }
    }

    #[must_use]
    pub fn finalize(self) -> AggregateReport {
        AggregateReport {
            total: self.total,
            successes: self.successes,
            failures: self.failures,
            bodies: self.bodies,
            errors: self.errors,
            latency: LatencyStats::from_samples(self.latencies),
        }
    }

    /// Drains the channel until every sender is dropped, then finalizes.
    pub async fn consume(
        mut self,
        mut outcomes: mpsc::Receiver<RequestOutcome>,
    ) -> AggregateReport {
        while let Some(outcome) = outcomes.recv().await {
            self.record(outcome);
        }
        self.finalize()
    }
}

fn bump(counts: &mut BTreeMap<String, u64>, key: String) {
    let entry = counts.entry(key).or_insert(0);
    *entry = entry.saturating_add(1);
}
