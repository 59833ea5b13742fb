use thiserror::Error;

/// Fatal run-level failures. Anything in here aborts the run before (or
/// instead of) producing a report; per-request failures never end up here.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("executions must be greater than 0")]
    NoExecutions,
    #[error("workers must be greater than 0")]
    NoWorkers,
    #[error("delay must be greater than or equal to 0 (got {delay_ms}ms)")]
    NegativeDelay { delay_ms: i64 },
    #[error("Worker task failed: {source}")]
    WorkerFailed {
        #[source]
        source: tokio::task::JoinError,
    },
    #[error("Aggregator task failed: {source}")]
    AggregatorFailed {
        #[source]
        source: tokio::task::JoinError,
    },
    #[error("executions ({executions}) exceeds the dispatch limit of {max}")]
    ExecutionsTooLarge { executions: u64, max: usize },
    #[error("run cancelled")]
    RunCancelled,
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
