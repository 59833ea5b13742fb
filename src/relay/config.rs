use crate::error::DispatchError;

use super::pool::PoolConfig;
use super::transport::RelayRequest;

/// Everything one run needs. Immutable once built.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    pub request: RelayRequest,
    pub executions: u64,
    pub workers: usize,
    /// Stagger between worker starts. Signed so invalid input reaches
    /// validation instead of being rejected by a parser.
    pub delay_ms: i64,
}

impl DispatchConfig {
    #[must_use]
    pub const fn new(
        request: RelayRequest,
        executions: u64,
        workers: usize,
        delay_ms: i64,
    ) -> Self {
        Self {
            request,
            executions,
            workers,
            delay_ms,
        }
    }

    /// Checks the run parameters without touching the network.
    ///
    /// # Errors
    ///
    /// Returns an error when `executions` or `workers` is zero, or when the
    /// delay is negative.
    pub fn validate(&self) -> Result<PoolConfig, DispatchError> {
        if self.executions == 0 {
            return Err(DispatchError::NoExecutions);
        }
        PoolConfig::new(self.workers, self.delay_ms)
    }
}
