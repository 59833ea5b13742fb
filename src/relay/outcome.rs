use crate::error::TransportError;

use super::classify::{Classification, RelayMode, classify};

/// The classified result of one request, as handed to the aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOutcome {
    /// 1-based dispatch order.
    pub sequence: u64,
    pub classification: Classification,
    /// Wall-clock latency; `0` means the latency was not measured.
    pub latency_ms: u64,
}

impl RequestOutcome {
    #[must_use]
    pub const fn new(sequence: u64, classification: Classification, latency_ms: u64) -> Self {
        Self {
            sequence,
            classification,
            latency_ms,
        }
    }

    /// Classifies a finished HTTP exchange.
    #[must_use]
    pub fn from_response(
        sequence: u64,
        mode: RelayMode,
        status: u16,
        body: &[u8],
        latency_ms: u64,
    ) -> Self {
        Self::new(sequence, classify(mode, status, body), latency_ms)
    }

    /// Records a transport failure; the error text becomes the reason.
    #[must_use]
    pub fn from_transport_error(sequence: u64, err: &TransportError, latency_ms: u64) -> Self {
        Self::new(
            sequence,
            Classification::Failure {
                reason: err.to_string(),
            },
            latency_ms,
        )
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.classification, Classification::Failure { .. })
    }

    #[must_use]
    pub fn error_reason(&self) -> Option<&str> {
        match &self.classification {
            Classification::Failure { reason } => Some(reason),
            Classification::Success { .. } => None,
        }
    }

    #[must_use]
    pub fn success_body(&self) -> Option<&str> {
        match &self.classification {
            Classification::Success { body } => Some(body),
            Classification::Failure { .. } => None,
        }
    }
}
