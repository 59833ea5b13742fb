use thiserror::Error;

/// Failure of a single relay before a JSON-RPC body could be read.
///
/// These are recorded as per-request outcomes; the `Display` text is the
/// reason that ends up in the error histogram.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
    #[error("{message}")]
    Request { message: String },
    #[error("failed to read response body: {message}")]
    Body { message: String },
}

impl TransportError {
    #[must_use]
    pub fn from_reqwest(err: &reqwest::Error, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            TransportError::Timeout { timeout_ms }
        } else if err.is_body() || err.is_decode() {
            TransportError::Body {
                message: err.to_string(),
            }
        } else {
            TransportError::Request {
                message: err.to_string(),
            }
        }
    }

    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout { .. })
    }
}
