//! Dispatch and aggregation engine.
//!
//! [`RunOrchestrator`] drives a [`DispatchPool`] whose jobs send one
//! [`RelayRequest`] through a [`Transport`], classify the answer and stream
//! the [`RequestOutcome`] to an [`Aggregator`].
pub mod aggregate;
pub mod classify;
pub mod config;
pub mod orchestrator;
pub mod outcome;
pub mod pool;
pub mod progress;
pub mod rpc;
pub mod transport;


pub use aggregate::{AggregateReport, Aggregator, LatencyStats, format_x100, nearest_rank};
pub use classify::{Classification, RelayMode, classify, is_batch_request};
pub use config::DispatchConfig;
pub use orchestrator::{RunOrchestrator, RunPhase, RunReport, throughput_x100};
pub use outcome::RequestOutcome;
pub use pool::{DispatchPool, JobTicket, PoolConfig, PoolStats};
pub use progress::{NoProgress, ProgressObserver, ProgressSnapshot, ProgressTracker};
pub use rpc::{RpcError, RpcId, RpcResponse};
pub use transport::{RelayRequest, ReqwestTransport, Transport, TransportResponse};
