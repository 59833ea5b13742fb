mod app;
mod config;
mod dispatch;
mod http;
mod transport;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use dispatch::DispatchError;
pub use http::HttpError;
pub use transport::TransportError;
pub use validation::ValidationError;
