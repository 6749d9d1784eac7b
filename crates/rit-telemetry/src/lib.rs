//! Prometheus metrics and structured logging for the RIT market maker.
//!
//! - Structured logging with tracing (pretty in development, JSON in production)
//! - Prometheus counters for submissions, cycles and scalp triggers

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
pub use metrics::Metrics;
