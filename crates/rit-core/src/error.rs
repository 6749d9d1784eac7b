//! Error types for rit-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid session window: {0}")]
    InvalidWindow(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors surfaced by the exchange boundary.
///
/// `Authentication` is always fatal. `Data` covers empty or unexpected
/// payloads (e.g. no price history yet).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExchangeError {
    #[error("Authentication rejected by exchange: {0}")]
    Authentication(String),

    #[error("Unexpected exchange data: {0}")]
    Data(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl ExchangeError {
    /// Whether the error must abort the run regardless of policy.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }

    /// Whether the error is a data error.
    pub fn is_data(&self) -> bool {
        matches!(self, Self::Data(_))
    }
}

pub type ExchangeResult<T> = std::result::Result<T, ExchangeError>;
