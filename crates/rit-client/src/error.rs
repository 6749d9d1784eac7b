//! Client error types.

use thiserror::Error;

/// Errors raised while building the client.
///
/// Request-time failures are reported as `rit_core::ExchangeError`.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Invalid API key header: {0}")]
    InvalidHeader(String),
}

pub type ClientResult<T> = Result<T, ClientError>;
