//! Strategy error types.

use rit_core::ExchangeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("Exchange error: {0}")]
    Exchange(#[from] ExchangeError),

    #[error("Invalid strategy config: {0}")]
    InvalidConfig(String),
}

impl StrategyError {
    /// Authentication failures and anything else that ends the run.
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Exchange(e) if e.is_fatal())
    }
}

pub type StrategyResult<T> = Result<T, StrategyError>;
