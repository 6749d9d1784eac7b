//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Client error: {0}")]
    Client(#[from] rit_client::ClientError),

    #[error("Strategy error: {0}")]
    Strategy(#[from] rit_mm::StrategyError),
}

pub type AppResult<T> = Result<T, AppError>;
