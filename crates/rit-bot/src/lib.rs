//! RIT ALGO2 market-making agent.
//!
//! Wires the REST client, the strategy runner and telemetry together:
//! - TOML configuration with strategy presets
//! - Ctrl-C → cancellation token checked at the top of each iteration
//! - Session summary and final metrics on exit

pub mod app;
pub mod config;
pub mod error;

pub use app::Application;
pub use config::{AppConfig, ExchangeConfig};
pub use error::{AppError, AppResult};
