//! Core domain types for the RIT market-making agent.
//!
//! This crate provides the types shared by every other crate:
//! - `Price`, `Quantity`, `Position`: exact numeric types
//! - `Tick`, `SessionWindow`: session clock primitives
//! - `OrderSide`, `OrderType`, `OrderRequest`: order intents
//! - `Exchange`: the boundary trait the strategy talks to

pub mod decimal;
pub mod error;
pub mod exchange;
pub mod order;
pub mod session;
pub mod types;

pub use decimal::{Position, Price, Quantity};
pub use error::{CoreError, ExchangeError, ExchangeResult, Result};
pub use exchange::{BoxFuture, Exchange, MockExchange, SubmitOutcome};
pub use order::{OpenOrder, OrderRequest, OrderSide, OrderStatus, OrderType};
pub use session::{SessionState, SessionWindow};
pub use types::{Tick, TopOfBook};
