//! Order-related types.
//!
//! Provides order side, type, status and the limit-order intent the
//! strategy hands to the exchange boundary.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Price, Quantity};

/// Order side: buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Wire name used by the exchange `action` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    /// Limit order. Every quote the agent sends is a limit order.
    #[default]
    Limit,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Limit => "LIMIT",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order status filter for order queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Open,
    Transacted,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Transacted => "TRANSACTED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A limit order intent.
///
/// Once submitted, the order is owned by the exchange; the agent never
/// tracks its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub ticker: String,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub quantity: Quantity,
    pub price: Price,
}

impl OrderRequest {
    /// Build a limit order. The price is rounded to exchange granularity.
    pub fn limit(
        ticker: impl Into<String>,
        side: OrderSide,
        quantity: Quantity,
        price: Price,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            side,
            order_type: OrderType::Limit,
            quantity,
            price: price.to_cents(),
        }
    }

    pub fn buy(ticker: impl Into<String>, quantity: Quantity, price: Price) -> Self {
        Self::limit(ticker, OrderSide::Buy, quantity, price)
    }

    pub fn sell(ticker: impl Into<String>, quantity: Quantity, price: Price) -> Self {
        Self::limit(ticker, OrderSide::Sell, quantity, price)
    }
}

/// An order resting on the exchange, as reported by the order query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenOrder {
    pub order_id: u64,
    pub ticker: String,
    pub side: OrderSide,
    pub quantity: Quantity,
    pub price: Option<Price>,
    pub status: OrderStatus,
}
