//! Wire types returned by the exchange REST API.
//!
//! Only the fields the agent reads are required; everything else is
//! optional so that extra or missing columns do not break decoding.

use rit_core::{
    ExchangeError, ExchangeResult, OpenOrder, OrderSide, OrderStatus, Position, Price, Quantity,
    TopOfBook,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;

/// `GET /case`
#[derive(Debug, Clone, Deserialize)]
pub struct CaseResponse {
    pub tick: u32,
    #[serde(default)]
    pub period: Option<u32>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// One bar of `GET /securities/history`, newest first.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryBar {
    pub tick: u32,
    #[serde(default)]
    pub open: Option<Decimal>,
    #[serde(default)]
    pub high: Option<Decimal>,
    #[serde(default)]
    pub low: Option<Decimal>,
    pub close: Decimal,
}

impl HistoryBar {
    /// Close of the newest bar, rounded to exchange granularity.
    pub fn latest_close(bars: &[HistoryBar], ticker: &str) -> ExchangeResult<Price> {
        bars.first()
            .map(|bar| Price::new(bar.close).to_cents())
            .ok_or_else(|| ExchangeError::Data(format!("empty price history for {ticker}")))
    }
}

/// One price level of the book.
#[derive(Debug, Clone, Deserialize)]
pub struct BookEntry {
    pub price: Decimal,
    #[serde(default)]
    pub quantity: Option<Decimal>,
}

/// `GET /securities/book`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookResponse {
    #[serde(default)]
    pub bids: Vec<BookEntry>,
    #[serde(default)]
    pub asks: Vec<BookEntry>,
}

impl BookResponse {
    /// Best bid and ask. Either side missing is a data error.
    pub fn top_of_book(&self, ticker: &str) -> ExchangeResult<TopOfBook> {
        let bid = self
            .bids
            .first()
            .ok_or_else(|| ExchangeError::Data(format!("no bids in {ticker} book")))?;
        let ask = self
            .asks
            .first()
            .ok_or_else(|| ExchangeError::Data(format!("no asks in {ticker} book")))?;
        Ok(TopOfBook::new(
            Price::new(bid.price).to_cents(),
            Price::new(ask.price).to_cents(),
        ))
    }
}

/// One row of `GET /securities`.
#[derive(Debug, Clone, Deserialize)]
pub struct SecurityResponse {
    pub ticker: String,
    #[serde(default)]
    pub position: Decimal,
    #[serde(default)]
    pub last: Option<Decimal>,
    #[serde(default)]
    pub bid: Option<Decimal>,
    #[serde(default)]
    pub ask: Option<Decimal>,
}

impl SecurityResponse {
    /// Net position in `ticker`. Falls back to the first row when the
    /// exchange does not echo the ticker back.
    pub fn net_position(rows: &[SecurityResponse], ticker: &str) -> ExchangeResult<Position> {
        let row = rows
            .iter()
            .find(|r| r.ticker == ticker)
            .or_else(|| rows.first())
            .ok_or_else(|| ExchangeError::Data(format!("no security row for {ticker}")))?;
        row.position
            .round()
            .to_i64()
            .map(Position::new)
            .ok_or_else(|| ExchangeError::Data(format!("position out of range: {}", row.position)))
    }
}

/// One row of `GET /orders`, or the body of a successful `POST /orders`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderResponse {
    pub order_id: u64,
    #[serde(default)]
    pub ticker: String,
    #[serde(default)]
    pub quantity: Decimal,
    pub action: OrderSide,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default = "default_status")]
    pub status: OrderStatus,
}

fn default_status() -> OrderStatus {
    OrderStatus::Open
}

impl From<OrderResponse> for OpenOrder {
    fn from(r: OrderResponse) -> Self {
        OpenOrder {
            order_id: r.order_id,
            ticker: r.ticker,
            side: r.action,
            quantity: Quantity::new(r.quantity.trunc().to_u64().unwrap_or(0)),
            price: r.price.map(Price::new),
            status: r.status,
        }
    }
}
