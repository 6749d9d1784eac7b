//! Exchange boundary trait.
//!
//! The strategy never talks HTTP directly. Everything it needs from the
//! exchange goes through `Exchange`, which allows for:
//! - Dependency injection for testing (`MockExchange`)
//! - Keeping transport and JSON decoding out of the quoting logic

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::error::{ExchangeError, ExchangeResult};
use crate::{
    OpenOrder, OrderRequest, OrderSide, OrderStatus, Position, Price, Quantity, Tick, TopOfBook,
};

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Result of an order submission.
///
/// The submission cycle does not branch on this; it is only logged and
/// counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Exchange accepted the order.
    Accepted { order_id: Option<u64> },
    /// Exchange (or transport) refused the order.
    Rejected(String),
}

impl SubmitOutcome {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Operations the agent consumes from the exchange.
pub trait Exchange: Send + Sync {
    /// Current session tick.
    fn tick(&self) -> BoxFuture<'_, ExchangeResult<Tick>>;

    /// Most recent close for `ticker`.
    fn last_close<'a>(&'a self, ticker: &'a str) -> BoxFuture<'a, ExchangeResult<Price>>;

    /// Best bid and ask for `ticker`.
    fn top_of_book<'a>(&'a self, ticker: &'a str) -> BoxFuture<'a, ExchangeResult<TopOfBook>>;

    /// Net position in `ticker`.
    fn position<'a>(&'a self, ticker: &'a str) -> BoxFuture<'a, ExchangeResult<Position>>;

    /// Orders in the given status.
    fn orders(&self, status: OrderStatus) -> BoxFuture<'_, ExchangeResult<Vec<OpenOrder>>>;

    /// Fire-and-forget limit order submission.
    fn submit_order(&self, order: OrderRequest) -> BoxFuture<'_, SubmitOutcome>;

    /// Cancel every open order.
    fn cancel_all(&self) -> BoxFuture<'_, ExchangeResult<()>>;
}

/// A call observed by `MockExchange`, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockEvent {
    Tick,
    LastClose,
    TopOfBook,
    Position,
    Orders,
    Submit(OrderRequest),
    CancelAll,
}

/// Scripted values: consumed front to back, the last one repeats forever.
#[derive(Debug)]
struct Script<T> {
    values: VecDeque<T>,
}

impl<T: Clone> Script<T> {
    fn new() -> Self {
        Self {
            values: VecDeque::new(),
        }
    }

    fn set(&mut self, values: impl IntoIterator<Item = T>) {
        self.values = values.into_iter().collect();
    }

    fn next(&mut self) -> Option<T> {
        if self.values.len() > 1 {
            self.values.pop_front()
        } else {
            self.values.front().cloned()
        }
    }
}

/// Scripted exchange for testing.
#[derive(Debug)]
pub struct MockExchange {
    ticks: Mutex<Script<ExchangeResult<Tick>>>,
    closes: Mutex<Script<ExchangeResult<Price>>>,
    books: Mutex<Script<ExchangeResult<TopOfBook>>>,
    positions: Mutex<Script<Position>>,
    open_counts: Mutex<Script<usize>>,
    events: Mutex<Vec<MockEvent>>,
    reject_submissions: AtomicBool,
}

impl Default for MockExchange {
    fn default() -> Self {
        Self::new()
    }
}

impl MockExchange {
    /// Create a mock with nothing scripted.
    pub fn new() -> Self {
        Self {
            ticks: Mutex::new(Script::new()),
            closes: Mutex::new(Script::new()),
            books: Mutex::new(Script::new()),
            positions: Mutex::new(Script::new()),
            open_counts: Mutex::new(Script::new()),
            events: Mutex::new(Vec::new()),
            reject_submissions: AtomicBool::new(false),
        }
    }

    pub fn with_ticks(self, ticks: impl IntoIterator<Item = u32>) -> Self {
        self.ticks.lock().set(ticks.into_iter().map(|t| Ok(Tick::new(t))));
        self
    }

    /// Script tick reads, including failures.
    pub fn with_tick_results(
        self,
        results: impl IntoIterator<Item = ExchangeResult<Tick>>,
    ) -> Self {
        self.ticks.lock().set(results);
        self
    }

    pub fn with_closes(self, closes: impl IntoIterator<Item = rust_decimal::Decimal>) -> Self {
        self.closes
            .lock()
            .set(closes.into_iter().map(|c| Ok(Price::new(c))));
        self
    }

    /// Make every close query fail with `err`.
    pub fn with_close_error(self, err: ExchangeError) -> Self {
        self.closes.lock().set([Err(err)]);
        self
    }

    /// Script close results, including failures.
    pub fn with_close_results(
        self,
        results: impl IntoIterator<Item = ExchangeResult<Price>>,
    ) -> Self {
        self.closes.lock().set(results);
        self
    }

    pub fn with_book(self, bid: rust_decimal::Decimal, ask: rust_decimal::Decimal) -> Self {
        self.books
            .lock()
            .set([Ok(TopOfBook::new(Price::new(bid), Price::new(ask)))]);
        self
    }

    pub fn with_positions(self, positions: impl IntoIterator<Item = i64>) -> Self {
        self.positions
            .lock()
            .set(positions.into_iter().map(Position::new));
        self
    }

    pub fn with_open_order_counts(self, counts: impl IntoIterator<Item = usize>) -> Self {
        self.open_counts.lock().set(counts);
        self
    }

    /// Reject every submitted order.
    pub fn rejecting(self) -> Self {
        self.reject_submissions.store(true, Ordering::SeqCst);
        self
    }

    /// All recorded calls, in order.
    pub fn events(&self) -> Vec<MockEvent> {
        self.events.lock().clone()
    }

    /// Orders submitted so far, in order.
    pub fn submitted(&self) -> Vec<OrderRequest> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                MockEvent::Submit(order) => Some(order.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, event: &MockEvent) -> usize {
        self.events.lock().iter().filter(|e| *e == event).count()
    }

    pub fn cancel_all_count(&self) -> usize {
        self.count(&MockEvent::CancelAll)
    }

    fn record(&self, event: MockEvent) {
        self.events.lock().push(event);
    }

    fn unscripted<T>(what: &str) -> ExchangeResult<T> {
        Err(ExchangeError::Data(format!("no scripted {what}")))
    }
}

impl Exchange for MockExchange {
    fn tick(&self) -> BoxFuture<'_, ExchangeResult<Tick>> {
        self.record(MockEvent::Tick);
        let next = self.ticks.lock().next();
        Box::pin(async move { next.unwrap_or_else(|| Self::unscripted("tick")) })
    }

    fn last_close<'a>(&'a self, _ticker: &'a str) -> BoxFuture<'a, ExchangeResult<Price>> {
        self.record(MockEvent::LastClose);
        let next = self.closes.lock().next();
        Box::pin(async move { next.unwrap_or_else(|| Self::unscripted("close")) })
    }

    fn top_of_book<'a>(&'a self, _ticker: &'a str) -> BoxFuture<'a, ExchangeResult<TopOfBook>> {
        self.record(MockEvent::TopOfBook);
        let next = self.books.lock().next();
        Box::pin(async move { next.unwrap_or_else(|| Self::unscripted("book")) })
    }

    fn position<'a>(&'a self, _ticker: &'a str) -> BoxFuture<'a, ExchangeResult<Position>> {
        self.record(MockEvent::Position);
        let next = self.positions.lock().next().unwrap_or(Position::FLAT);
        Box::pin(async move { Ok(next) })
    }

    fn orders(&self, status: OrderStatus) -> BoxFuture<'_, ExchangeResult<Vec<OpenOrder>>> {
        self.record(MockEvent::Orders);
        let count = self.open_counts.lock().next().unwrap_or(0);
        Box::pin(async move {
            Ok((0..count)
                .map(|i| OpenOrder {
                    order_id: i as u64 + 1,
                    ticker: "MOCK".to_string(),
                    side: if i % 2 == 0 {
                        OrderSide::Buy
                    } else {
                        OrderSide::Sell
                    },
                    quantity: Quantity::new(100),
                    price: None,
                    status,
                })
                .collect())
        })
    }

    fn submit_order(&self, order: OrderRequest) -> BoxFuture<'_, SubmitOutcome> {
        self.record(MockEvent::Submit(order));
        let reject = self.reject_submissions.load(Ordering::SeqCst);
        Box::pin(async move {
            if reject {
                SubmitOutcome::Rejected("mock rejection".to_string())
            } else {
                SubmitOutcome::Accepted { order_id: None }
            }
        })
    }

    fn cancel_all(&self) -> BoxFuture<'_, ExchangeResult<()>> {
        self.record(MockEvent::CancelAll);
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_script_repeats_last_value() {
        let mock = MockExchange::new().with_ticks([3, 4]);
        assert_eq!(mock.tick().await.unwrap(), Tick::new(3));
        assert_eq!(mock.tick().await.unwrap(), Tick::new(4));
        assert_eq!(mock.tick().await.unwrap(), Tick::new(4));
    }

    #[tokio::test]
    async fn test_scripted_tick_failure() {
        let mock = MockExchange::new().with_tick_results([
            Err(ExchangeError::Http("timeout".to_string())),
            Ok(Tick::new(7)),
        ]);
        assert!(!mock.tick().await.unwrap_err().is_fatal());
        assert_eq!(mock.tick().await.unwrap(), Tick::new(7));
        assert_eq!(mock.count(&MockEvent::Tick), 2);
    }

    #[tokio::test]
    async fn test_unscripted_close_is_data_error() {
        let mock = MockExchange::new();
        let err = mock.last_close("ALGO").await.unwrap_err();
        assert!(err.is_data());
    }

    #[tokio::test]
    async fn test_records_submissions() {
        let mock = MockExchange::new().rejecting();
        let order = OrderRequest::buy("ALGO", Quantity::new(10), Price::new(dec!(25)));
        let outcome = mock.submit_order(order.clone()).await;
        assert!(!outcome.is_accepted());
        assert_eq!(mock.submitted(), vec![order]);
    }

    #[tokio::test]
    async fn test_open_order_counts() {
        let mock = MockExchange::new().with_open_order_counts([0, 3]);
        assert!(mock.orders(OrderStatus::Open).await.unwrap().is_empty());
        assert_eq!(mock.orders(OrderStatus::Open).await.unwrap().len(), 3);
    }
}
