//! Mock RIT exchange for integration tests.
//!
//! Serves the subset of the case REST API the agent uses:
//! - Scripted ticks (the last one repeats)
//! - Fixed close, book and position
//! - Records every submitted order and cancel command

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const TEST_API_KEY: &str = "474RQCA1";

/// An order as received by `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedOrder {
    pub ticker: String,
    pub order_type: String,
    pub action: String,
    pub quantity: u64,
    pub price: Decimal,
}

#[derive(Debug)]
struct ExchangeState {
    ticks: VecDeque<u32>,
    close: Option<f64>,
    book: Option<(f64, f64)>,
    position: i64,
    open_orders: usize,
    orders: Vec<RecordedOrder>,
    cancel_alls: usize,
    next_order_id: u64,
}

type Shared = Arc<Mutex<ExchangeState>>;

/// A mock RIT REST server bound to an ephemeral local port.
pub struct MockExchangeServer {
    addr: SocketAddr,
    state: Shared,
    handle: JoinHandle<()>,
}

impl MockExchangeServer {
    /// Start a server with a flat position, an empty book and no history.
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(ExchangeState {
            ticks: VecDeque::from([1]),
            close: None,
            book: None,
            position: 0,
            open_orders: 0,
            orders: Vec::new(),
            cancel_alls: 0,
            next_order_id: 1,
        }));

        let router = Router::new()
            .route("/v1/case", get(case))
            .route("/v1/securities", get(securities))
            .route("/v1/securities/history", get(history))
            .route("/v1/securities/book", get(book))
            .route("/v1/orders", get(open_orders).post(submit_order))
            .route("/v1/commands/cancel", post(cancel))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    /// API root to hand to `RitClient`.
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    pub fn set_ticks(&self, ticks: impl IntoIterator<Item = u32>) {
        self.state.lock().ticks = ticks.into_iter().collect();
    }

    pub fn set_close(&self, close: f64) {
        self.state.lock().close = Some(close);
    }

    pub fn set_book(&self, bid: f64, ask: f64) {
        self.state.lock().book = Some((bid, ask));
    }

    pub fn set_position(&self, position: i64) {
        self.state.lock().position = position;
    }

    pub fn set_open_orders(&self, count: usize) {
        self.state.lock().open_orders = count;
    }

    pub fn orders(&self) -> Vec<RecordedOrder> {
        self.state.lock().orders.clone()
    }

    pub fn cancel_all_count(&self) -> usize {
        self.state.lock().cancel_alls
    }

    pub fn shutdown(self) {
        self.handle.abort();
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("X-API-Key")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|key| key == TEST_API_KEY)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"code": "NOT_AUTHORIZED", "message": "API key mismatch"})),
    )
        .into_response()
}

async fn case(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut state = state.lock();
    let tick = if state.ticks.len() > 1 {
        state.ticks.pop_front().unwrap_or_default()
    } else {
        state.ticks.front().copied().unwrap_or_default()
    };
    Json(json!({
        "name": "ALGO2",
        "period": 1,
        "tick": tick,
        "ticks_per_period": 300,
        "total_periods": 1,
        "status": "ACTIVE",
        "is_enforce_trading_limits": false
    }))
    .into_response()
}

async fn securities(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let ticker = params.get("ticker").cloned().unwrap_or_else(|| "ALGO".to_string());
    let position = state.lock().position;
    Json(json!([{ "ticker": ticker, "type": "STOCK", "position": position as f64 }]))
        .into_response()
}

async fn history(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let state = state.lock();
    let tick = state.ticks.front().copied().unwrap_or_default();
    match state.close {
        Some(close) => Json(json!([{
            "tick": tick, "open": close, "high": close, "low": close, "close": close
        }]))
        .into_response(),
        None => Json(json!([])).into_response(),
    }
}

async fn book(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    match state.lock().book {
        Some((bid, ask)) => Json(json!({
            "bids": [{ "price": bid, "quantity": 1000, "action": "BUY" }],
            "asks": [{ "price": ask, "quantity": 1000, "action": "SELL" }]
        }))
        .into_response(),
        None => Json(json!({ "bids": [], "asks": [] })).into_response(),
    }
}

async fn open_orders(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let count = state.lock().open_orders;
    let rows: Vec<_> = (0..count)
        .map(|i| {
            json!({
                "order_id": i + 1,
                "ticker": "ALGO",
                "type": "LIMIT",
                "quantity": 100.0,
                "action": if i % 2 == 0 { "BUY" } else { "SELL" },
                "price": 25.0,
                "status": "OPEN"
            })
        })
        .collect();
    Json(rows).into_response()
}

async fn submit_order(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let field = |name: &str| params.get(name).cloned().unwrap_or_default();
    let (Ok(quantity), Ok(price)) = (
        field("quantity").parse::<u64>(),
        field("price").parse::<Decimal>(),
    ) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"code": "INVALID_PARAMS", "message": "bad quantity or price"})),
        )
            .into_response();
    };
    let order = RecordedOrder {
        ticker: field("ticker"),
        order_type: field("type"),
        action: field("action"),
        quantity,
        price,
    };

    let mut state = state.lock();
    let order_id = state.next_order_id;
    state.next_order_id += 1;
    let body = json!({
        "order_id": order_id,
        "ticker": order.ticker,
        "type": order.order_type,
        "quantity": quantity,
        "action": order.action,
        "price": order.price.to_string().parse::<f64>().unwrap_or_default(),
        "status": "OPEN"
    });
    state.orders.push(order);
    Json(body).into_response()
}

async fn cancel(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    state.lock().cancel_alls += 1;
    Json(json!({ "cancelled_order_ids": [] })).into_response()
}
