//! REST client and end-to-end session tests.
//!
//! Runs the real `RitClient` against the mock exchange:
//! - Request shape and error mapping
//! - Full sessions through `SessionRunner` and `Application`

mod integration;
use integration::common::mock_exchange::{MockExchangeServer, TEST_API_KEY};

use std::sync::Arc;
use std::time::Duration;

use rit_bot::Application;
use rit_client::RitClient;
use rit_core::{Exchange, ExchangeError, OrderRequest, OrderStatus, Position, Price, Quantity, Tick};
use rit_mm::{ExitReason, Preset, RecordingPacer, SessionRunner, StrategyConfig};
use rust_decimal_macros::dec;
use tokio_util::sync::CancellationToken;

fn client(server: &MockExchangeServer) -> RitClient {
    RitClient::new(server.base_url(), TEST_API_KEY, Duration::from_secs(2)).unwrap()
}

/// Test that market data reads decode the exchange's JSON.
#[tokio::test]
async fn test_client_reads_market_data() {
    let server = MockExchangeServer::start().await;
    server.set_ticks([42]);
    server.set_close(25.03);
    server.set_book(24.99, 25.05);
    server.set_position(-12_000);
    server.set_open_orders(2);

    let client = client(&server);
    assert_eq!(client.tick().await.unwrap(), Tick::new(42));
    assert_eq!(client.last_close("ALGO").await.unwrap(), Price::new(dec!(25.03)));

    let top = client.top_of_book("ALGO").await.unwrap();
    assert_eq!(top.bid.inner(), dec!(24.99));
    assert_eq!(top.ask.inner(), dec!(25.05));

    assert_eq!(client.position("ALGO").await.unwrap(), Position::new(-12_000));
    assert_eq!(client.orders(OrderStatus::Open).await.unwrap().len(), 2);

    server.shutdown();
}

/// Test that a key mismatch surfaces as an authentication error.
#[tokio::test]
async fn test_wrong_api_key_is_authentication_error() {
    let server = MockExchangeServer::start().await;
    let client = RitClient::new(server.base_url(), "WRONGKEY", Duration::from_secs(2)).unwrap();

    let err = client.tick().await.unwrap_err();
    assert!(matches!(err, ExchangeError::Authentication(_)));
    assert!(err.is_fatal());

    let err = client.last_close("ALGO").await.unwrap_err();
    assert!(err.is_fatal());

    server.shutdown();
}

/// Test that empty history and an empty book are data errors.
#[tokio::test]
async fn test_empty_payloads_are_data_errors() {
    let server = MockExchangeServer::start().await;
    let client = client(&server);

    assert!(client.last_close("ALGO").await.unwrap_err().is_data());
    assert!(client.top_of_book("ALGO").await.unwrap_err().is_data());

    server.shutdown();
}

/// Test that orders go out as query parameters with two-decimal prices.
#[tokio::test]
async fn test_submit_order_query_parameters() {
    let server = MockExchangeServer::start().await;
    let client = client(&server);

    let order = OrderRequest::buy("ALGO", Quantity::new(150), Price::new(dec!(24.989)));
    let outcome = client.submit_order(order).await;
    assert!(outcome.is_accepted());

    let orders = server.orders();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].ticker, "ALGO");
    assert_eq!(orders[0].order_type, "LIMIT");
    assert_eq!(orders[0].action, "BUY");
    assert_eq!(orders[0].quantity, 150);
    assert_eq!(orders[0].price, dec!(24.99));

    server.shutdown();
}

/// Test that submission failures are reported, not raised.
#[tokio::test]
async fn test_rejected_submission_is_silent() {
    let server = MockExchangeServer::start().await;
    let client = RitClient::new(server.base_url(), "WRONGKEY", Duration::from_secs(2)).unwrap();

    let order = OrderRequest::sell("ALGO", Quantity::new(10), Price::new(dec!(25.01)));
    assert!(!client.submit_order(order).await.is_accepted());
    assert!(server.orders().is_empty());

    server.shutdown();
}

#[tokio::test]
async fn test_cancel_all() {
    let server = MockExchangeServer::start().await;
    let client = client(&server);

    client.cancel_all().await.unwrap();
    assert_eq!(server.cancel_all_count(), 1);

    server.shutdown();
}

/// Test a two-level ladder session end-to-end over HTTP.
#[tokio::test]
async fn test_ladder_session_over_http() {
    let server = MockExchangeServer::start().await;
    server.set_ticks([2, 3, 5]);
    server.set_close(100.0);
    server.set_position(20_000);

    let config = StrategyConfig {
        session: rit_core::SessionWindow { open: 1, close: 5 },
        inventory_threshold: 15_000,
        ladder_depth: 2,
        waves_per_level: 1,
        cycles_per_iteration: 1,
        ..Preset::Ladder.config()
    };
    let exchange: Arc<dyn Exchange> = Arc::new(client(&server));
    let pacer = Arc::new(RecordingPacer::new());
    let runner = SessionRunner::new(exchange, pacer, config).unwrap();

    let summary = runner.run(CancellationToken::new()).await.unwrap();
    assert_eq!(summary.exit_reason, ExitReason::WindowClosed);
    assert_eq!(summary.iterations, 2);
    assert_eq!(summary.orders_submitted, 8);

    let orders = server.orders();
    let first: Vec<_> = orders[..4]
        .iter()
        .map(|o| (o.action.as_str(), o.quantity, o.price))
        .collect();
    assert_eq!(
        first,
        vec![
            ("BUY", 10, dec!(99.99)),
            ("SELL", 500, dec!(100.01)),
            ("BUY", 10, dec!(99.98)),
            ("SELL", 500, dec!(100.02)),
        ]
    );
    assert_eq!(server.cancel_all_count(), 0);

    server.shutdown();
}

/// Test the baseline pair guard cancelling an unpaired book.
#[tokio::test]
async fn test_baseline_cancels_unpaired_book() {
    let server = MockExchangeServer::start().await;
    server.set_ticks([6, 295]);
    server.set_close(25.0);
    server.set_open_orders(1);

    let config = StrategyConfig {
        guard: rit_mm::GuardConfig {
            settle_delay_ms: 0,
            ..Default::default()
        },
        ..Preset::Baseline.config()
    };
    let exchange: Arc<dyn Exchange> = Arc::new(client(&server));
    let pacer = Arc::new(RecordingPacer::new());
    let summary = SessionRunner::new(exchange, pacer, config)
        .unwrap()
        .run(CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.cancels_sent, 1);
    assert!(server.orders().is_empty());
    assert_eq!(server.cancel_all_count(), 1);

    server.shutdown();
}

/// Test that an authentication failure aborts the application.
#[tokio::test]
async fn test_application_aborts_on_bad_key() {
    let server = MockExchangeServer::start().await;
    server.set_ticks([2]);

    let exchange: Arc<dyn Exchange> = Arc::new(
        RitClient::new(server.base_url(), "WRONGKEY", Duration::from_secs(2)).unwrap(),
    );
    let app = Application::with_exchange(
        Preset::Ladder.config(),
        exchange,
        Arc::new(RecordingPacer::new()),
    );
    let err = app.run().await.unwrap_err();
    assert!(matches!(
        err,
        rit_bot::AppError::Strategy(rit_mm::StrategyError::Exchange(
            ExchangeError::Authentication(_)
        ))
    ));

    server.shutdown();
}

/// Test a full application run from configuration.
#[tokio::test]
async fn test_application_runs_from_config() {
    let server = MockExchangeServer::start().await;
    server.set_ticks([2, 4]);
    server.set_close(25.0);

    let toml = format!(
        r#"
[exchange]
base_url = "{}"
api_key = "{}"
request_timeout_ms = 2000

[strategy]
ladder_depth = 3
waves_per_level = 1
wave_delay_ms = 0
cycles_per_iteration = 1

[strategy.session]
open = 1
close = 4
"#,
        server.base_url(),
        TEST_API_KEY
    );
    let config = rit_bot::AppConfig::from_toml(&toml).unwrap();
    let app = Application::new(config).unwrap();
    let summary = app.run().await.unwrap();

    assert_eq!(summary.iterations, 1);
    assert_eq!(summary.orders_submitted, 6);
    let prices: Vec<_> = server.orders().iter().map(|o| o.price).collect();
    assert_eq!(
        prices,
        vec![dec!(24.99), dec!(25.01), dec!(24.98), dec!(25.02), dec!(24.97), dec!(25.03)]
    );

    server.shutdown();
}

/// Test that a cancelled token stops the session before any order.
#[tokio::test]
async fn test_shutdown_token_stops_session() {
    let server = MockExchangeServer::start().await;
    server.set_ticks([2]);
    server.set_close(25.0);

    let exchange: Arc<dyn Exchange> = Arc::new(client(&server));
    let app = Application::with_exchange(
        Preset::Ladder.config(),
        exchange,
        Arc::new(RecordingPacer::new()),
    );
    app.shutdown_token().cancel();
    let summary = app.run().await.unwrap();

    assert_eq!(summary.exit_reason, ExitReason::Shutdown);
    assert!(server.orders().is_empty());

    server.shutdown();
}
