//! Application wiring.

use std::future::Future;
use std::io;
use std::sync::Arc;

use rit_client::RitClient;
use rit_core::Exchange;
use rit_mm::{Pacer, SessionRunner, SessionSummary, StrategyConfig, TokioPacer};
use rit_telemetry::Metrics;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::AppConfig;
use crate::error::AppResult;

/// Cancel `token` on the first interrupt, then wait for another.
///
/// Returns `true` once a second interrupt arrives, `false` if the signal
/// source fails.
async fn watch_interrupts<F, Fut>(mut next_signal: F, token: CancellationToken) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    if let Err(e) = next_signal().await {
        warn!(error = %e, "Failed to listen for interrupts");
        return false;
    }
    info!("Interrupt received, stopping at the next iteration");
    token.cancel();
    next_signal().await.is_ok()
}

/// Main application.
pub struct Application {
    strategy: StrategyConfig,
    exchange: Arc<dyn Exchange>,
    pacer: Arc<dyn Pacer>,
    shutdown: CancellationToken,
}

impl Application {
    /// Validate the config and connect the REST client.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        config.validate()?;
        let client = RitClient::new(
            config.exchange.base_url.as_str(),
            &config.exchange.api_key,
            config.exchange.request_timeout(),
        )?;
        info!(
            base_url = %client.base_url(),
            preset = %config.preset,
            custom_strategy = config.has_custom_strategy(),
            "Exchange client ready"
        );
        Ok(Self::with_exchange(
            config.strategy_config(),
            Arc::new(client),
            Arc::new(TokioPacer),
        ))
    }

    /// Build around an existing exchange and pacer.
    pub fn with_exchange(
        strategy: StrategyConfig,
        exchange: Arc<dyn Exchange>,
        pacer: Arc<dyn Pacer>,
    ) -> Self {
        Self {
            strategy,
            exchange,
            pacer,
            shutdown: CancellationToken::new(),
        }
    }

    /// Token that stops the session at the next iteration boundary.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Run one session to completion.
    pub async fn run(self) -> AppResult<SessionSummary> {
        info!(
            ticker = %self.strategy.ticker,
            mode = %self.strategy.mode,
            open = self.strategy.session.open,
            close = self.strategy.session.close,
            "Starting session"
        );

        let token = self.shutdown.clone();
        let signal_task = tokio::spawn(async move {
            if watch_interrupts(tokio::signal::ctrl_c, token).await {
                warn!("Second interrupt received, exiting immediately");
                std::process::exit(130);
            }
        });

        let runner = SessionRunner::new(self.exchange, self.pacer, self.strategy)?;
        let result = runner.run(self.shutdown).await;
        signal_task.abort();

        let summary = match result {
            Ok(summary) => summary,
            Err(e) => {
                error!(error = %e, "Session aborted");
                return Err(e.into());
            }
        };

        info!(
            exit_reason = %summary.exit_reason,
            iterations = summary.iterations,
            cycles = summary.cycles,
            orders_submitted = summary.orders_submitted,
            orders_rejected = summary.orders_rejected,
            scalps_fired = summary.scalps_fired,
            cancels_sent = summary.cancels_sent,
            last_tick = ?summary.last_tick.map(|t| t.value()),
            "Session summary"
        );
        match Metrics::render() {
            Ok(text) => debug!(metrics = %text, "Final metrics"),
            Err(e) => warn!(error = %e, "Failed to render metrics"),
        }

        Ok(summary)
    }
}
