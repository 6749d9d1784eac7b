//! Session runner: the outer loop.
//!
//! ```text
//! read tick ─┬─ inside (open, close) ─→ Running ─→ iteration ─→ read tick ─┐
//!            │                             ↑                              │
//!            │                             └──────── inside ──────────────┘
//!            └─ outside ─────────────────→ Closed (terminal)
//! ```
//!
//! Shutdown is checked only at the top of each iteration. Resting orders
//! are left on the book when the session closes.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use rit_core::{Exchange, ExchangeError, OrderStatus, SessionState, Tick};
use rit_telemetry::Metrics;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::{DataErrorPolicy, StrategyConfig, StrategyMode};
use crate::cycle::{CycleStats, SubmissionCycle};
use crate::error::StrategyResult;
use crate::pacer::Pacer;
use crate::tier::TierSelector;

/// Why the session loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// A tick read fell at or beyond the window bounds.
    WindowClosed,
    /// The cancellation token fired.
    Shutdown,
    /// The first tick read was already outside the window.
    NeverOpened,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WindowClosed => write!(f, "window_closed"),
            Self::Shutdown => write!(f, "shutdown"),
            Self::NeverOpened => write!(f, "never_opened"),
        }
    }
}

/// What a finished session did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub iterations: u64,
    pub cycles: u64,
    pub orders_submitted: u64,
    pub orders_rejected: u64,
    pub scalps_fired: u64,
    pub cancels_sent: u64,
    pub last_tick: Option<Tick>,
    pub exit_reason: ExitReason,
}

impl SessionSummary {
    fn new(exit_reason: ExitReason) -> Self {
        Self {
            iterations: 0,
            cycles: 0,
            orders_submitted: 0,
            orders_rejected: 0,
            scalps_fired: 0,
            cancels_sent: 0,
            last_tick: None,
            exit_reason,
        }
    }

    fn absorb(&mut self, stats: CycleStats) {
        self.cycles += stats.cycles;
        self.orders_submitted += stats.orders_submitted;
        self.orders_rejected += stats.orders_rejected;
        self.scalps_fired += stats.scalps_fired;
        self.cancels_sent += stats.cancels_sent;
    }
}

/// Drives one trading session against an exchange.
pub struct SessionRunner {
    exchange: Arc<dyn Exchange>,
    pacer: Arc<dyn Pacer>,
    config: StrategyConfig,
    selector: TierSelector,
}

impl SessionRunner {
    /// Validate `config` and build a runner.
    pub fn new(
        exchange: Arc<dyn Exchange>,
        pacer: Arc<dyn Pacer>,
        config: StrategyConfig,
    ) -> StrategyResult<Self> {
        config.validate()?;
        let selector = TierSelector::from_config(&config);
        Ok(Self {
            exchange,
            pacer,
            config,
            selector,
        })
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    fn idle_delay(&self) -> Duration {
        Duration::from_millis(self.config.idle_delay_ms)
    }

    async fn read_tick(&self) -> Result<Tick, ExchangeError> {
        let tick = self.exchange.tick().await?;
        Metrics::tick(tick.value());
        Ok(tick)
    }

    /// Decide whether an exchange error ends the run.
    fn tolerate(&self, err: ExchangeError) -> StrategyResult<()> {
        if err.is_fatal() {
            return Err(err.into());
        }
        match self.config.data_error_policy {
            DataErrorPolicy::Abort => Err(err.into()),
            DataErrorPolicy::SkipIteration => {
                warn!(error = %err, "Skipping iteration after exchange error");
                Ok(())
            }
        }
    }

    /// Read the opening tick, retrying tolerated errors until one succeeds.
    /// Returns `None` when `shutdown` fires first.
    async fn first_tick(&self, shutdown: &CancellationToken) -> StrategyResult<Option<Tick>> {
        loop {
            match self.read_tick().await {
                Ok(tick) => return Ok(Some(tick)),
                Err(e) => self.tolerate(e)?,
            }
            if shutdown.is_cancelled() {
                return Ok(None);
            }
            self.pacer.pause(self.idle_delay()).await;
        }
    }

    /// Run until the window closes or `shutdown` fires.
    pub async fn run(&self, shutdown: CancellationToken) -> StrategyResult<SessionSummary> {
        let window = self.config.session;
        let mut summary = SessionSummary::new(ExitReason::WindowClosed);

        let Some(mut tick) = self.first_tick(&shutdown).await? else {
            summary.exit_reason = ExitReason::Shutdown;
            return Ok(summary);
        };
        summary.last_tick = Some(tick);

        if self.config.wait_for_open {
            while window.is_before_open(tick) {
                if shutdown.is_cancelled() {
                    summary.exit_reason = ExitReason::Shutdown;
                    return Ok(summary);
                }
                debug!(%tick, open = window.open, "Waiting for session to open");
                self.pacer.pause(self.idle_delay()).await;
                tick = match self.read_tick().await {
                    Ok(t) => t,
                    Err(e) => {
                        self.tolerate(e)?;
                        continue;
                    }
                };
                summary.last_tick = Some(tick);
            }
        }

        let mut state = window.state_at(tick);
        if state == SessionState::Closed {
            info!(%tick, open = window.open, close = window.close, "Tick outside session window");
            summary.exit_reason = ExitReason::NeverOpened;
            return Ok(summary);
        }

        info!(
            %tick,
            open = window.open,
            close = window.close,
            mode = %self.config.mode,
            ticker = %self.config.ticker,
            "Session open"
        );

        while state == SessionState::Running {
            if shutdown.is_cancelled() {
                info!(%tick, "Shutdown requested");
                summary.exit_reason = ExitReason::Shutdown;
                return Ok(summary);
            }

            let mut stats = CycleStats::default();
            let result = self.run_iteration(&mut stats).await;
            summary.absorb(stats);
            summary.iterations += 1;
            if let Err(e) = result {
                self.tolerate(e)?;
                self.pacer.pause(self.idle_delay()).await;
            }

            match self.read_tick().await {
                Ok(t) => {
                    tick = t;
                    summary.last_tick = Some(tick);
                    state = window.state_at(tick);
                }
                Err(e) => {
                    self.tolerate(e)?;
                    self.pacer.pause(self.idle_delay()).await;
                }
            }
        }

        info!(%tick, "Session closed");
        Ok(summary)
    }

    /// One outer-loop iteration for the configured mode.
    async fn run_iteration(&self, stats: &mut CycleStats) -> Result<(), ExchangeError> {
        let cycle = SubmissionCycle::new(
            self.exchange.as_ref(),
            self.pacer.as_ref(),
            &self.config,
            &self.selector,
        );

        match self.config.mode {
            StrategyMode::Ladder => {
                if self.config.require_empty_book {
                    let open = self.exchange.orders(OrderStatus::Open).await?.len();
                    if open > 0 {
                        debug!(open, "Orders still resting, idling");
                        self.pacer.pause(self.idle_delay()).await;
                        return Ok(());
                    }
                }
                for _ in 0..self.config.cycles_per_iteration {
                    cycle.run_ladder(stats).await?;
                }
            }
            StrategyMode::ScalpOnly => {
                cycle.run_scalp(stats).await?;
            }
            StrategyMode::PairGuard => {
                cycle.run_guard(stats).await?;
            }
        }
        Ok(())
    }
}
