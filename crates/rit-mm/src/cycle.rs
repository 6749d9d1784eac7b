//! Order submission cycle.
//!
//! One call runs one submission pass for the configured mode:
//!
//! ```text
//! ladder:     [scalp pre-check] → for each level: read position → tier
//!                                   for each wave: read close → buy + sell → pause
//! scalp_only: read book + position → scalp orders → pause
//! pair_guard: read open orders → submit pair / cancel all → settle
//! ```
//!
//! Orders are never cancelled or amended here except by the pair guard.
//! Submission outcomes are counted but never change control flow.

use std::ops::AddAssign;
use std::time::Duration;

use rit_core::{Exchange, ExchangeResult, OrderRequest, OrderStatus, SubmitOutcome};
use rit_telemetry::Metrics;
use tracing::{debug, trace};

use crate::config::StrategyConfig;
use crate::guard::GuardAction;
use crate::ladder::{effective_depth, LadderLevel, Quote};
use crate::pacer::Pacer;
use crate::scalp::scalp_orders;
use crate::tier::TierSelector;

const PATH_LADDER: &str = "ladder";
const PATH_SCALP: &str = "scalp";
const PATH_GUARD: &str = "guard";

/// Counters accumulated while submitting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleStats {
    pub cycles: u64,
    pub orders_submitted: u64,
    pub orders_rejected: u64,
    pub scalps_fired: u64,
    pub cancels_sent: u64,
}

impl AddAssign for CycleStats {
    fn add_assign(&mut self, rhs: Self) {
        self.cycles += rhs.cycles;
        self.orders_submitted += rhs.orders_submitted;
        self.orders_rejected += rhs.orders_rejected;
        self.scalps_fired += rhs.scalps_fired;
        self.cancels_sent += rhs.cancels_sent;
    }
}

/// Borrowed view of everything one submission pass needs.
pub struct SubmissionCycle<'a> {
    exchange: &'a dyn Exchange,
    pacer: &'a dyn Pacer,
    config: &'a StrategyConfig,
    selector: &'a TierSelector,
}

impl<'a> SubmissionCycle<'a> {
    pub fn new(
        exchange: &'a dyn Exchange,
        pacer: &'a dyn Pacer,
        config: &'a StrategyConfig,
        selector: &'a TierSelector,
    ) -> Self {
        Self {
            exchange,
            pacer,
            config,
            selector,
        }
    }

    fn ticker(&self) -> &'a str {
        let config: &'a StrategyConfig = self.config;
        &config.ticker
    }

    /// One ladder pass, preceded by the scalp check when enabled.
    ///
    /// Position is re-read before every level and the close before every
    /// wave, so the tier can change mid-ladder.
    pub async fn run_ladder(&self, stats: &mut CycleStats) -> ExchangeResult<()> {
        if self.config.scalp.enabled {
            self.run_scalp(stats).await?;
        }

        let depth = effective_depth(self.config.ladder_depth);
        let waves = self.config.waves_per_level;
        let wave_delay = Duration::from_millis(self.config.wave_delay_ms);
        let level_delay = Duration::from_millis(self.config.level_delay_ms);

        for index in 0..depth {
            let position = self.exchange.position(self.ticker()).await?;
            let params = self.selector.select_for_level(position, index);
            Metrics::position(position.lots());
            Metrics::tier(params.tier.label());

            let level = LadderLevel::at(&params, index, self.config.spread_increment);
            debug!(
                level = index,
                %position,
                tier = %params.tier,
                offset = %level.offset,
                buy = %level.buy_quantity,
                sell = %level.sell_quantity,
                "Quoting ladder level"
            );

            for wave in 0..waves {
                let reference = self.exchange.last_close(self.ticker()).await?;
                let quote = Quote::from_level(self.ticker(), reference, &level);
                trace!(level = index, wave, %reference, "Submitting wave");
                for order in quote.into_orders() {
                    self.submit(order, PATH_LADDER, stats).await;
                }
                if wave + 1 < waves {
                    self.pacer.pause(wave_delay).await;
                }
            }

            if index + 1 < depth && !level_delay.is_zero() {
                self.pacer.pause(level_delay).await;
            }
        }

        stats.cycles += 1;
        Metrics::cycle_completed();
        Ok(())
    }

    /// Scalp check. Returns whether it fired.
    pub async fn run_scalp(&self, stats: &mut CycleStats) -> ExchangeResult<bool> {
        let scalp = &self.config.scalp;
        let book = self.exchange.top_of_book(self.ticker()).await?;
        let position = self.exchange.position(self.ticker()).await?;
        let tier = self.selector.classify(position);
        Metrics::position(position.lots());
        Metrics::tier(tier.label());

        let Some(orders) = scalp_orders(self.ticker(), &book, tier, scalp) else {
            trace!(spread = %book.spread(), "Book not wide enough to scalp");
            return Ok(false);
        };

        debug!(
            bid = %book.bid,
            ask = %book.ask,
            spread = %book.spread(),
            %position,
            %tier,
            orders = orders.len(),
            "Scalping wide market"
        );
        for order in orders {
            self.submit(order, PATH_SCALP, stats).await;
        }
        stats.scalps_fired += 1;
        Metrics::scalp_triggered();

        self.pacer
            .pause(Duration::from_millis(scalp.pause_ms))
            .await;
        Ok(true)
    }

    /// Pair guard pass.
    ///
    /// An empty book gets a fresh pair; the count is then re-read, and
    /// anything other than a pair is cancelled.
    pub async fn run_guard(&self, stats: &mut CycleStats) -> ExchangeResult<()> {
        let guard = &self.config.guard;
        let settle = Duration::from_millis(guard.settle_delay_ms);

        let mut open = self.exchange.orders(OrderStatus::Open).await?.len();
        if GuardAction::for_open_count(open) == GuardAction::SubmitPair {
            let reference = self.exchange.last_close(self.ticker()).await?;
            let quote = Quote::symmetric(
                self.ticker(),
                reference,
                guard.spread,
                guard.quantity,
                guard.quantity,
            );
            debug!(%reference, spread = %guard.spread, "Submitting guarded pair");
            for order in quote.into_orders() {
                self.submit(order, PATH_GUARD, stats).await;
            }
            open = self.exchange.orders(OrderStatus::Open).await?.len();
            self.pacer.pause(settle).await;
        }

        // An empty book right after submitting (both legs filled) waits for
        // the next iteration.
        if open > 0 && GuardAction::for_open_count(open) == GuardAction::CancelAll {
            debug!(open, "Unpaired book, cancelling all");
            self.exchange.cancel_all().await?;
            stats.cancels_sent += 1;
            Metrics::cancel_all_sent();
            self.pacer.pause(settle).await;
        }

        stats.cycles += 1;
        Metrics::cycle_completed();
        Ok(())
    }

    async fn submit(&self, order: OrderRequest, path: &str, stats: &mut CycleStats) {
        let side = order.side;
        let price = order.price;
        let quantity = order.quantity;
        let outcome = self.exchange.submit_order(order).await;

        stats.orders_submitted += 1;
        Metrics::order_submitted(side.as_str(), path);

        if let SubmitOutcome::Rejected(reason) = outcome {
            stats.orders_rejected += 1;
            Metrics::order_rejected(path);
            debug!(%side, %price, %quantity, path, %reason, "Order not accepted");
        }
    }
}
