//! Prometheus metrics for the RIT market maker.
//!
//! # Panics
//!
//! Metric registration uses `unwrap()`. A registration failure means a
//! duplicate metric name, which is a programming error caught at first use.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_int_counter, register_int_gauge, register_int_gauge_vec,
    CounterVec, Encoder, IntCounter, IntGauge, IntGaugeVec, TextEncoder,
};

use crate::error::{TelemetryError, TelemetryResult};

/// Orders sent to the exchange.
/// Labels: side (BUY/SELL), path (ladder/scalp/guard)
pub static ORDERS_SUBMITTED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "rit_orders_submitted_total",
        "Total limit orders submitted",
        &["side", "path"]
    )
    .unwrap()
});

/// Orders the exchange refused. Control flow ignores these.
pub static ORDERS_REJECTED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "rit_orders_rejected_total",
        "Total order submissions refused by the exchange",
        &["path"]
    )
    .unwrap()
});

/// Completed submission cycles.
pub static CYCLES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("rit_cycles_total", "Total submission cycles completed").unwrap()
});

/// Wide-spread scalp triggers.
pub static SCALP_TRIGGERS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("rit_scalp_triggers_total", "Total scalp path triggers").unwrap()
});

/// Cancel-all commands sent.
pub static CANCEL_ALL_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("rit_cancel_all_total", "Total cancel-all commands sent").unwrap()
});

/// Last observed net position.
pub static POSITION: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!("rit_position", "Last observed net position").unwrap()
});

/// Last observed session tick.
pub static TICK: Lazy<IntGauge> =
    Lazy::new(|| register_int_gauge!("rit_tick", "Last observed session tick").unwrap());

/// Active inventory tier (1 = active, 0 = inactive).
pub static TIER: Lazy<IntGaugeVec> = Lazy::new(|| {
    register_int_gauge_vec!("rit_tier", "Active inventory tier (1=active)", &["tier"]).unwrap()
});

const TIER_LABELS: [&str; 3] = ["long_heavy", "short_heavy", "neutral"];

/// Metrics facade.
pub struct Metrics;

impl Metrics {
    /// Record an order submission.
    pub fn order_submitted(side: &str, path: &str) {
        ORDERS_SUBMITTED_TOTAL.with_label_values(&[side, path]).inc();
    }

    /// Record a refused submission.
    pub fn order_rejected(path: &str) {
        ORDERS_REJECTED_TOTAL.with_label_values(&[path]).inc();
    }

    pub fn cycle_completed() {
        CYCLES_TOTAL.inc();
    }

    pub fn scalp_triggered() {
        SCALP_TRIGGERS_TOTAL.inc();
    }

    pub fn cancel_all_sent() {
        CANCEL_ALL_TOTAL.inc();
    }

    pub fn position(lots: i64) {
        POSITION.set(lots);
    }

    pub fn tick(tick: u32) {
        TICK.set(i64::from(tick));
    }

    /// Set the active tier. Only the active label is 1.
    pub fn tier(active: &str) {
        for label in TIER_LABELS {
            TIER.with_label_values(&[label])
                .set(i64::from(label == active));
        }
    }

    /// Render every registered metric in the Prometheus text format.
    pub fn render() -> TelemetryResult<String> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&prometheus::gather(), &mut buffer)
            .map_err(|e| TelemetryError::Metrics(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| TelemetryError::Metrics(e.to_string()))
    }
}
