//! Market making configuration.
//!
//! One parameterized strategy covers every variant: the differences are
//! thresholds, boundary rule, ladder depth, pacing and mode. `Preset`
//! reproduces the known variants.

use rit_core::{Quantity, SessionWindow};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{StrategyError, StrategyResult};

/// Which submission path the outer loop drives each iteration.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StrategyMode {
    /// Laddered passive quotes, optionally preceded by the scalp path.
    #[default]
    Ladder,
    /// Only the wide-spread scalp path.
    ScalpOnly,
    /// One pair of quotes kept alive; unpaired books are cancelled.
    PairGuard,
}

impl fmt::Display for StrategyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ladder => write!(f, "ladder"),
            Self::ScalpOnly => write!(f, "scalp_only"),
            Self::PairGuard => write!(f, "pair_guard"),
        }
    }
}

/// Comparison used at the inventory threshold.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryRule {
    /// `position > T` is long-heavy; `position == T` is neutral.
    #[default]
    Exclusive,
    /// `position >= T` is long-heavy.
    Inclusive,
}

/// What to do when a market data query returns empty or unexpected data.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DataErrorPolicy {
    /// Abort the run.
    Abort,
    /// Log, idle, and retry from the next tick read.
    #[default]
    SkipIteration,
}

/// Spread and per-side sizes for one inventory tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierSizing {
    /// Base half-spread around the reference price.
    pub spread: Decimal,
    pub buy_quantity: Quantity,
    pub sell_quantity: Quantity,
}

impl TierSizing {
    pub fn new(spread: Decimal, buy: u64, sell: u64) -> Self {
        Self {
            spread,
            buy_quantity: Quantity::new(buy),
            sell_quantity: Quantity::new(sell),
        }
    }
}

/// Sizing for every tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierTable {
    pub long_heavy: TierSizing,
    pub short_heavy: TierSizing,
    pub neutral: TierSizing,
}

impl Default for TierTable {
    fn default() -> Self {
        let spread = Decimal::new(1, 2);
        Self {
            long_heavy: TierSizing::new(spread, 10, 500),
            short_heavy: TierSizing::new(spread, 500, 10),
            neutral: TierSizing::new(spread, 150, 150),
        }
    }
}

/// Wide-spread scalp path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalpConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Fires when `ask - bid` is strictly greater than this.
    #[serde(default = "default_scalp_threshold")]
    pub threshold: Decimal,

    /// Buy/sell pairs sent per trigger.
    #[serde(default = "default_scalp_repetitions")]
    pub repetitions: u32,

    #[serde(default = "default_scalp_quantity")]
    pub quantity: Quantity,

    /// Buys go in at `bid + improvement`, sells at `ask - improvement`.
    #[serde(default = "default_price_improvement")]
    pub price_improvement: Decimal,

    /// Zero the heavy side's quantity when inventory is skewed.
    #[serde(default = "default_true")]
    pub skew_by_tier: bool,

    /// Pause after a trigger, in milliseconds.
    #[serde(default = "default_scalp_pause_ms")]
    pub pause_ms: u64,
}

impl Default for ScalpConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            threshold: default_scalp_threshold(),
            repetitions: default_scalp_repetitions(),
            quantity: default_scalp_quantity(),
            price_improvement: default_price_improvement(),
            skew_by_tier: true,
            pause_ms: default_scalp_pause_ms(),
        }
    }
}

/// Pair-guard mode parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardConfig {
    #[serde(default = "default_guard_spread")]
    pub spread: Decimal,

    #[serde(default = "default_guard_quantity")]
    pub quantity: Quantity,

    /// Pause after a pair submission and after a cancel-all.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            spread: default_guard_spread(),
            quantity: default_guard_quantity(),
            settle_delay_ms: default_settle_delay_ms(),
        }
    }
}

/// Strategy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Traded instrument.
    #[serde(default = "default_ticker")]
    pub ticker: String,

    /// Tick window; both bounds exclusive.
    #[serde(default = "default_session")]
    pub session: SessionWindow,

    #[serde(default)]
    pub mode: StrategyMode,

    /// Inventory magnitude that separates skewed tiers from neutral.
    #[serde(default = "default_inventory_threshold")]
    pub inventory_threshold: i64,

    #[serde(default)]
    pub boundary: BoundaryRule,

    #[serde(default)]
    pub tiers: TierTable,

    /// Per-level neutral sizes. Level `i` uses entry `i` when present,
    /// otherwise the neutral tier size.
    #[serde(default)]
    pub neutral_level_quantities: Vec<Quantity>,

    /// Offset added per ladder level.
    #[serde(default = "default_spread_increment")]
    pub spread_increment: Decimal,

    /// Number of ladder levels. 0 quotes a single flat spread.
    #[serde(default = "default_ladder_depth")]
    pub ladder_depth: u32,

    /// Quote pairs sent per level, each against a fresh reference price.
    #[serde(default = "default_waves_per_level")]
    pub waves_per_level: u32,

    /// Pause between waves of the same level.
    #[serde(default = "default_wave_delay_ms")]
    pub wave_delay_ms: u64,

    /// Pause between levels.
    #[serde(default)]
    pub level_delay_ms: u64,

    /// Ladder cycles per outer-loop iteration.
    #[serde(default = "default_cycles_per_iteration")]
    pub cycles_per_iteration: u32,

    /// Only ladder when no orders are resting.
    #[serde(default = "default_true")]
    pub require_empty_book: bool,

    /// Pause when an iteration has nothing to do or was skipped.
    #[serde(default = "default_idle_delay_ms")]
    pub idle_delay_ms: u64,

    #[serde(default)]
    pub data_error_policy: DataErrorPolicy,

    #[serde(default)]
    pub scalp: ScalpConfig,

    #[serde(default)]
    pub guard: GuardConfig,

    /// Poll the clock until the window opens instead of exiting.
    #[serde(default)]
    pub wait_for_open: bool,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Preset::Ladder.config()
    }
}

impl StrategyConfig {
    /// Check that the configuration can drive a session.
    pub fn validate(&self) -> StrategyResult<()> {
        if self.ticker.trim().is_empty() {
            return Err(StrategyError::InvalidConfig("ticker is empty".to_string()));
        }
        self.session
            .validate()
            .map_err(|e| StrategyError::InvalidConfig(e.to_string()))?;
        if self.inventory_threshold < 0 {
            return Err(StrategyError::InvalidConfig(format!(
                "inventory_threshold must be >= 0, got {}",
                self.inventory_threshold
            )));
        }

        match self.mode {
            StrategyMode::Ladder => {
                for (name, sizing) in [
                    ("long_heavy", &self.tiers.long_heavy),
                    ("short_heavy", &self.tiers.short_heavy),
                    ("neutral", &self.tiers.neutral),
                ] {
                    if sizing.spread <= Decimal::ZERO {
                        return Err(StrategyError::InvalidConfig(format!(
                            "{name} spread must be positive"
                        )));
                    }
                }
                if self.ladder_depth > 1 && self.spread_increment <= Decimal::ZERO {
                    return Err(StrategyError::InvalidConfig(
                        "spread_increment must be positive for multi-level ladders".to_string(),
                    ));
                }
                if self.waves_per_level == 0 {
                    return Err(StrategyError::InvalidConfig(
                        "waves_per_level must be at least 1".to_string(),
                    ));
                }
            }
            StrategyMode::ScalpOnly => {
                if !self.scalp.enabled {
                    return Err(StrategyError::InvalidConfig(
                        "scalp_only mode requires scalp.enabled".to_string(),
                    ));
                }
            }
            StrategyMode::PairGuard => {
                if self.guard.spread <= Decimal::ZERO || self.guard.quantity.is_zero() {
                    return Err(StrategyError::InvalidConfig(
                        "pair_guard mode requires a positive guard spread and quantity"
                            .to_string(),
                    ));
                }
            }
        }

        if self.scalp.enabled {
            if self.scalp.threshold < Decimal::ZERO {
                return Err(StrategyError::InvalidConfig(
                    "scalp.threshold must be >= 0".to_string(),
                ));
            }
            if self.scalp.repetitions == 0 {
                return Err(StrategyError::InvalidConfig(
                    "scalp.repetitions must be at least 1".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Named strategy variants.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Single pair at close +/- 0.02, cancel unpaired books.
    Baseline,
    /// Scalp a wide market only, inclusive 15 000 threshold.
    Scalper,
    /// Three-level ladder, four waves per level, 200 cycles per iteration.
    #[default]
    Ladder,
    /// Five-level ladder with growing neutral sizes and a scalp pre-check.
    DeepLadder,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::Baseline,
        Preset::Scalper,
        Preset::Ladder,
        Preset::DeepLadder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Baseline => "baseline",
            Self::Scalper => "scalper",
            Self::Ladder => "ladder",
            Self::DeepLadder => "deep_ladder",
        }
    }

    /// Build the preset's configuration.
    pub fn config(&self) -> StrategyConfig {
        let cent = Decimal::new(1, 2);
        let base = StrategyConfig {
            ticker: default_ticker(),
            session: default_session(),
            mode: StrategyMode::Ladder,
            inventory_threshold: default_inventory_threshold(),
            boundary: BoundaryRule::Exclusive,
            tiers: TierTable::default(),
            neutral_level_quantities: Vec::new(),
            spread_increment: default_spread_increment(),
            ladder_depth: default_ladder_depth(),
            waves_per_level: default_waves_per_level(),
            wave_delay_ms: default_wave_delay_ms(),
            level_delay_ms: 0,
            cycles_per_iteration: default_cycles_per_iteration(),
            require_empty_book: true,
            idle_delay_ms: default_idle_delay_ms(),
            data_error_policy: DataErrorPolicy::default(),
            scalp: ScalpConfig::default(),
            guard: GuardConfig::default(),
            wait_for_open: false,
        };

        match self {
            Self::Baseline => StrategyConfig {
                session: SessionWindow { open: 5, close: 295 },
                mode: StrategyMode::PairGuard,
                tiers: TierTable {
                    long_heavy: TierSizing::new(Decimal::new(2, 2), 1000, 1000),
                    short_heavy: TierSizing::new(Decimal::new(2, 2), 1000, 1000),
                    neutral: TierSizing::new(Decimal::new(2, 2), 1000, 1000),
                },
                ladder_depth: 1,
                waves_per_level: 1,
                cycles_per_iteration: 1,
                require_empty_book: false,
                idle_delay_ms: 0,
                ..base
            },
            Self::Scalper => StrategyConfig {
                session: SessionWindow { open: 2, close: 298 },
                mode: StrategyMode::ScalpOnly,
                inventory_threshold: 15_000,
                boundary: BoundaryRule::Inclusive,
                ladder_depth: 1,
                waves_per_level: 1,
                cycles_per_iteration: 1,
                require_empty_book: false,
                idle_delay_ms: 0,
                scalp: ScalpConfig {
                    enabled: true,
                    repetitions: 3,
                    skew_by_tier: true,
                    pause_ms: 2000,
                    ..ScalpConfig::default()
                },
                ..base
            },
            Self::Ladder => base,
            Self::DeepLadder => StrategyConfig {
                tiers: TierTable {
                    neutral: TierSizing::new(cent, 350, 350),
                    ..TierTable::default()
                },
                neutral_level_quantities: [350, 500, 750, 1000, 1250]
                    .into_iter()
                    .map(Quantity::new)
                    .collect(),
                ladder_depth: 5,
                wave_delay_ms: 500,
                cycles_per_iteration: 1,
                scalp: ScalpConfig {
                    enabled: true,
                    repetitions: 2,
                    skew_by_tier: false,
                    pause_ms: 0,
                    ..ScalpConfig::default()
                },
                ..base
            },
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Preset::ALL
            .into_iter()
            .find(|p| p.as_str() == normalized)
            .ok_or_else(|| StrategyError::InvalidConfig(format!("unknown preset: {s}")))
    }
}

fn default_true() -> bool {
    true
}
fn default_ticker() -> String {
    "ALGO".to_string()
}
fn default_session() -> SessionWindow {
    SessionWindow { open: 1, close: 297 }
}
fn default_inventory_threshold() -> i64 {
    10_000
}
fn default_spread_increment() -> Decimal {
    Decimal::new(1, 2) // 0.01
}
fn default_ladder_depth() -> u32 {
    3
}
fn default_waves_per_level() -> u32 {
    4
}
fn default_wave_delay_ms() -> u64 {
    100
}
fn default_cycles_per_iteration() -> u32 {
    200
}
fn default_idle_delay_ms() -> u64 {
    100
}
fn default_scalp_threshold() -> Decimal {
    Decimal::new(3, 2) // 0.03
}
fn default_scalp_repetitions() -> u32 {
    3
}
fn default_scalp_quantity() -> Quantity {
    Quantity::new(5000)
}
fn default_price_improvement() -> Decimal {
    Decimal::new(1, 2) // 0.01
}
fn default_scalp_pause_ms() -> u64 {
    2000
}
fn default_guard_spread() -> Decimal {
    Decimal::new(2, 2) // 0.02
}
fn default_guard_quantity() -> Quantity {
    Quantity::new(1000)
}
fn default_settle_delay_ms() -> u64 {
    1000
}
