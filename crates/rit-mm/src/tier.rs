//! Inventory tier selection.
//!
//! Maps the current net position onto one of three tiers and looks up the
//! spread and per-side sizes for that tier. Evaluated fresh on every
//! position read; nothing is cached between ladder levels.

use rit_core::{Position, Quantity};
use rust_decimal::Decimal;
use std::fmt;

use crate::config::{BoundaryRule, StrategyConfig, TierSizing, TierTable};

/// Inventory regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Position above the threshold: buy less, sell more.
    LongHeavy,
    /// Position below the negated threshold: buy more, sell less.
    ShortHeavy,
    Neutral,
}

impl Tier {
    /// Metric label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::LongHeavy => "long_heavy",
            Self::ShortHeavy => "short_heavy",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Quoting parameters for one tier at one ladder level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierParameters {
    pub tier: Tier,
    /// Base half-spread.
    pub spread: Decimal,
    pub buy_quantity: Quantity,
    pub sell_quantity: Quantity,
}

impl TierParameters {
    fn from_sizing(tier: Tier, sizing: &TierSizing) -> Self {
        Self {
            tier,
            spread: sizing.spread,
            buy_quantity: sizing.buy_quantity,
            sell_quantity: sizing.sell_quantity,
        }
    }
}

/// Position → tier mapping.
#[derive(Debug, Clone)]
pub struct TierSelector {
    threshold: i64,
    boundary: BoundaryRule,
    table: TierTable,
    neutral_levels: Vec<Quantity>,
}

impl TierSelector {
    pub fn new(threshold: i64, boundary: BoundaryRule, table: TierTable) -> Self {
        Self {
            threshold,
            boundary,
            table,
            neutral_levels: Vec::new(),
        }
    }

    /// Per-level neutral sizes; level `i` uses `levels[i]` for both sides.
    pub fn with_neutral_levels(mut self, levels: Vec<Quantity>) -> Self {
        self.neutral_levels = levels;
        self
    }

    pub fn from_config(config: &StrategyConfig) -> Self {
        Self::new(config.inventory_threshold, config.boundary, config.tiers)
            .with_neutral_levels(config.neutral_level_quantities.clone())
    }

    pub fn threshold(&self) -> i64 {
        self.threshold
    }

    /// Classify a position. Exactly one tier matches any position.
    pub fn classify(&self, position: Position) -> Tier {
        let p = position.lots();
        let t = self.threshold;
        let (long, short) = match self.boundary {
            BoundaryRule::Exclusive => (p > t, p < -t),
            BoundaryRule::Inclusive => (p >= t, p <= -t),
        };
        if long {
            Tier::LongHeavy
        } else if short {
            Tier::ShortHeavy
        } else {
            Tier::Neutral
        }
    }

    /// Parameters for the first ladder level.
    pub fn select(&self, position: Position) -> TierParameters {
        self.select_for_level(position, 0)
    }

    /// Parameters for ladder level `level` (0-based).
    pub fn select_for_level(&self, position: Position, level: u32) -> TierParameters {
        let tier = self.classify(position);
        match tier {
            Tier::LongHeavy => TierParameters::from_sizing(tier, &self.table.long_heavy),
            Tier::ShortHeavy => TierParameters::from_sizing(tier, &self.table.short_heavy),
            Tier::Neutral => {
                let mut params = TierParameters::from_sizing(tier, &self.table.neutral);
                if let Some(&qty) = self.neutral_levels.get(level as usize) {
                    params.buy_quantity = qty;
                    params.sell_quantity = qty;
                }
                params
            }
        }
    }
}
