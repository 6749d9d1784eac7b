//! Quote ladder construction.
//!
//! Level `i` (0-based) sits at `spread + i * increment` on both sides of
//! the reference price. Pure arithmetic; built fresh every iteration.

use rit_core::{OrderRequest, Price, Quantity};
use rust_decimal::Decimal;

use crate::tier::TierParameters;

/// One rung of the ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LadderLevel {
    /// 0-based level index.
    pub index: u32,
    /// Distance from the reference price, always positive.
    pub offset: Decimal,
    pub buy_quantity: Quantity,
    pub sell_quantity: Quantity,
}

impl LadderLevel {
    /// Level `index` for the given tier parameters.
    pub fn at(params: &TierParameters, index: u32, increment: Decimal) -> Self {
        Self {
            index,
            offset: params.spread + increment * Decimal::from(index),
            buy_quantity: params.buy_quantity,
            sell_quantity: params.sell_quantity,
        }
    }
}

/// Number of levels a configured depth produces. Depth 0 is one flat quote.
#[inline]
pub fn effective_depth(depth: u32) -> u32 {
    depth.max(1)
}

/// Build every level with fixed quantities.
///
/// The submission cycle re-samples inventory per level and uses
/// `LadderLevel::at` directly; this is the non-resampled view.
pub fn build_ladder(params: &TierParameters, depth: u32, increment: Decimal) -> Vec<LadderLevel> {
    (0..effective_depth(depth))
        .map(|i| LadderLevel::at(params, i, increment))
        .collect()
}

/// A buy/sell pair around a reference price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub buy: OrderRequest,
    pub sell: OrderRequest,
}

impl Quote {
    /// Buy at `reference - offset`, sell at `reference + offset`.
    pub fn from_level(ticker: &str, reference: Price, level: &LadderLevel) -> Self {
        Self::symmetric(
            ticker,
            reference,
            level.offset,
            level.buy_quantity,
            level.sell_quantity,
        )
    }

    pub fn symmetric(
        ticker: &str,
        reference: Price,
        offset: Decimal,
        buy_quantity: Quantity,
        sell_quantity: Quantity,
    ) -> Self {
        Self {
            buy: OrderRequest::buy(ticker, buy_quantity, reference.below(offset)),
            sell: OrderRequest::sell(ticker, sell_quantity, reference.above(offset)),
        }
    }

    /// Both legs, buy first.
    pub fn into_orders(self) -> [OrderRequest; 2] {
        [self.buy, self.sell]
    }
}
