//! Market data types.
//!
//! Contains the session tick and the top of the order book.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Price;

/// The exchange's discrete simulation time unit.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Tick(pub u32);

impl Tick {
    #[inline]
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    #[inline]
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Tick {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Best bid and best ask of the instrument's order book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopOfBook {
    /// Best bid price.
    pub bid: Price,
    /// Best ask price.
    pub ask: Price,
}

impl TopOfBook {
    pub fn new(bid: Price, ask: Price) -> Self {
        Self { bid, ask }
    }

    /// Quoted spread: ask - bid.
    pub fn spread(&self) -> Decimal {
        self.ask.inner() - self.bid.inner()
    }

    /// Whether the spread is strictly wider than `threshold`.
    pub fn is_wider_than(&self, threshold: Decimal) -> bool {
        self.spread() > threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_spread() {
        let book = TopOfBook::new(Price::new(dec!(99.00)), Price::new(dec!(99.05)));
        assert_eq!(book.spread(), dec!(0.05));
    }

    #[test]
    fn test_wider_than_is_strict() {
        let book = TopOfBook::new(Price::new(dec!(25.00)), Price::new(dec!(25.03)));
        assert!(!book.is_wider_than(dec!(0.03)));
        assert!(book.is_wider_than(dec!(0.02)));
    }

    #[test]
    fn test_locked_book_is_not_wide() {
        let book = TopOfBook::new(Price::new(dec!(25.05)), Price::new(dec!(25.05)));
        assert!(book.spread().is_zero());
        assert!(!book.is_wider_than(dec!(0.00)));
    }
}
