//! Exact numeric types for quoting.
//!
//! Prices use `rust_decimal` so that a hundredth-of-a-unit spread
//! increment never drifts through floating-point rounding.
//! Quantities and positions are whole lots on this exchange.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Exchange price granularity (two decimal places).
pub const PRICE_DP: u32 = 2;

/// Price with exact decimal precision.
///
/// Wraps `Decimal` to provide type safety and prevent mixing
/// prices with quantities in calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(pub Decimal);

impl Price {
    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Round to the exchange's two-decimal granularity (banker's rounding
    /// is avoided; midpoints round away from zero).
    #[inline]
    pub fn to_cents(&self) -> Self {
        Self(self.0.round_dp_with_strategy(
            PRICE_DP,
            rust_decimal::RoundingStrategy::MidpointAwayFromZero,
        ))
    }

    /// Price shifted down by `offset`.
    #[inline]
    pub fn below(&self, offset: Decimal) -> Self {
        Self(self.0 - offset)
    }

    /// Price shifted up by `offset`.
    #[inline]
    pub fn above(&self, offset: Decimal) -> Self {
        Self(self.0 + offset)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Price {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<Decimal> for Price {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}

/// Order quantity in whole lots.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Quantity(pub u64);

impl Quantity {
    pub const ZERO: Self = Self(0);

    #[inline]
    pub fn new(lots: u64) -> Self {
        Self(lots)
    }

    #[inline]
    pub fn lots(&self) -> u64 {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Quantity {
    fn from(lots: u64) -> Self {
        Self(lots)
    }
}

/// Signed net holding in the traded instrument.
///
/// Positive = long, negative = short.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Position(pub i64);

impl Position {
    pub const FLAT: Self = Self(0);

    #[inline]
    pub fn new(lots: i64) -> Self {
        Self(lots)
    }

    #[inline]
    pub fn lots(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Position {
    fn from(lots: i64) -> Self {
        Self(lots)
    }
}
