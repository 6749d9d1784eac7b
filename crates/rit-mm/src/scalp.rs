//! Wide-spread scalp path.
//!
//! When the inside market is wider than the trigger, step inside it on
//! both sides for a fixed number of repetitions.

use rit_core::{OrderRequest, Quantity, TopOfBook};

use crate::config::ScalpConfig;
use crate::tier::Tier;

/// Orders to send for one trigger, or `None` if the book is not wide enough.
///
/// Repetitions are interleaved buy/sell. Zero-quantity legs are skipped.
pub fn scalp_orders(
    ticker: &str,
    book: &TopOfBook,
    tier: Tier,
    config: &ScalpConfig,
) -> Option<Vec<OrderRequest>> {
    if !book.is_wider_than(config.threshold) {
        return None;
    }

    let (buy_quantity, sell_quantity) = scalp_quantities(tier, config);
    let buy_price = book.bid.above(config.price_improvement);
    let sell_price = book.ask.below(config.price_improvement);

    let mut orders = Vec::with_capacity(config.repetitions as usize * 2);
    for _ in 0..config.repetitions {
        if !buy_quantity.is_zero() {
            orders.push(OrderRequest::buy(ticker, buy_quantity, buy_price));
        }
        if !sell_quantity.is_zero() {
            orders.push(OrderRequest::sell(ticker, sell_quantity, sell_price));
        }
    }
    Some(orders)
}

/// Per-side scalp size; the heavy side is zeroed when skewing by tier.
pub fn scalp_quantities(tier: Tier, config: &ScalpConfig) -> (Quantity, Quantity) {
    let qty = config.quantity;
    if !config.skew_by_tier {
        return (qty, qty);
    }
    match tier {
        Tier::LongHeavy => (Quantity::ZERO, qty),
        Tier::ShortHeavy => (qty, Quantity::ZERO),
        Tier::Neutral => (qty, qty),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rit_core::{OrderSide, Price};
    use rust_decimal_macros::dec;

    fn book(bid: rust_decimal::Decimal, ask: rust_decimal::Decimal) -> TopOfBook {
        TopOfBook::new(Price::new(bid), Price::new(ask))
    }

    fn config(repetitions: u32, skew: bool) -> ScalpConfig {
        ScalpConfig {
            enabled: true,
            repetitions,
            skew_by_tier: skew,
            ..ScalpConfig::default()
        }
    }

    #[test]
    fn test_fires_on_wide_book() {
        let orders =
            scalp_orders("ALGO", &book(dec!(99.00), dec!(99.05)), Tier::Neutral, &config(3, true))
                .unwrap();
        assert_eq!(orders.len(), 6);
        assert_eq!(orders[0].side, OrderSide::Buy);
        assert_eq!(orders[0].price.inner(), dec!(99.01));
        assert_eq!(orders[1].side, OrderSide::Sell);
        assert_eq!(orders[1].price.inner(), dec!(99.04));
        assert!(orders.iter().all(|o| o.quantity == Quantity::new(5000)));
    }

    #[test]
    fn test_threshold_is_strict() {
        let cfg = config(3, true);
        let at = book(dec!(25.00), dec!(25.03));
        let above = book(dec!(25.00), dec!(25.04));
        assert!(scalp_orders("ALGO", &at, Tier::Neutral, &cfg).is_none());
        assert!(scalp_orders("ALGO", &above, Tier::Neutral, &cfg).is_some());
    }

    #[test]
    fn test_skew_drops_heavy_side() {
        let wide = book(dec!(99.00), dec!(99.10));
        let long = scalp_orders("ALGO", &wide, Tier::LongHeavy, &config(3, true)).unwrap();
        assert_eq!(long.len(), 3);
        assert!(long.iter().all(|o| o.side == OrderSide::Sell));

        let short = scalp_orders("ALGO", &wide, Tier::ShortHeavy, &config(3, true)).unwrap();
        assert!(short.iter().all(|o| o.side == OrderSide::Buy));

        let unskewed = scalp_orders("ALGO", &wide, Tier::LongHeavy, &config(2, false)).unwrap();
        assert_eq!(unskewed.len(), 4);
    }
}
