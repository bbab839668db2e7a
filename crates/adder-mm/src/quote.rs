//! Quote price calculation.
//!
//! Strategies map current market state and position to a target
//! (price, size) per side. They are pure: no side effects, no failures;
//! degenerate inputs produce a "do not quote" signal rather than a
//! zero or negative order.

use adder_core::{BookSnapshot, Price, Side, Size};
use rust_decimal::{Decimal, MathematicalOps};

/// A target quote for one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub price: Price,
    pub size: Size,
}

/// A pluggable quoting strategy.
///
/// `ideal_price` is already rounded to the exchange's quote precision.
/// `target_distance` is the strategy's distance unit, used both for the
/// deviation tolerance and for gap detection.
pub trait QuoteStrategy: Send + Sync {
    /// Target price for the side, or None when the book is unusable.
    fn ideal_price(&self, side: Side, book: &BookSnapshot, position: Decimal) -> Option<Price>;

    /// Order size for the side at the given signed position. May be zero or
    /// negative; the notional check in [`QuoteStrategy::quote`] suppresses
    /// such quotes.
    fn size(&self, side: Side, position: Decimal) -> Size;

    /// Distance unit for deviation and gap checks.
    fn target_distance(&self, side: Side, book: &BookSnapshot) -> Option<Decimal>;

    /// Minimum notional below which quoting is suppressed.
    fn min_notional(&self) -> Decimal;

    /// Target quote for the side; None signals "do not quote".
    fn quote(&self, side: Side, book: &BookSnapshot, position: Decimal) -> Option<Quote> {
        let price = self.ideal_price(side, book, position)?;
        self.quote_at(price, side, position)
    }

    /// Same sizing applied at an overridden price (gap straddle).
    fn quote_at(&self, price: Price, side: Side, position: Decimal) -> Option<Quote> {
        let size = self.size(side, position);
        if size.inner() * price.inner() < self.min_notional() {
            return None;
        }
        Some(Quote { price, size })
    }
}

/// Fixed fractional offset from the best price on each side.
///
/// Sizes toward the position limit: the side that would reduce exposure
/// quotes larger, the side that would add to it quotes smaller.
#[derive(Debug, Clone)]
pub struct DepthBased {
    depth_fraction: Decimal,
    max_position: Decimal,
    min_notional: Decimal,
}

impl DepthBased {
    pub fn new(depth_fraction: Decimal, max_position: Decimal, min_notional: Decimal) -> Self {
        Self {
            depth_fraction,
            max_position,
            min_notional,
        }
    }
}

impl QuoteStrategy for DepthBased {
    fn ideal_price(&self, side: Side, book: &BookSnapshot, _position: Decimal) -> Option<Price> {
        let book_price = book.book_price(side)?.inner();
        let distance = book_price * self.depth_fraction;
        let ideal = match side {
            Side::Bid => book_price - distance,
            Side::Ask => book_price + distance,
        };
        Some(Price::new(ideal).round_to_quote_precision())
    }

    fn size(&self, side: Side, position: Decimal) -> Size {
        Size::new(self.max_position - Decimal::from(side.sign()) * position)
    }

    fn target_distance(&self, side: Side, book: &BookSnapshot) -> Option<Decimal> {
        Some(book.book_price(side)?.inner() * self.depth_fraction)
    }

    fn min_notional(&self) -> Decimal {
        self.min_notional
    }
}

/// Avellaneda-Stoikov inspired quoting.
///
/// From mid price, spread `s`, inventory `q`, volatility, horizon,
/// risk aversion and liquidity, derives a symmetric half-spread, an
/// inventory skew and an arrival-intensity term:
///
/// ```text
/// m'     = gamma * s / 2
/// delta  = gamma * vol^2 * dt
/// lambda = k * e^(-r * dt)
/// bid    = mid - m' - q * delta / 2 - lambda
/// ask    = mid + m' + q * delta / 2 + lambda
/// ```
///
/// Sizes scale linearly with `1 +/- q * delta / lambda` around half the
/// maximum, clamped to `[0, max_size]` since the raw formula goes negative
/// or oversized for large inventory.
#[derive(Debug, Clone)]
pub struct StochasticControl {
    gamma: Decimal,
    k: Decimal,
    r: Decimal,
    vol: Decimal,
    dt: Decimal,
    max_size: Decimal,
    min_notional: Decimal,
}

impl StochasticControl {
    pub fn new(
        gamma: Decimal,
        k: Decimal,
        r: Decimal,
        vol: Decimal,
        dt: Decimal,
        max_size: Decimal,
        min_notional: Decimal,
    ) -> Self {
        Self {
            gamma,
            k,
            r,
            vol,
            dt,
            max_size,
            min_notional,
        }
    }

    fn inventory_skew(&self) -> Decimal {
        self.gamma * self.vol * self.vol * self.dt
    }

    fn arrival_intensity(&self) -> Decimal {
        self.k * (-self.r * self.dt).exp()
    }
}

impl QuoteStrategy for StochasticControl {
    fn ideal_price(&self, side: Side, book: &BookSnapshot, position: Decimal) -> Option<Price> {
        let mid = book.mid()?.inner();
        let spread = book.spread()?.inner();

        let half_spread = self.gamma * spread / Decimal::TWO;
        let inventory_term = position * self.inventory_skew() / Decimal::TWO;
        let lambda = self.arrival_intensity();

        let ideal = match side {
            Side::Bid => mid - half_spread - inventory_term - lambda,
            Side::Ask => mid + half_spread + inventory_term + lambda,
        };
        Some(Price::new(ideal).round_to_quote_precision())
    }

    fn size(&self, side: Side, position: Decimal) -> Size {
        let lambda = self.arrival_intensity();
        if lambda.is_zero() {
            return Size::ZERO;
        }
        let factor = match side {
            Side::Bid => Decimal::ONE + position * self.inventory_skew() / lambda,
            Side::Ask => Decimal::ONE - position * self.inventory_skew() / lambda,
        };
        let raw = self.max_size / Decimal::TWO * factor;
        Size::new(raw.max(Decimal::ZERO).min(self.max_size))
    }

    fn target_distance(&self, _side: Side, book: &BookSnapshot) -> Option<Decimal> {
        Some(book.spread()?.inner())
    }

    fn min_notional(&self) -> Decimal {
        self.min_notional
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adder_core::BookLevel;
    use rust_decimal_macros::dec;

    fn book(bid: Decimal, ask: Decimal) -> BookSnapshot {
        BookSnapshot {
            coin: "ARB".to_string(),
            bids: vec![BookLevel {
                price: Price::new(bid),
                size: Size::new(dec!(5)),
            }],
            asks: vec![BookLevel {
                price: Price::new(ask),
                size: Size::new(dec!(5)),
            }],
            time_ms: 0,
        }
    }

    fn depth_strategy() -> DepthBased {
        DepthBased::new(dec!(0.001), dec!(20), dec!(10))
    }

    #[test]
    fn test_depth_based_ideal_prices() {
        let strategy = depth_strategy();
        let book = book(dec!(1000), dec!(1001));

        // bid: 1000 - 1000 * 0.001 = 999; ask: 1001 + 1.001 = 1002.001 -> 1002.0
        let bid = strategy.ideal_price(Side::Bid, &book, dec!(0)).unwrap();
        let ask = strategy.ideal_price(Side::Ask, &book, dec!(0)).unwrap();
        assert_eq!(bid.inner(), dec!(999));
        assert_eq!(ask.inner(), dec!(1002.0));
    }

    #[test]
    fn test_depth_based_target_distance_per_side() {
        let strategy = depth_strategy();
        let book = book(dec!(1000), dec!(1001));
        assert_eq!(
            strategy.target_distance(Side::Bid, &book).unwrap(),
            dec!(1.000)
        );
        assert_eq!(
            strategy.target_distance(Side::Ask, &book).unwrap(),
            dec!(1.001)
        );
    }

    #[test]
    fn test_depth_based_sizes_toward_limit() {
        let strategy = depth_strategy();
        // Long 5: bid capacity shrinks, ask capacity grows.
        assert_eq!(strategy.size(Side::Bid, dec!(5)).inner(), dec!(15));
        assert_eq!(strategy.size(Side::Ask, dec!(5)).inner(), dec!(25));
        // Short 5: mirrored.
        assert_eq!(strategy.size(Side::Bid, dec!(-5)).inner(), dec!(25));
        assert_eq!(strategy.size(Side::Ask, dec!(-5)).inner(), dec!(15));
    }

    #[test]
    fn test_depth_based_suppresses_below_min_notional() {
        let strategy = depth_strategy();
        let book = book(dec!(1000), dec!(1001));

        // At the position limit the bid size is zero: no quote.
        assert!(strategy.quote(Side::Bid, &book, dec!(20)).is_none());
        // Past the limit the size goes negative: still no quote.
        assert!(strategy.quote(Side::Bid, &book, dec!(25)).is_none());
        // Well within the limit: quote present.
        let quote = strategy.quote(Side::Bid, &book, dec!(0)).unwrap();
        assert_eq!(quote.price.inner(), dec!(999));
        assert_eq!(quote.size.inner(), dec!(20));
    }

    #[test]
    fn test_depth_based_empty_book_side() {
        let strategy = depth_strategy();
        let empty = BookSnapshot {
            coin: "ARB".to_string(),
            bids: vec![],
            asks: vec![BookLevel {
                price: Price::new(dec!(1001)),
                size: Size::new(dec!(1)),
            }],
            time_ms: 0,
        };
        assert!(strategy.ideal_price(Side::Bid, &empty, dec!(0)).is_none());
        assert!(strategy.target_distance(Side::Bid, &empty).is_none());
    }

    fn stochastic_strategy() -> StochasticControl {
        // r = 0 keeps lambda = k exactly, making expectations easy to derive.
        StochasticControl::new(
            dec!(0.005),
            dec!(0.1),
            dec!(0),
            dec!(2),
            dec!(0.5),
            dec!(10),
            dec!(10),
        )
    }

    #[test]
    fn test_stochastic_prices() {
        let strategy = stochastic_strategy();
        let book = book(dec!(99), dec!(101)); // mid 100, spread 2

        // half = 0.005 * 2 / 2 = 0.005
        // delta = 0.005 * 4 * 0.5 = 0.01
        // lambda = 0.1
        // q = 1: bid = 100 - 0.005 - 0.005 - 0.1 = 99.89
        //        ask = 100 + 0.005 + 0.005 + 0.1 = 100.11
        let bid = strategy.ideal_price(Side::Bid, &book, dec!(1)).unwrap();
        let ask = strategy.ideal_price(Side::Ask, &book, dec!(1)).unwrap();
        assert_eq!(bid.inner(), dec!(99.89));
        assert_eq!(ask.inner(), dec!(100.11));
    }

    #[test]
    fn test_stochastic_sizes_scale_with_inventory() {
        let strategy = stochastic_strategy();

        // q = 1: factor bid = 1 + 0.01/0.1 = 1.1, ask = 0.9
        let bid = strategy.size(Side::Bid, dec!(1)).inner();
        let ask = strategy.size(Side::Ask, dec!(1)).inner();
        assert!((bid - dec!(5.5)).abs() < dec!(0.0001), "bid size {bid}");
        assert!((ask - dec!(4.5)).abs() < dec!(0.0001), "ask size {ask}");
    }

    #[test]
    fn test_stochastic_sizes_clamped() {
        let strategy = stochastic_strategy();

        // q = -20: bid factor = 1 - 2 = -1 -> clamped to zero.
        assert_eq!(strategy.size(Side::Bid, dec!(-20)), Size::ZERO);
        // q = 20: bid factor = 3 -> 15 clamped to max_size 10.
        assert_eq!(strategy.size(Side::Bid, dec!(20)).inner(), dec!(10));
    }

    #[test]
    fn test_stochastic_zero_liquidity_never_quotes() {
        let strategy = StochasticControl::new(
            dec!(0.005),
            dec!(0),
            dec!(0),
            dec!(2),
            dec!(0.5),
            dec!(10),
            dec!(10),
        );
        let book = book(dec!(99), dec!(101));
        assert_eq!(strategy.size(Side::Bid, dec!(1)), Size::ZERO);
        assert!(strategy.quote(Side::Bid, &book, dec!(1)).is_none());
    }

    #[test]
    fn test_stochastic_target_distance_is_spread() {
        let strategy = stochastic_strategy();
        let book = book(dec!(99), dec!(101));
        assert_eq!(strategy.target_distance(Side::Bid, &book).unwrap(), dec!(2));
    }

    #[test]
    fn test_prices_rounded_to_quote_precision() {
        let strategy = depth_strategy();
        let book = book(dec!(4321.9), dec!(4322.1));
        // bid ideal: 4321.9 * 0.999 = 4317.5781 -> 5 sig figs -> 4317.6
        let bid = strategy.ideal_price(Side::Bid, &book, dec!(0)).unwrap();
        assert_eq!(bid.inner(), dec!(4317.6));
    }
}
