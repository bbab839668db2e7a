//! Order book snapshots and execution records.

use crate::decimal::{Price, Size};
use crate::side::Side;
use serde::{Deserialize, Serialize};

/// A single price level on one side of the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookLevel {
    pub price: Price,
    pub size: Size,
}

/// Top-of-book snapshot for the traded instrument.
///
/// Levels are ordered best-to-worst on each side. Transient; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookSnapshot {
    /// Instrument the snapshot belongs to.
    pub coin: String,
    /// Bid levels, best (highest) first.
    pub bids: Vec<BookLevel>,
    /// Ask levels, best (lowest) first.
    pub asks: Vec<BookLevel>,
    /// Exchange timestamp (Unix milliseconds).
    pub time_ms: u64,
}

impl BookSnapshot {
    /// Best bid price, if the bid side is non-empty.
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.first().map(|l| l.price)
    }

    /// Best ask price, if the ask side is non-empty.
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.first().map(|l| l.price)
    }

    /// Best price on the given side.
    pub fn book_price(&self, side: Side) -> Option<Price> {
        match side {
            Side::Bid => self.best_bid(),
            Side::Ask => self.best_ask(),
        }
    }

    /// Spread: best ask minus best bid.
    pub fn spread(&self) -> Option<Price> {
        Some(self.best_ask()? - self.best_bid()?)
    }

    /// Mid price: (best bid + best ask) / 2.
    pub fn mid(&self) -> Option<Price> {
        let bid = self.best_bid()?;
        let ask = self.best_ask()?;
        Some(Price::new(
            (bid.inner() + ask.inner()) / rust_decimal::Decimal::TWO,
        ))
    }

    /// Whether the snapshot is usable for quoting: both sides present,
    /// positive prices, not crossed.
    pub fn is_valid(&self) -> bool {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => bid.is_positive() && ask.is_positive() && bid < ask,
            _ => false,
        }
    }
}

/// A single execution reported by the user-event stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    pub coin: String,
    pub side: Side,
    #[serde(rename = "px")]
    pub price: Price,
    #[serde(rename = "sz")]
    pub size: Size,
    pub oid: u64,
    #[serde(rename = "time")]
    pub time_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn level(px: rust_decimal::Decimal, sz: rust_decimal::Decimal) -> BookLevel {
        BookLevel {
            price: Price::new(px),
            size: Size::new(sz),
        }
    }

    fn sample_book() -> BookSnapshot {
        BookSnapshot {
            coin: "ARB".to_string(),
            bids: vec![level(dec!(1000), dec!(5)), level(dec!(999.5), dec!(10))],
            asks: vec![level(dec!(1001), dec!(4)), level(dec!(1001.5), dec!(8))],
            time_ms: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_best_prices() {
        let book = sample_book();
        assert_eq!(book.best_bid(), Some(Price::new(dec!(1000))));
        assert_eq!(book.best_ask(), Some(Price::new(dec!(1001))));
        assert_eq!(book.book_price(Side::Bid), Some(Price::new(dec!(1000))));
        assert_eq!(book.book_price(Side::Ask), Some(Price::new(dec!(1001))));
    }

    #[test]
    fn test_spread_and_mid() {
        let book = sample_book();
        assert_eq!(book.spread(), Some(Price::new(dec!(1))));
        assert_eq!(book.mid(), Some(Price::new(dec!(1000.5))));
    }

    #[test]
    fn test_validity() {
        assert!(sample_book().is_valid());

        let empty_side = BookSnapshot {
            coin: "ARB".to_string(),
            bids: vec![],
            asks: vec![level(dec!(1001), dec!(4))],
            time_ms: 0,
        };
        assert!(!empty_side.is_valid());

        let crossed = BookSnapshot {
            coin: "ARB".to_string(),
            bids: vec![level(dec!(1002), dec!(1))],
            asks: vec![level(dec!(1001), dec!(1))],
            time_ms: 0,
        };
        assert!(!crossed.is_valid());
    }

    #[test]
    fn test_fill_wire_shape() {
        let json = r#"{"coin":"ARB","side":"B","px":"999.5","sz":"2","oid":77,"time":1700000000000}"#;
        let fill: Fill = serde_json::from_str(json).unwrap();
        assert_eq!(fill.side, Side::Bid);
        assert_eq!(fill.price, Price::new(dec!(999.5)));
        assert_eq!(fill.size, Size::new(dec!(2)));
        assert_eq!(fill.oid, 77);
    }
}
