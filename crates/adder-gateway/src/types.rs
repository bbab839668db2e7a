//! Request and outcome types for the order gateway.

use adder_core::{Price, Side, Size};
use serde::{Deserialize, Serialize};

/// A new limit order to submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub coin: String,
    pub side: Side,
    pub price: Price,
    pub size: Size,
    /// Add-liquidity-only time-in-force: the order is rejected instead of
    /// matching immediately.
    pub post_only: bool,
}

impl OrderRequest {
    pub fn new(coin: impl Into<String>, side: Side, price: Price, size: Size) -> Self {
        Self {
            coin: coin.into(),
            side,
            price,
            size,
            post_only: true,
        }
    }
}

/// Outcome of a placement request that reached the exchange.
///
/// Anything other than a clear "resting" acknowledgement is `Ambiguous`:
/// the caller cannot know whether an order was created and must treat its
/// own state as suspect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceOutcome {
    /// Order acknowledged resting on the book at `oid`.
    Resting { oid: u64 },
    /// Acknowledgement was neither a clear "resting" nor a clear failure.
    Ambiguous { status: String },
}

/// Outcome of a cancel request that reached the exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelOutcome {
    /// Cancel acknowledged.
    Cancelled,
    /// Exchange refused the cancel (e.g. order already gone).
    Failed { reason: String },
}

impl CancelOutcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// An open order as reported by the exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenOrder {
    pub oid: u64,
    pub coin: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_order_request_defaults_post_only() {
        let req = OrderRequest::new("ARB", Side::Bid, Price::new(dec!(999)), Size::new(dec!(2)));
        assert!(req.post_only);
        assert_eq!(req.coin, "ARB");
    }

    #[test]
    fn test_cancel_outcome_predicate() {
        assert!(CancelOutcome::Cancelled.is_cancelled());
        assert!(!CancelOutcome::Failed {
            reason: "unknown oid".to_string()
        }
        .is_cancelled());
    }
}
