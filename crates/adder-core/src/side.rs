//! Order book side.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Side of the book a quote rests on.
///
/// Serialized using the exchange wire convention: `"B"` for bid, `"A"` for ask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "B")]
    Bid,
    #[serde(rename = "A")]
    Ask,
}

/// Both sides, in the order the exchange lists book levels (bids first).
pub const SIDES: [Side; 2] = [Side::Bid, Side::Ask];

impl Side {
    /// Returns the opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            Self::Bid => Self::Ask,
            Self::Ask => Self::Bid,
        }
    }

    /// Returns 1 for bid, -1 for ask (position-delta sense: a bid fill
    /// increases the signed position).
    pub fn sign(&self) -> i8 {
        match self {
            Self::Bid => 1,
            Self::Ask => -1,
        }
    }

    /// Whether an order on this side is a buy.
    pub fn is_buy(&self) -> bool {
        matches!(self, Self::Bid)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bid => write!(f, "bid"),
            Self::Ask => write!(f, "ask"),
        }
    }
}
