//! Per-side order lifecycle state and the shared position estimate.

use crate::decimal::Price;
use rust_decimal::Decimal;
use std::fmt;

/// Belief about the single resting order on one side of the book.
///
/// At most one non-`Cancelled` variant exists per side at any instant, and a
/// new order lifecycle starts only from `Cancelled`. The machine never mutates
/// a resting order in place; every change is cancel-then-place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProvideState {
    /// No order believed resting.
    #[default]
    Cancelled,
    /// An order request was sent; no acknowledgement received yet.
    PendingNew {
        /// Submission time (Unix milliseconds).
        submitted_at_ms: u64,
    },
    /// An order is believed live at `price`.
    Resting { price: Price, oid: u64 },
    /// A resting order placed to straddle a detected liquidity gap.
    /// Behaves as `Resting` but with a wider replacement tolerance.
    GapResting { price: Price, oid: u64 },
}

impl ProvideState {
    /// Whether no order is believed live or in flight.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Whether an order request is in flight without acknowledgement.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::PendingNew { .. })
    }

    /// The exchange order id, if an order is believed resting.
    pub fn resting_oid(&self) -> Option<u64> {
        match self {
            Self::Resting { oid, .. } | Self::GapResting { oid, .. } => Some(*oid),
            _ => None,
        }
    }

    /// The resting price, if an order is believed resting.
    pub fn resting_price(&self) -> Option<Price> {
        match self {
            Self::Resting { price, .. } | Self::GapResting { price, .. } => Some(*price),
            _ => None,
        }
    }
}

impl fmt::Display for ProvideState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => write!(f, "cancelled"),
            Self::PendingNew { submitted_at_ms } => {
                write!(f, "pending_new(t={submitted_at_ms})")
            }
            Self::Resting { price, oid } => write!(f, "resting(px={price} oid={oid})"),
            Self::GapResting { price, oid } => write!(f, "gap_resting(px={price} oid={oid})"),
        }
    }
}

/// Latest known signed position for the traded instrument.
///
/// Starts `Unknown`. Any fill notification sets it back to `Unknown`; only
/// the reconciliation loop promotes it to `Known`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositionEstimate {
    #[default]
    Unknown,
    Known(Decimal),
}

impl PositionEstimate {
    /// The signed quantity, if known.
    pub fn known(&self) -> Option<Decimal> {
        match self {
            Self::Known(q) => Some(*q),
            Self::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl fmt::Display for PositionEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Known(q) => write!(f, "{q}"),
        }
    }
}
