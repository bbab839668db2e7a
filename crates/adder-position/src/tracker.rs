//! Guarded cell holding the latest known signed position.

use adder_core::PositionEstimate;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use tracing::debug;

/// Latest known signed position for the traded instrument.
///
/// Starts `Unknown`. Any fill notification invalidates the estimate so no
/// new orders are placed on a stale position belief; only the reconciliation
/// loop promotes it back to `Known`.
#[derive(Debug, Default)]
pub struct PositionTracker {
    estimate: RwLock<PositionEstimate>,
}

impl PositionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current estimate.
    pub fn get(&self) -> PositionEstimate {
        *self.estimate.read()
    }

    /// The signed quantity, if known.
    pub fn known(&self) -> Option<Decimal> {
        self.get().known()
    }

    /// Invalidate the estimate. Called on every fill notification and on any
    /// trust-breaking gateway outcome.
    pub fn invalidate(&self) {
        let mut est = self.estimate.write();
        if !est.is_unknown() {
            debug!(previous = %est, "Position estimate invalidated");
        }
        *est = PositionEstimate::Unknown;
    }

    /// Refresh with exchange-reported truth. Only the reconciliation loop
    /// calls this.
    pub fn refresh(&self, position: Decimal) {
        *self.estimate.write() = PositionEstimate::Known(position);
        debug!(%position, "Position estimate refreshed");
    }
}
