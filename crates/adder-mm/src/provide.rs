//! Per-side order lifecycle management.
//!
//! One `ProvideEngine` owns both sides' resting-order beliefs and drives
//! them from book updates:
//! - cancel a resting order when it drifts beyond tolerance from the
//!   strategy's target, or when a liquidity gap calls for a straddle quote
//! - reclaim in-flight orders that were never acknowledged
//! - place a fresh post-only order when a side is idle, the position is
//!   known, and the projected notional clears the exchange minimum
//!
//! There is no atomic replace on the exchange: every change is
//! cancel-then-place, and anything this event-driven path misses is repaired
//! by the reconciliation loop.

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use adder_core::{BookSnapshot, Fill, Price, ProvideState, Side, SIDES};
use adder_gateway::{CancelOutcome, DynOrderGateway, OrderRequest, PlaceOutcome};
use adder_position::{CancelledOidRegistry, PositionTracker};
use adder_telemetry::Metrics;

use crate::config::ProvideConfig;
use crate::quote::QuoteStrategy;

/// Per-side order state machine and deviation tick.
pub struct ProvideEngine {
    config: ProvideConfig,
    strategy: Box<dyn QuoteStrategy>,
    gateway: DynOrderGateway,
    position: Arc<PositionTracker>,
    cancelled: Arc<CancelledOidRegistry>,
    bid: Mutex<ProvideState>,
    ask: Mutex<ProvideState>,
}

impl ProvideEngine {
    pub fn new(
        config: ProvideConfig,
        strategy: Box<dyn QuoteStrategy>,
        gateway: DynOrderGateway,
        position: Arc<PositionTracker>,
        cancelled: Arc<CancelledOidRegistry>,
    ) -> Self {
        Self {
            config,
            strategy,
            gateway,
            position,
            cancelled,
            bid: Mutex::new(ProvideState::Cancelled),
            ask: Mutex::new(ProvideState::Cancelled),
        }
    }

    pub fn config(&self) -> &ProvideConfig {
        &self.config
    }

    pub fn position(&self) -> &PositionTracker {
        &self.position
    }

    pub fn cancelled_registry(&self) -> &CancelledOidRegistry {
        &self.cancelled
    }

    pub(crate) fn gateway(&self) -> &dyn adder_gateway::OrderGateway {
        self.gateway.as_ref()
    }

    fn side_state(&self, side: Side) -> &Mutex<ProvideState> {
        match side {
            Side::Bid => &self.bid,
            Side::Ask => &self.ask,
        }
    }

    /// Current belief for a side.
    pub async fn state(&self, side: Side) -> ProvideState {
        *self.side_state(side).lock().await
    }

    #[cfg(test)]
    pub(crate) async fn set_state(&self, side: Side, state: ProvideState) {
        *self.side_state(side).lock().await = state;
    }

    /// Handle a user-event fill batch.
    ///
    /// The position belief is unconditionally invalidated; no order is
    /// placed on any side until the next reconciliation refresh.
    pub fn on_user_fills(&self, fills: &[Fill]) {
        info!(count = fills.len(), "Fills received; invalidating position");
        Metrics::fills(fills.len() as u64);
        self.position.invalidate();
    }

    /// Evaluate both sides against a fresh book snapshot.
    pub async fn on_book_update(&self, book: &BookSnapshot, now_ms: u64) {
        if book.coin != self.config.coin {
            warn!(coin = %book.coin, "Unexpected book message, skipping");
            return;
        }

        for side in SIDES {
            self.tick_side(side, book, now_ms).await;
        }
    }

    /// One deviation-monitor pass for a single side.
    ///
    /// Issues at most one cancel and one placement. The gap condition takes
    /// priority over plain drift.
    async fn tick_side(&self, side: Side, book: &BookSnapshot, now_ms: u64) {
        let Some(distance) = self.strategy.target_distance(side, book) else {
            return;
        };
        let (Some(best_bid), Some(best_ask)) = (book.best_bid(), book.best_ask()) else {
            return;
        };

        // Deviation targets are computed against the last known position
        // (zero while unknown); placement below separately requires a
        // known position.
        let position_hint = self.position.known().unwrap_or(Decimal::ZERO);
        let ideal = self.strategy.ideal_price(side, book, position_hint);

        let gap_price = gap_straddle_price(side, best_bid, best_ask, distance);

        self.maybe_cancel(side, ideal, gap_price, distance, now_ms)
            .await;
        self.check_stale_pending(side, now_ms).await;
        self.maybe_place(side, book, gap_price, now_ms).await;
    }

    /// Cancel the side's resting order when it sits too far from its target.
    ///
    /// Under a gap the target is the straddle price with the gap tolerance;
    /// otherwise the ideal price, with the wider tolerance for orders that
    /// were placed as gap straddles.
    async fn maybe_cancel(
        &self,
        side: Side,
        ideal: Option<Price>,
        gap_price: Option<Price>,
        distance: Decimal,
        now_ms: u64,
    ) {
        let planned = {
            let state = self.side_state(side).lock().await;
            let Some((price, oid)) = state.resting_price().zip(state.resting_oid()) else {
                return;
            };
            let is_gap_order = matches!(*state, ProvideState::GapResting { .. });

            let (target, tolerance, reason) = match gap_price {
                Some(gap) => (Some(gap), self.config.gap_deviation, "gap"),
                None if is_gap_order => (ideal, self.config.gap_deviation, "deviation"),
                None => (ideal, self.config.allowable_deviation, "deviation"),
            };
            let Some(target) = target else { return };

            if price.distance(target) > tolerance * distance {
                Some((oid, price, target, reason))
            } else {
                None
            }
        };

        let Some((oid, price, target, reason)) = planned else {
            return;
        };

        info!(
            %side, oid, resting_px = %price, target_px = %target, reason,
            "Cancelling order"
        );

        match self.gateway.cancel_order(&self.config.coin, oid).await {
            Ok(CancelOutcome::Cancelled) => {
                let mut state = self.side_state(side).lock().await;
                if state.resting_oid() == Some(oid) {
                    *state = ProvideState::Cancelled;
                    self.cancelled.record(oid, now_ms);
                    Metrics::order_cancelled(&side.to_string(), reason);
                } else {
                    debug!(%side, oid, "Cancel acknowledged after state moved on; ignoring");
                }
            }
            Ok(CancelOutcome::Failed { reason }) => {
                warn!(%side, oid, reason = %reason, "Failed to cancel order; leaving state unchanged");
            }
            Err(e) => {
                warn!(%side, oid, error = %e, "Cancel request failed; leaving state unchanged");
            }
        }
    }

    /// Reclaim an in-flight order that was never acknowledged.
    ///
    /// No cancel request is issued (no oid is known); if the order later
    /// surfaces on the exchange the reconciliation loop removes it.
    async fn check_stale_pending(&self, side: Side, now_ms: u64) {
        let mut state = self.side_state(side).lock().await;
        if let ProvideState::PendingNew { submitted_at_ms } = *state {
            if now_ms.saturating_sub(submitted_at_ms) > self.config.inflight_timeout_ms {
                warn!(
                    %side, submitted_at_ms,
                    "Order still in flight after timeout; treating as cancelled"
                );
                *state = ProvideState::Cancelled;
            }
        }
    }

    /// Place a fresh order when the side is idle.
    ///
    /// Quotes the gap-straddle price while the gap condition holds,
    /// otherwise the strategy's ideal price. Requires a known position.
    async fn maybe_place(&self, side: Side, book: &BookSnapshot, gap_price: Option<Price>, now_ms: u64) {
        let request = {
            let mut state = self.side_state(side).lock().await;
            if !state.is_cancelled() {
                return;
            }

            let Some(position) = self.position.known() else {
                debug!(%side, "Not placing an order: waiting for next position refresh");
                return;
            };

            let quote = match gap_price {
                Some(gap) => self.strategy.quote_at(gap, side, position),
                None => self.strategy.quote(side, book, position),
            };
            let Some(quote) = quote else {
                debug!(%side, "Not placing an order: at position limit");
                return;
            };

            *state = ProvideState::PendingNew {
                submitted_at_ms: now_ms,
            };
            OrderRequest::new(&self.config.coin, side, quote.price, quote.size)
        };

        info!(
            %side, px = %request.price, sz = %request.size,
            gap = gap_price.is_some(),
            "Placing order"
        );

        match self.gateway.place_order(request.clone()).await {
            Ok(PlaceOutcome::Resting { oid }) => {
                let mut state = self.side_state(side).lock().await;
                match *state {
                    ProvideState::PendingNew { submitted_at_ms } if submitted_at_ms == now_ms => {
                        let kind = if gap_price.is_some() { "gap" } else { "ideal" };
                        *state = if gap_price.is_some() {
                            ProvideState::GapResting {
                                price: request.price,
                                oid,
                            }
                        } else {
                            ProvideState::Resting {
                                price: request.price,
                                oid,
                            }
                        };
                        Metrics::order_placed(&side.to_string(), kind);
                        debug!(%side, oid, "Order resting");
                    }
                    _ => {
                        info!(
                            %side, oid,
                            "Late placement acknowledgement; reconciliation will clean up"
                        );
                    }
                }
            }
            Ok(PlaceOutcome::Ambiguous { status }) => {
                warn!(
                    %side, status = %status,
                    "Unexpected response from placing order; invalidating position"
                );
                {
                    let mut state = self.side_state(side).lock().await;
                    if state.is_pending() {
                        *state = ProvideState::Cancelled;
                    }
                }
                self.position.invalidate();
            }
            Err(e) => {
                // The request may or may not have reached the exchange; the
                // in-flight timeout reclaims the side either way.
                warn!(%side, error = %e, "Place request failed; leaving order in flight");
            }
        }
    }
}

/// Straddle price when the spread is abnormally wide.
///
/// A gap exists when the spread exceeds twice the target distance; each side
/// then quotes 1.5 target distances inside the gap from its own edge of the
/// book.
fn gap_straddle_price(
    side: Side,
    best_bid: Price,
    best_ask: Price,
    distance: Decimal,
) -> Option<Price> {
    if (best_ask - best_bid).inner() <= Decimal::TWO * distance {
        return None;
    }

    let offset = distance * Decimal::new(15, 1); // 1.5 * distance
    let price = match side {
        Side::Bid => Price::new(best_bid.inner() + offset),
        Side::Ask => Price::new(best_ask.inner() - offset),
    };
    Some(price.round_to_quote_precision())
}
