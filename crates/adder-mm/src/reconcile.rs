//! Periodic reconciliation against exchange-reported truth.
//!
//! Runs on its own timer, independent of market-data cadence, and is the
//! backstop for everything the event-driven path missed: duplicate orders
//! from lost acknowledgements, orders left over from a crash, and the
//! position estimate invalidated by fills.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use adder_core::SIDES;
use adder_gateway::{CancelOutcome, GatewayResult};
use adder_telemetry::Metrics;
use rust_decimal::prelude::ToPrimitive;

use crate::provide::ProvideEngine;

/// Reconciliation loop driver.
pub struct Reconciler {
    engine: Arc<ProvideEngine>,
}

impl Reconciler {
    pub fn new(engine: Arc<ProvideEngine>) -> Self {
        Self { engine }
    }

    /// Run reconciliation cycles forever.
    ///
    /// A failed cycle is logged and retried at the next tick; this loop
    /// never terminates the process.
    pub async fn run(self) {
        let interval_ms = self.engine.config().reconcile_interval_ms;
        let mut interval = tokio::time::interval(Duration::from_millis(interval_ms));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            let now_ms = chrono::Utc::now().timestamp_millis() as u64;
            match self.engine.reconcile_once(now_ms).await {
                Ok(()) => Metrics::reconcile_cycle(true),
                Err(e) => {
                    warn!(error = %e, "Reconciliation cycle failed; will retry next cycle");
                    Metrics::reconcile_cycle(false);
                }
            }
        }
    }
}

impl ProvideEngine {
    /// One reconciliation cycle.
    ///
    /// Cancels open orders we do not recognize, prunes the cancelled-oid
    /// registry, and refreshes the position estimate from the exchange.
    /// Recently self-cancelled oids are tolerated in the open-order list
    /// since cancellation may still be propagating.
    pub async fn reconcile_once(&self, now_ms: u64) -> GatewayResult<()> {
        let coin = &self.config().coin;
        let open_orders = self.gateway().list_open_orders(coin).await?;
        debug!(count = open_orders.len(), "Fetched open orders");

        let mut expected: HashSet<u64> = self.cancelled_registry().oids().into_iter().collect();
        for side in SIDES {
            if let Some(oid) = self.state(side).await.resting_oid() {
                expected.insert(oid);
            }
        }

        for order in &open_orders {
            if order.coin != *coin || expected.contains(&order.oid) {
                continue;
            }
            warn!(oid = order.oid, "Cancelling unknown order");
            match self.gateway().cancel_order(coin, order.oid).await {
                Ok(CancelOutcome::Cancelled) => {
                    Metrics::order_cancelled("reconcile", "orphan");
                }
                Ok(CancelOutcome::Failed { reason }) => {
                    warn!(oid = order.oid, reason = %reason, "Failed to cancel unknown order");
                }
                Err(e) => {
                    warn!(oid = order.oid, error = %e, "Cancel of unknown order failed");
                }
            }
        }

        let pruned = self.cancelled_registry().prune(now_ms);
        if pruned > 0 {
            debug!(pruned, "Pruned cancelled-oid registry");
        }

        let position = self.gateway().get_position(coin).await?;
        self.position().refresh(position);
        Metrics::position_refreshed(position.to_f64().unwrap_or(0.0));
        info!(%position, "Position refreshed from exchange");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adder_core::{Price, ProvideState, Side};
    use adder_gateway::{MockGateway, OpenOrder};
    use adder_position::{CancelledOidRegistry, PositionTracker};
    use rust_decimal_macros::dec;

    use crate::config::ProvideConfig;
    use crate::quote::DepthBased;

    const NOW: u64 = 1_700_000_000_000;

    fn open_order(oid: u64) -> OpenOrder {
        OpenOrder {
            oid,
            coin: "ARB".to_string(),
        }
    }

    fn engine() -> (Arc<MockGateway>, Arc<ProvideEngine>) {
        let gateway = Arc::new(MockGateway::new());
        let config = ProvideConfig {
            coin: "ARB".to_string(),
            ..ProvideConfig::default()
        };
        let strategy = Box::new(DepthBased::new(dec!(0.001), dec!(20), dec!(10)));
        let engine = Arc::new(ProvideEngine::new(
            config,
            strategy,
            gateway.clone(),
            Arc::new(PositionTracker::new()),
            Arc::new(CancelledOidRegistry::default()),
        ));
        (gateway, engine)
    }

    #[tokio::test]
    async fn test_orphan_orders_cancelled() {
        let (gateway, engine) = engine();
        engine
            .set_state(
                Side::Bid,
                ProvideState::Resting {
                    price: Price::new(dec!(999)),
                    oid: 1,
                },
            )
            .await;
        engine.cancelled_registry().record(2, NOW);
        gateway.set_open_orders(vec![open_order(1), open_order(2), open_order(3)]);

        engine.reconcile_once(NOW).await.unwrap();

        // Only the unrecognized oid is cancelled: 1 is ours, 2 was recently
        // self-cancelled and tolerated while propagation completes.
        assert_eq!(gateway.cancels(), vec![("ARB".to_string(), 3)]);
    }

    #[tokio::test]
    async fn test_other_instruments_left_alone() {
        let (gateway, engine) = engine();
        gateway.set_open_orders(vec![OpenOrder {
            oid: 9,
            coin: "ETH".to_string(),
        }]);

        engine.reconcile_once(NOW).await.unwrap();

        assert!(gateway.cancels().is_empty());
    }

    #[tokio::test]
    async fn test_idempotent_when_state_consistent() {
        let (gateway, engine) = engine();
        engine
            .set_state(
                Side::Ask,
                ProvideState::GapResting {
                    price: Price::new(dec!(1002.5)),
                    oid: 5,
                },
            )
            .await;
        gateway.set_open_orders(vec![open_order(5)]);
        gateway.set_position(dec!(1.5));

        engine.reconcile_once(NOW).await.unwrap();
        engine.reconcile_once(NOW + 10_000).await.unwrap();

        assert!(gateway.cancels().is_empty());
        assert!(gateway.places().is_empty());
        assert_eq!(gateway.list_calls(), 2);
        assert_eq!(engine.position().known(), Some(dec!(1.5)));
    }

    #[tokio::test]
    async fn test_position_refreshed_to_known() {
        let (gateway, engine) = engine();
        gateway.set_position(dec!(-4.2));
        assert!(engine.position().get().is_unknown());

        engine.reconcile_once(NOW).await.unwrap();

        assert_eq!(engine.position().known(), Some(dec!(-4.2)));
    }

    #[tokio::test]
    async fn test_registry_pruned_each_cycle() {
        let (gateway, engine) = engine();
        engine.cancelled_registry().record(7, NOW);
        gateway.set_open_orders(vec![]);

        engine.reconcile_once(NOW + 30_000).await.unwrap();
        assert!(engine.cancelled_registry().contains(7));

        engine.reconcile_once(NOW + 30_001).await.unwrap();
        assert!(!engine.cancelled_registry().contains(7));
    }

    #[tokio::test]
    async fn test_list_failure_is_recoverable_and_skips_refresh() {
        let (gateway, engine) = engine();
        gateway.set_fail_list(true);
        gateway.set_position(dec!(2));

        assert!(engine.reconcile_once(NOW).await.is_err());
        assert!(engine.position().get().is_unknown());

        // The next cycle succeeds and completes the refresh.
        gateway.set_fail_list(false);
        engine.reconcile_once(NOW + 10_000).await.unwrap();
        assert_eq!(engine.position().known(), Some(dec!(2)));
    }

    #[tokio::test]
    async fn test_orphan_cancel_failure_does_not_abort_cycle() {
        let (gateway, engine) = engine();
        gateway.set_open_orders(vec![open_order(3)]);
        gateway.push_cancel_result(Ok(CancelOutcome::Failed {
            reason: "gone".to_string(),
        }));
        gateway.set_position(dec!(0));

        engine.reconcile_once(NOW).await.unwrap();

        // The refused cancel is logged; position refresh still happens.
        assert_eq!(engine.position().known(), Some(dec!(0)));
    }
}
