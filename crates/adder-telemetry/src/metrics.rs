//! Prometheus metrics for the adder liquidity bot.
//!
//! # Panics
//!
//! Metric registration uses `unwrap()` intentionally. If registration fails,
//! it indicates a fatal configuration error (e.g., duplicate metric names)
//! that should cause an immediate crash at startup rather than silent
//! failure. These panics only occur during static initialization.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_gauge, register_int_counter, CounterVec, Gauge, IntCounter,
};

/// Orders placed, by side and kind (ideal/gap).
pub static ORDERS_PLACED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "adder_orders_placed_total",
        "Total orders placed",
        &["side", "kind"]
    )
    .unwrap()
});

/// Orders cancelled, by side and reason (deviation/gap/orphan).
pub static ORDERS_CANCELLED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "adder_orders_cancelled_total",
        "Total orders cancelled",
        &["side", "reason"]
    )
    .unwrap()
});

/// Fill events received.
pub static FILLS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("adder_fills_total", "Total fills received").unwrap()
});

/// Reconciliation cycles, by outcome.
pub static RECONCILE_CYCLES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "adder_reconcile_cycles_total",
        "Total reconciliation cycles",
        &["outcome"]
    )
    .unwrap()
});

/// Latest known signed position (0 while unknown).
pub static POSITION: Lazy<Gauge> = Lazy::new(|| {
    register_gauge!("adder_position", "Latest known signed position").unwrap()
});

/// Whether the position estimate is currently known (1) or invalidated (0).
pub static POSITION_KNOWN: Lazy<Gauge> = Lazy::new(|| {
    register_gauge!(
        "adder_position_known",
        "Position estimate validity (1=known)"
    )
    .unwrap()
});

/// Convenience facade over the metric statics.
pub struct Metrics;

impl Metrics {
    pub fn order_placed(side: &str, kind: &str) {
        ORDERS_PLACED_TOTAL.with_label_values(&[side, kind]).inc();
    }

    pub fn order_cancelled(side: &str, reason: &str) {
        ORDERS_CANCELLED_TOTAL
            .with_label_values(&[side, reason])
            .inc();
    }

    pub fn fills(count: u64) {
        FILLS_TOTAL.inc_by(count);
        POSITION_KNOWN.set(0.0);
    }

    pub fn reconcile_cycle(ok: bool) {
        let outcome = if ok { "ok" } else { "error" };
        RECONCILE_CYCLES_TOTAL.with_label_values(&[outcome]).inc();
    }

    pub fn position_refreshed(position: f64) {
        POSITION.set(position);
        POSITION_KNOWN.set(1.0);
    }
}
