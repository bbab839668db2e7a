//! Strategy configuration.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::quote::{DepthBased, QuoteStrategy, StochasticControl};

/// Provide-side configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvideConfig {
    /// The instrument to add liquidity on.
    pub coin: String,

    /// How far from the target price a resting order may deviate, as a
    /// fraction of the target distance, before it is cancelled and replaced.
    /// Default: 0.5.
    #[serde(default = "default_allowable_deviation")]
    pub allowable_deviation: Decimal,

    /// Deviation tolerance applied to gap-straddle orders (wider than the
    /// plain tolerance). Default: 1.0.
    #[serde(default = "default_gap_deviation")]
    pub gap_deviation: Decimal,

    /// Orders whose projected notional falls below this are not placed.
    /// Default: 10 (the exchange minimum).
    #[serde(default = "default_min_notional")]
    pub min_notional: Decimal,

    /// How long an unacknowledged order stays in flight before it is
    /// treated as lost (ms). Default: 10,000.
    #[serde(default = "default_inflight_timeout_ms")]
    pub inflight_timeout_ms: u64,

    /// Reconciliation cycle interval (ms). Default: 10,000.
    #[serde(default = "default_reconcile_interval_ms")]
    pub reconcile_interval_ms: u64,

    /// Retention window for self-cancelled order ids (ms). Default: 30,000.
    #[serde(default = "default_cancelled_retention_ms")]
    pub cancelled_retention_ms: u64,
}

fn default_allowable_deviation() -> Decimal {
    dec!(0.5)
}

fn default_gap_deviation() -> Decimal {
    dec!(1.0)
}

fn default_min_notional() -> Decimal {
    dec!(10)
}

fn default_inflight_timeout_ms() -> u64 {
    10_000
}

fn default_reconcile_interval_ms() -> u64 {
    10_000
}

fn default_cancelled_retention_ms() -> u64 {
    30_000
}

impl Default for ProvideConfig {
    fn default() -> Self {
        Self {
            coin: String::new(),
            allowable_deviation: default_allowable_deviation(),
            gap_deviation: default_gap_deviation(),
            min_notional: default_min_notional(),
            inflight_timeout_ms: default_inflight_timeout_ms(),
            reconcile_interval_ms: default_reconcile_interval_ms(),
            cancelled_retention_ms: default_cancelled_retention_ms(),
        }
    }
}

/// Quote strategy selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyConfig {
    /// Fixed fractional offset from the best price on each side.
    DepthBased {
        /// Offset as a fraction of the book price. Default: 0.001.
        #[serde(default = "default_depth_fraction")]
        depth_fraction: Decimal,
        /// Maximum absolute position, in units of the coin.
        max_position: Decimal,
    },
    /// Avellaneda-Stoikov style quoting from mid, spread and inventory.
    StochasticControl {
        /// Risk aversion.
        gamma: Decimal,
        /// Order arrival liquidity.
        k: Decimal,
        /// Risk-free adjustment.
        r: Decimal,
        /// Volatility estimate.
        vol: Decimal,
        /// Horizon.
        dt: Decimal,
        /// Maximum order size per side, in units of the coin.
        max_size: Decimal,
    },
}

fn default_depth_fraction() -> Decimal {
    dec!(0.001)
}

impl StrategyConfig {
    /// Build the configured strategy.
    pub fn build(&self, min_notional: Decimal) -> Box<dyn QuoteStrategy> {
        match self {
            Self::DepthBased {
                depth_fraction,
                max_position,
            } => Box::new(DepthBased::new(*depth_fraction, *max_position, min_notional)),
            Self::StochasticControl {
                gamma,
                k,
                r,
                vol,
                dt,
                max_size,
            } => Box::new(StochasticControl::new(
                *gamma,
                *k,
                *r,
                *vol,
                *dt,
                *max_size,
                min_notional,
            )),
        }
    }
}
