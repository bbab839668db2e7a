//! Liquidity-providing strategy core.
//!
//! Maintains one resting post-only order per side of the book, keyed off
//! live book updates:
//! - `quote`: pluggable target-price strategies (depth offset or
//!   stochastic-control)
//! - `provide`: the per-side order state machine and its deviation-triggered
//!   cancel/replace tick
//! - `reconcile`: the periodic loop that repairs state drift against
//!   exchange-reported truth
//!
//! # Locking
//!
//! Each side's `ProvideState` lives in its own async mutex; the shared
//! position estimate and cancelled-oid registry have their own locks.
//! Acquisition order is always per-side lock first, then shared cells, and
//! no lock is held across a gateway call: decisions are made under the lock,
//! the network call runs unlocked, and the result is applied under a fresh
//! acquisition with the state re-validated (a late acknowledgement that
//! lost the race is logged and dropped).

pub mod config;
pub mod provide;
pub mod quote;
pub mod reconcile;

pub use config::{ProvideConfig, StrategyConfig};
pub use provide::ProvideEngine;
pub use quote::{DepthBased, Quote, QuoteStrategy, StochasticControl};
pub use reconcile::Reconciler;
