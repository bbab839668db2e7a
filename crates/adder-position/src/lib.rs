//! Shared mutable cells for the adder liquidity bot.
//!
//! Two pieces of process-wide state are touched by all three activity
//! sources (book updates, fill events, the reconciliation timer):
//! - `PositionTracker`: the latest known signed position, invalidated on
//!   every fill and refreshed only by reconciliation
//! - `CancelledOidRegistry`: short-TTL set of order ids the strategy itself
//!   recently cancelled
//!
//! Both are guarded by their own `parking_lot` lock. Lock-acquisition order
//! across the process is: per-side provide lock first, then these shared
//! cells; neither lock is ever held across a network call.

pub mod registry;
pub mod tracker;

pub use registry::CancelledOidRegistry;
pub use tracker::PositionTracker;
