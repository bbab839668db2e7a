//! Core domain types for the adder liquidity bot.
//!
//! This crate provides the fundamental types used throughout the system:
//! - `Side`: bid/ask enum with position-sign helpers
//! - `Price`, `Size`: precision-safe numeric types
//! - `ProvideState`: per-side order lifecycle state
//! - `PositionEstimate`: the known/unknown signed position cell value
//! - `BookSnapshot`, `Fill`: market data and execution records

pub mod book;
pub mod decimal;
pub mod side;
pub mod state;

pub use book::{BookLevel, BookSnapshot, Fill};
pub use decimal::{round_sig_figs, Price, Size, QUOTE_SIG_FIGS};
pub use side::{Side, SIDES};
pub use state::{PositionEstimate, ProvideState};
