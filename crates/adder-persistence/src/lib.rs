//! Append-only fill log.
//!
//! Uses JSON Lines format for robustness:
//! - Each line is one complete JSON record (a fill batch)
//! - Partial file corruption only affects individual lines
//! - Can be read even if a write was interrupted
//!
//! Write-only: nothing in the trading path reads this file back.

pub mod error;
pub mod fill_log;

pub use error::{PersistenceError, PersistenceResult};
pub use fill_log::FillLog;
