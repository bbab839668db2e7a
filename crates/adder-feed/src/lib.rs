//! Market data and user event feed.
//!
//! Subscribes to the exchange WebSocket for two streams on a single
//! instrument: L2 book snapshots and user execution events. Delivery is
//! best-effort and unordered relative to other streams; disconnects are
//! handled with a bounded fixed-delay reconnect policy whose exhaustion is
//! a terminal error for the process.

pub mod connection;
pub mod error;
pub mod parser;

pub use connection::{FeedClient, FeedConfig};
pub use error::{FeedError, FeedResult};
pub use parser::{parse_message, FeedEvent};
