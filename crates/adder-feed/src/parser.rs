//! Feed message parsing.
//!
//! Parses WebSocket channel messages into typed events. Numeric fields
//! arrive as strings on the wire.

use adder_core::{BookLevel, BookSnapshot, Fill, Price, Size};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::error::{FeedError, FeedResult};

/// Parsed feed event.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    /// A fresh book snapshot for the subscribed instrument.
    Book(BookSnapshot),
    /// A batch of executions from the user event stream.
    Fills(Vec<Fill>),
}

/// Message envelope: every feed message carries a channel and a payload.
#[derive(Debug, Deserialize)]
struct Envelope {
    channel: String,
    #[serde(default)]
    data: serde_json::Value,
}

/// L2 book payload.
/// Format: `{"coin": "...", "time": ..., "levels": [[bids...], [asks...]]}`
/// with levels ordered best-to-worst on each side.
#[derive(Debug, Deserialize)]
struct L2BookData {
    coin: String,
    #[serde(default)]
    time: u64,
    levels: [Vec<RawLevel>; 2],
}

#[derive(Debug, Deserialize)]
struct RawLevel {
    px: Decimal,
    sz: Decimal,
}

/// User event payload; only fill batches are consumed.
#[derive(Debug, Deserialize)]
struct UserEventsData {
    #[serde(default)]
    fills: Option<Vec<Fill>>,
}

/// Parse a raw feed message.
///
/// Returns `Ok(None)` for housekeeping channels (subscription responses,
/// pongs) and user events without fills.
pub fn parse_message(raw: &str) -> FeedResult<Option<FeedEvent>> {
    let envelope: Envelope = serde_json::from_str(raw)?;

    match envelope.channel.as_str() {
        "l2Book" => {
            let book: L2BookData = serde_json::from_value(envelope.data)
                .map_err(|e| FeedError::Malformed(format!("l2Book: {e}")))?;
            let [bids, asks] = book.levels;
            Ok(Some(FeedEvent::Book(BookSnapshot {
                coin: book.coin,
                bids: bids.into_iter().map(to_level).collect(),
                asks: asks.into_iter().map(to_level).collect(),
                time_ms: book.time,
            })))
        }
        "user" => {
            let events: UserEventsData = serde_json::from_value(envelope.data)
                .map_err(|e| FeedError::Malformed(format!("user events: {e}")))?;
            Ok(events.fills.map(FeedEvent::Fills))
        }
        "subscriptionResponse" | "pong" => Ok(None),
        other => {
            debug!(channel = other, "Ignoring unknown feed channel");
            Ok(None)
        }
    }
}

fn to_level(raw: RawLevel) -> BookLevel {
    BookLevel {
        price: Price::new(raw.px),
        size: Size::new(raw.sz),
    }
}
