//! WebSocket feed connection.
//!
//! Connects, subscribes to the book and user event streams, and forwards
//! parsed events over a channel. Reconnects a bounded number of times with
//! a fixed delay; exhaustion is a terminal error surfaced to the caller.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

use crate::error::{FeedError, FeedResult};
use crate::parser::{parse_message, FeedEvent};

/// Feed configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// WebSocket endpoint URL.
    pub ws_url: String,
    /// Instrument to subscribe to.
    pub coin: String,
    /// Account address for the user event subscription.
    pub user_address: String,
    /// Consecutive failed connection attempts before giving up. Default: 5.
    #[serde(default = "default_max_reconnect_attempts")]
    pub max_reconnect_attempts: u32,
    /// Fixed delay between attempts (ms). Default: 5,000.
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
}

fn default_max_reconnect_attempts() -> u32 {
    5
}

fn default_reconnect_delay_ms() -> u64 {
    5_000
}

/// How a streaming session ended.
enum StreamEnd {
    /// The event receiver was dropped; the process is shutting down.
    ReceiverClosed,
    /// The connection dropped; eligible for reconnect.
    Disconnected,
}

/// WebSocket feed client.
pub struct FeedClient {
    config: FeedConfig,
}

impl FeedClient {
    pub fn new(config: FeedConfig) -> Self {
        Self { config }
    }

    /// Run the feed until the receiver is dropped or reconnects are
    /// exhausted.
    ///
    /// A successfully established connection resets the attempt counter;
    /// only consecutive failures count toward the limit.
    pub async fn run(&self, tx: mpsc::Sender<FeedEvent>) -> FeedResult<()> {
        let mut attempt = 0u32;

        loop {
            match self.connect_and_stream(&tx).await {
                Ok(StreamEnd::ReceiverClosed) => {
                    info!("Feed receiver closed; stopping feed");
                    return Ok(());
                }
                Ok(StreamEnd::Disconnected) => {
                    warn!("Feed connection closed");
                    attempt = 0;
                }
                Err(e) => {
                    error!(error = %e, "Feed connection failed");
                }
            }

            attempt += 1;
            if attempt >= self.config.max_reconnect_attempts {
                error!(attempt, "Failed to reconnect after maximum attempts");
                return Err(FeedError::ReconnectExhausted(attempt));
            }

            warn!(
                attempt,
                delay_ms = self.config.reconnect_delay_ms,
                "Reconnecting"
            );
            tokio::time::sleep(Duration::from_millis(self.config.reconnect_delay_ms)).await;
        }
    }

    async fn connect_and_stream(&self, tx: &mpsc::Sender<FeedEvent>) -> FeedResult<StreamEnd> {
        info!(url = %self.config.ws_url, coin = %self.config.coin, "Connecting to feed");
        let (ws_stream, _response) = connect_async(self.config.ws_url.as_str()).await?;
        let (mut write, mut read) = ws_stream.split();

        for subscription in self.subscriptions() {
            write.send(Message::Text(subscription.to_string())).await?;
        }
        info!("Feed subscriptions sent");

        while let Some(message) = read.next().await {
            match message? {
                Message::Text(text) => match parse_message(&text) {
                    Ok(Some(event)) => {
                        if tx.send(event).await.is_err() {
                            return Ok(StreamEnd::ReceiverClosed);
                        }
                    }
                    Ok(None) => {}
                    Err(e) => warn!(error = %e, "Dropping unparseable feed message"),
                },
                Message::Ping(payload) => {
                    write.send(Message::Pong(payload)).await?;
                }
                Message::Close(frame) => {
                    debug!(?frame, "Feed close frame received");
                    return Ok(StreamEnd::Disconnected);
                }
                _ => {}
            }
        }

        Ok(StreamEnd::Disconnected)
    }

    fn subscriptions(&self) -> Vec<serde_json::Value> {
        vec![
            json!({
                "method": "subscribe",
                "subscription": { "type": "l2Book", "coin": self.config.coin },
            }),
            json!({
                "method": "subscribe",
                "subscription": { "type": "userEvents", "user": self.config.user_address },
            }),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> FeedConfig {
        FeedConfig {
            ws_url: "wss://example.invalid/ws".to_string(),
            coin: "ARB".to_string(),
            user_address: "0xabc".to_string(),
            max_reconnect_attempts: 5,
            reconnect_delay_ms: 5_000,
        }
    }

    #[test]
    fn test_subscription_payloads() {
        let client = FeedClient::new(config());
        let subs = client.subscriptions();
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0]["subscription"]["type"], "l2Book");
        assert_eq!(subs[0]["subscription"]["coin"], "ARB");
        assert_eq!(subs[1]["subscription"]["type"], "userEvents");
        assert_eq!(subs[1]["subscription"]["user"], "0xabc");
    }

    #[test]
    fn test_config_defaults() {
        let parsed: FeedConfig = serde_json::from_str(
            r#"{"ws_url": "wss://x", "coin": "ARB", "user_address": "0xabc"}"#,
        )
        .unwrap();
        assert_eq!(parsed.max_reconnect_attempts, 5);
        assert_eq!(parsed.reconnect_delay_ms, 5_000);
    }
}
