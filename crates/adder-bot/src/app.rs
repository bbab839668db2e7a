//! Main application orchestration.
//!
//! Wires the feed, the provide engine, the reconciliation task and the
//! fill log together, then runs the event loop until shutdown or a
//! terminal feed failure.

use crate::config::AppConfig;
use crate::error::AppResult;

use adder_feed::{FeedClient, FeedConfig, FeedEvent};
use adder_gateway::{DynOrderGateway, RestGateway};
use adder_mm::{ProvideEngine, Reconciler};
use adder_persistence::FillLog;
use adder_position::{CancelledOidRegistry, PositionTracker};

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Main application.
pub struct Application {
    config: AppConfig,
}

impl Application {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Run the application until ctrl-c or a terminal feed failure.
    pub async fn run(self) -> AppResult<()> {
        let config = self.config;
        info!(coin = %config.provide.coin, user = %config.user_address, "Starting adder bot");

        let position = Arc::new(PositionTracker::new());
        let cancelled = Arc::new(CancelledOidRegistry::new(
            config.provide.cancelled_retention_ms,
        ));
        let gateway: DynOrderGateway =
            Arc::new(RestGateway::new(&config.api_url, &config.user_address));
        let strategy = config.strategy.build(config.provide.min_notional);

        let engine = Arc::new(ProvideEngine::new(
            config.provide.clone(),
            strategy,
            gateway,
            position,
            cancelled,
        ));
        let mut fill_log = FillLog::new(&config.persistence.fill_log_path);

        // Feed task: book updates and user fills over one channel.
        let (event_tx, mut event_rx) = mpsc::channel::<FeedEvent>(1024);
        let feed = FeedClient::new(FeedConfig {
            ws_url: config.ws_url.clone(),
            coin: config.provide.coin.clone(),
            user_address: config.user_address.clone(),
            max_reconnect_attempts: config.feed.max_reconnect_attempts,
            reconnect_delay_ms: config.feed.reconnect_delay_ms,
        });
        let feed_handle = tokio::spawn(async move { feed.run(event_tx).await });

        // Independent reconciliation timer.
        let reconcile_handle = tokio::spawn(Reconciler::new(engine.clone()).run());

        info!("Entering main event loop");
        let exit = loop {
            tokio::select! {
                maybe_event = event_rx.recv() => match maybe_event {
                    Some(FeedEvent::Book(book)) => {
                        let now_ms = chrono::Utc::now().timestamp_millis() as u64;
                        engine.on_book_update(&book, now_ms).await;
                    }
                    Some(FeedEvent::Fills(fills)) => {
                        if let Err(e) = fill_log.append_batch(&fills) {
                            warn!(error = %e, "Failed to append fill batch");
                        }
                        engine.on_user_fills(&fills);
                    }
                    None => break LoopExit::FeedEnded,
                },

                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received");
                    break LoopExit::Shutdown;
                }
            }
        };

        reconcile_handle.abort();

        let result = match exit {
            // Surface the feed's terminal error (reconnect exhaustion).
            LoopExit::FeedEnded => match feed_handle.await {
                Ok(Err(e)) => Err(e.into()),
                _ => Ok(()),
            },
            LoopExit::Shutdown => {
                feed_handle.abort();
                Ok(())
            }
        };

        info!("Shut down");
        result
    }
}

/// Why the main event loop exited.
enum LoopExit {
    /// The feed task ended (its result carries any terminal error).
    FeedEnded,
    /// Ctrl-c received.
    Shutdown,
}
