//! Order gateway abstraction for the adder liquidity bot.
//!
//! Provides a trait-based abstraction over the exchange's order endpoints:
//! - Dependency injection for testing (see [`MockGateway`])
//! - Separation of order lifecycle logic from transport
//!
//! Gateway calls are plain request/response operations that may fail
//! transiently. Failures are surfaced to the caller and never retried here;
//! recovery belongs to the next tick or reconciliation cycle.

pub mod error;
pub mod mock;
pub mod rest;
pub mod types;

pub use error::{GatewayError, GatewayResult};
pub use mock::MockGateway;
pub use rest::RestGateway;
pub use types::{CancelOutcome, OpenOrder, OrderRequest, PlaceOutcome};

use std::pin::Pin;
use std::sync::Arc;

use rust_decimal::Decimal;

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// Exchange order operations.
///
/// All methods return a definite outcome (success, known failure kind, or
/// ambiguous) that the caller must branch on; errors never cross this
/// boundary as panics or retries.
pub trait OrderGateway: Send + Sync {
    /// Submit a new limit order.
    fn place_order(&self, request: OrderRequest) -> BoxFuture<'_, GatewayResult<PlaceOutcome>>;

    /// Cancel a resting order by exchange order id.
    fn cancel_order(&self, coin: &str, oid: u64) -> BoxFuture<'_, GatewayResult<CancelOutcome>>;

    /// List the exchange's view of open orders for the instrument.
    fn list_open_orders(&self, coin: &str) -> BoxFuture<'_, GatewayResult<Vec<OpenOrder>>>;

    /// Fetch the signed position for the instrument.
    fn get_position(&self, coin: &str) -> BoxFuture<'_, GatewayResult<Decimal>>;
}

/// Arc wrapper for gateway trait objects.
pub type DynOrderGateway = Arc<dyn OrderGateway>;
