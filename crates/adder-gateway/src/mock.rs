//! In-memory order gateway for tests.

use crate::error::{GatewayError, GatewayResult};
use crate::types::{CancelOutcome, OpenOrder, OrderRequest, PlaceOutcome};
use crate::{BoxFuture, OrderGateway};

use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

/// Mock order gateway for testing.
///
/// Records every call and replays scripted outcomes. When no outcome is
/// queued, placements rest at sequentially assigned oids and cancels
/// succeed, so the happy path needs no scripting.
#[derive(Debug, Default)]
pub struct MockGateway {
    /// Scripted placement outcomes, consumed front-first.
    place_results: Mutex<VecDeque<GatewayResult<PlaceOutcome>>>,
    /// Scripted cancel outcomes, consumed front-first.
    cancel_results: Mutex<VecDeque<GatewayResult<CancelOutcome>>>,
    /// Open orders returned by `list_open_orders`.
    open_orders: Mutex<Vec<OpenOrder>>,
    /// Position returned by `get_position`.
    position: Mutex<Decimal>,
    /// Whether `list_open_orders` should fail.
    fail_list: Mutex<bool>,

    /// Recorded placement requests.
    places: Mutex<Vec<OrderRequest>>,
    /// Recorded cancel requests (coin, oid).
    cancels: Mutex<Vec<(String, u64)>>,
    /// Number of `list_open_orders` calls.
    list_calls: AtomicU64,
    /// Number of `get_position` calls.
    position_calls: AtomicU64,

    next_oid: AtomicU64,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            next_oid: AtomicU64::new(1),
            ..Self::default()
        }
    }

    /// Queue the outcome of the next placement.
    pub fn push_place_result(&self, result: GatewayResult<PlaceOutcome>) {
        self.place_results.lock().push_back(result);
    }

    /// Queue the outcome of the next cancel.
    pub fn push_cancel_result(&self, result: GatewayResult<CancelOutcome>) {
        self.cancel_results.lock().push_back(result);
    }

    /// Set the open orders reported by the exchange.
    pub fn set_open_orders(&self, orders: Vec<OpenOrder>) {
        *self.open_orders.lock() = orders;
    }

    /// Set the position reported by the exchange.
    pub fn set_position(&self, position: Decimal) {
        *self.position.lock() = position;
    }

    /// Make `list_open_orders` fail until reset.
    pub fn set_fail_list(&self, fail: bool) {
        *self.fail_list.lock() = fail;
    }

    /// Placement requests received so far.
    pub fn places(&self) -> Vec<OrderRequest> {
        self.places.lock().clone()
    }

    /// Cancel requests received so far.
    pub fn cancels(&self) -> Vec<(String, u64)> {
        self.cancels.lock().clone()
    }

    pub fn list_calls(&self) -> u64 {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn position_calls(&self) -> u64 {
        self.position_calls.load(Ordering::SeqCst)
    }
}

impl OrderGateway for MockGateway {
    fn place_order(&self, request: OrderRequest) -> BoxFuture<'_, GatewayResult<PlaceOutcome>> {
        Box::pin(async move {
            self.places.lock().push(request);
            match self.place_results.lock().pop_front() {
                Some(result) => result,
                None => Ok(PlaceOutcome::Resting {
                    oid: self.next_oid.fetch_add(1, Ordering::SeqCst),
                }),
            }
        })
    }

    fn cancel_order(&self, coin: &str, oid: u64) -> BoxFuture<'_, GatewayResult<CancelOutcome>> {
        let coin = coin.to_string();
        Box::pin(async move {
            self.cancels.lock().push((coin, oid));
            match self.cancel_results.lock().pop_front() {
                Some(result) => result,
                None => Ok(CancelOutcome::Cancelled),
            }
        })
    }

    fn list_open_orders(&self, _coin: &str) -> BoxFuture<'_, GatewayResult<Vec<OpenOrder>>> {
        Box::pin(async move {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            if *self.fail_list.lock() {
                return Err(GatewayError::Transport("listOpenOrders failed".to_string()));
            }
            Ok(self.open_orders.lock().clone())
        })
    }

    fn get_position(&self, _coin: &str) -> BoxFuture<'_, GatewayResult<Decimal>> {
        Box::pin(async move {
            self.position_calls.fetch_add(1, Ordering::SeqCst);
            Ok(*self.position.lock())
        })
    }
}
