//! REST-backed order gateway.
//!
//! Speaks the exchange's JSON endpoints: `/exchange` for order placement and
//! cancellation, `/info` for open-order and account-state queries. Numeric
//! fields on the wire are strings.
//!
//! Calls are issued one at a time and never retried here. A transport
//! failure is surfaced as an error; a response that is neither a clear
//! "resting" acknowledgement nor a clear failure is reported as
//! [`PlaceOutcome::Ambiguous`] for the caller to branch on.

use crate::error::{GatewayError, GatewayResult};
use crate::types::{CancelOutcome, OpenOrder, OrderRequest, PlaceOutcome};
use crate::{BoxFuture, OrderGateway};

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// REST order gateway.
pub struct RestGateway {
    http: reqwest::Client,
    base_url: String,
    /// Account address the orders belong to.
    user_address: String,
}

impl RestGateway {
    pub fn new(base_url: impl Into<String>, user_address: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            user_address: user_address.into(),
        }
    }

    async fn post(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> GatewayResult<serde_json::Value> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::UnexpectedStatus(status.as_u16()));
        }

        Ok(response.json().await?)
    }
}

impl OrderGateway for RestGateway {
    fn place_order(&self, request: OrderRequest) -> BoxFuture<'_, GatewayResult<PlaceOutcome>> {
        Box::pin(async move {
            let tif = if request.post_only { "Alo" } else { "Gtc" };
            let body = json!({
                "action": {
                    "type": "order",
                    "orders": [{
                        "coin": request.coin,
                        "is_buy": request.side.is_buy(),
                        "sz": request.size.to_string(),
                        "limit_px": request.price.to_string(),
                        "order_type": { "limit": { "tif": tif } },
                    }],
                },
            });

            let response = self.post("/exchange", body).await?;
            debug!(%response, "Place order response");
            Ok(parse_place_response(&response))
        })
    }

    fn cancel_order(&self, coin: &str, oid: u64) -> BoxFuture<'_, GatewayResult<CancelOutcome>> {
        let coin = coin.to_string();
        Box::pin(async move {
            let body = json!({
                "action": {
                    "type": "cancel",
                    "cancels": [{ "coin": coin, "oid": oid }],
                },
            });

            let response = self.post("/exchange", body).await?;
            debug!(%response, oid, "Cancel order response");
            Ok(parse_cancel_response(&response))
        })
    }

    fn list_open_orders(&self, _coin: &str) -> BoxFuture<'_, GatewayResult<Vec<OpenOrder>>> {
        Box::pin(async move {
            let body = json!({ "type": "openOrders", "user": self.user_address });
            let response = self.post("/info", body).await?;

            serde_json::from_value(response)
                .map_err(|e| GatewayError::Malformed(format!("openOrders: {e}")))
        })
    }

    fn get_position(&self, coin: &str) -> BoxFuture<'_, GatewayResult<Decimal>> {
        let coin = coin.to_string();
        Box::pin(async move {
            let body = json!({ "type": "clearinghouseState", "user": self.user_address });
            let response = self.post("/info", body).await?;

            let state: UserState = serde_json::from_value(response)
                .map_err(|e| GatewayError::Malformed(format!("clearinghouseState: {e}")))?;
            Ok(state.position_for(&coin))
        })
    }
}

/// Exchange account state (the subset this gateway reads).
#[derive(Debug, Deserialize)]
struct UserState {
    #[serde(rename = "assetPositions", default)]
    asset_positions: Vec<AssetPosition>,
}

#[derive(Debug, Deserialize)]
struct AssetPosition {
    position: RawPosition,
}

#[derive(Debug, Deserialize)]
struct RawPosition {
    coin: String,
    /// Signed position size as a decimal string.
    szi: Decimal,
}

impl UserState {
    /// Signed position for `coin`; zero when the instrument has no entry.
    fn position_for(&self, coin: &str) -> Decimal {
        self.asset_positions
            .iter()
            .find(|p| p.position.coin == coin)
            .map(|p| p.position.szi)
            .unwrap_or(Decimal::ZERO)
    }
}

/// Interpret a placement response.
///
/// Only a `status: "ok"` envelope whose first order status carries a
/// `resting.oid` counts as resting; everything else is ambiguous.
fn parse_place_response(response: &serde_json::Value) -> PlaceOutcome {
    let ambiguous = || PlaceOutcome::Ambiguous {
        status: response.to_string(),
    };

    if response.get("status").and_then(|s| s.as_str()) != Some("ok") {
        return ambiguous();
    }

    let status = response
        .pointer("/response/data/statuses/0")
        .cloned()
        .unwrap_or(serde_json::Value::Null);

    match status.pointer("/resting/oid").and_then(|o| o.as_u64()) {
        Some(oid) => PlaceOutcome::Resting { oid },
        None => ambiguous(),
    }
}

/// Interpret a cancel response.
fn parse_cancel_response(response: &serde_json::Value) -> CancelOutcome {
    if response.get("status").and_then(|s| s.as_str()) != Some("ok") {
        return CancelOutcome::Failed {
            reason: response.to_string(),
        };
    }

    let status = response.pointer("/response/data/statuses/0");
    match status.and_then(|s| s.as_str()) {
        Some("success") => CancelOutcome::Cancelled,
        _ => CancelOutcome::Failed {
            reason: response.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_place_resting() {
        let response = serde_json::json!({
            "status": "ok",
            "response": { "data": { "statuses": [ { "resting": { "oid": 4711 } } ] } },
        });
        assert_eq!(
            parse_place_response(&response),
            PlaceOutcome::Resting { oid: 4711 }
        );
    }

    #[test]
    fn test_parse_place_filled_is_ambiguous() {
        // An immediate fill on a post-only order should never happen; if the
        // exchange reports one anyway we cannot trust our state.
        let response = serde_json::json!({
            "status": "ok",
            "response": { "data": { "statuses": [ { "filled": { "oid": 4711 } } ] } },
        });
        assert!(matches!(
            parse_place_response(&response),
            PlaceOutcome::Ambiguous { .. }
        ));
    }

    #[test]
    fn test_parse_place_error_envelope_is_ambiguous() {
        let response = serde_json::json!({ "status": "err", "response": "order rejected" });
        assert!(matches!(
            parse_place_response(&response),
            PlaceOutcome::Ambiguous { .. }
        ));
    }

    #[test]
    fn test_parse_cancel_success() {
        let response = serde_json::json!({
            "status": "ok",
            "response": { "data": { "statuses": [ "success" ] } },
        });
        assert!(parse_cancel_response(&response).is_cancelled());
    }

    #[test]
    fn test_parse_cancel_failure() {
        let response = serde_json::json!({
            "status": "ok",
            "response": { "data": { "statuses": [ { "error": "order not found" } ] } },
        });
        assert!(!parse_cancel_response(&response).is_cancelled());
    }

    #[test]
    fn test_user_state_position_lookup() {
        let state: UserState = serde_json::from_value(serde_json::json!({
            "assetPositions": [
                { "position": { "coin": "ARB", "szi": "-3.2" } },
                { "position": { "coin": "ETH", "szi": "0.5" } },
            ],
        }))
        .unwrap();

        assert_eq!(state.position_for("ARB"), "-3.2".parse::<Decimal>().unwrap());
        assert_eq!(state.position_for("SOL"), Decimal::ZERO);
    }
}
