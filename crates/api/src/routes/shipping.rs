//! Shipping endpoints: rate quotes and label purchase.

use axum::{
    Json, Router,
    extract::State,
    http::HeaderMap,
    routing::post,
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use tailwater_core::OrderId;

use crate::db::OrderRepository;
use crate::error::AppError;
use crate::shippo::{Address, Parcel, Rate};
use crate::state::AppState;

/// Create shipping routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/shipping/shipments", post(create_shipment))
        .route("/shipping/transactions", post(purchase_label))
}

#[derive(Debug, Deserialize)]
struct ShipmentRequest {
    address_from: Address,
    address_to: Address,
    parcel: Parcel,
    order_id: Option<OrderId>,
}

#[derive(Debug, Serialize)]
struct ShipmentResponse {
    shipment_id: String,
    rates: Vec<Rate>,
}

/// Quote rates for a parcel; optionally attach the shipment to an order.
#[instrument(skip_all)]
async fn create_shipment(
    State(state): State<AppState>,
    Json(request): Json<ShipmentRequest>,
) -> Result<Json<ShipmentResponse>, AppError> {
    let shipment = state
        .shippo()
        .create_shipment(&request.address_from, &request.address_to, &request.parcel)
        .await
        .map_err(validation_to_bad_request)?;

    if let Some(order_id) = request.order_id {
        OrderRepository::new(state.pool())
            .attach_shipment(order_id, &shipment.object_id)
            .await?;
        info!(order_id = %order_id, shipment_id = %shipment.object_id, "Shipment attached to order");
    }

    Ok(Json(ShipmentResponse {
        shipment_id: shipment.object_id,
        rates: shipment.rates,
    }))
}

#[derive(Debug, Deserialize)]
struct TransactionRequest {
    rate_id: String,
    order_id: Option<OrderId>,
}

#[derive(Debug, Serialize)]
struct TransactionResponse {
    transaction_id: String,
    status: String,
    tracking_number: Option<String>,
    label_url: Option<String>,
}

/// Purchase a label for a quoted rate.
///
/// The caller's bearer key, when present, is forwarded to the carrier
/// unchanged; the server token is only a fallback. On success the order's
/// tracking number and shipping status are recorded.
#[instrument(skip_all)]
async fn purchase_label(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<TransactionRequest>,
) -> Result<Json<TransactionResponse>, AppError> {
    let caller_key = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|k| SecretString::from(k.to_string()));

    let transaction = state
        .shippo()
        .purchase_transaction(&request.rate_id, caller_key.as_ref())
        .await?;

    if let (Some(order_id), Some(tracking)) = (request.order_id, &transaction.tracking_number) {
        OrderRepository::new(state.pool())
            .record_label(order_id, tracking)
            .await?;
        info!(order_id = %order_id, tracking = %tracking, "Label recorded on order");
    }

    Ok(Json(TransactionResponse {
        transaction_id: transaction.object_id,
        status: transaction.status,
        tracking_number: transaction.tracking_number,
        label_url: transaction.label_url,
    }))
}

/// Input-validation failures are the client's fault, not the carrier's.
fn validation_to_bad_request(e: crate::shippo::ShippoError) -> AppError {
    match e {
        crate::shippo::ShippoError::Validation(msg) => AppError::BadRequest(msg),
        other => AppError::Shippo(other),
    }
}
