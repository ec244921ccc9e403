//! Withdrawal endpoints.

use axum::{Json, Router, extract::Path, extract::State, routing::post};
use tracing::instrument;

use tailwater_core::{OrderId, VendorId};

use crate::error::AppError;
use crate::middleware::CurrentVendor;
use crate::services::{PayoutService, WithdrawalReceipt};
use crate::state::AppState;

/// Create withdrawal routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/vendors/{id}/withdraw", post(withdraw_vendor))
        .route("/orders/{id}/withdraw", post(withdraw_order))
}

/// Withdraw all of the vendor's matured funds.
#[instrument(skip(state, auth), fields(vendor_id = %vendor_id))]
async fn withdraw_vendor(
    State(state): State<AppState>,
    auth: CurrentVendor,
    Path(vendor_id): Path<VendorId>,
) -> Result<Json<WithdrawalReceipt>, AppError> {
    if auth.vendor.id != vendor_id {
        return Err(AppError::Forbidden("not your store".to_string()));
    }

    let receipt = PayoutService::new(state.pool(), state.stripe())
        .withdraw_vendor(&auth.vendor)
        .await?;

    Ok(Json(receipt))
}

/// Withdraw a single order's funds.
#[instrument(skip(state, auth), fields(order_id = %order_id))]
async fn withdraw_order(
    State(state): State<AppState>,
    auth: CurrentVendor,
    Path(order_id): Path<OrderId>,
) -> Result<Json<WithdrawalReceipt>, AppError> {
    let receipt = PayoutService::new(state.pool(), state.stripe())
        .withdraw_order(&auth.vendor, order_id)
        .await?;

    Ok(Json(receipt))
}
