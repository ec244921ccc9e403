//! Vendor lifecycle endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use tailwater_core::{PayoutStatus, VendorId};

use crate::db::{OrderRepository, VendorRepository, VendorRequestRepository};
use crate::error::AppError;
use crate::middleware::{CurrentUser, CurrentVendor};
use crate::models::{Order, VendorRequest};
use crate::state::AppState;

/// Create vendor routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/vendor-requests", post(file_vendor_request))
        .route("/vendors/{id}/transactions", get(vendor_transactions))
        .route("/vendors/{id}/onboarding-link", post(onboarding_link))
        .route("/vendors/{id}/onboarding-complete", get(onboarding_complete))
}

#[derive(Debug, Deserialize)]
struct VendorRequestBody {
    store_name: String,
    message: String,
}

/// File an application to become a vendor.
#[instrument(skip(state, user, body), fields(applicant = %user.0.uid))]
async fn file_vendor_request(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<VendorRequestBody>,
) -> Result<Json<VendorRequest>, AppError> {
    if body.store_name.trim().is_empty() {
        return Err(AppError::BadRequest("store_name is required".to_string()));
    }

    let request = VendorRequestRepository::new(state.pool())
        .create(&user.0.uid, body.store_name.trim(), &body.message)
        .await?;

    info!(request_id = %request.id, "Vendor application filed");

    Ok(Json(request))
}

#[derive(Debug, Serialize)]
struct LedgerTotals {
    pending: Decimal,
    available: Decimal,
    withdrawn: Decimal,
}

#[derive(Debug, Serialize)]
struct TransactionsResponse {
    orders: Vec<Order>,
    totals: LedgerTotals,
}

/// The vendor's order ledger with per-status totals.
#[instrument(skip(state, auth), fields(vendor_id = %vendor_id))]
async fn vendor_transactions(
    State(state): State<AppState>,
    auth: CurrentVendor,
    Path(vendor_id): Path<VendorId>,
) -> Result<Json<TransactionsResponse>, AppError> {
    if auth.vendor.id != vendor_id {
        return Err(AppError::Forbidden("not your store".to_string()));
    }

    let orders = OrderRepository::new(state.pool())
        .list_by_vendor(vendor_id)
        .await?;

    let mut totals = LedgerTotals {
        pending: Decimal::ZERO,
        available: Decimal::ZERO,
        withdrawn: Decimal::ZERO,
    };
    for order in &orders {
        match order.payout_status {
            PayoutStatus::Pending => totals.pending += order.amount,
            PayoutStatus::Available => totals.available += order.amount,
            PayoutStatus::Withdrawn => totals.withdrawn += order.amount,
        }
    }

    Ok(Json(TransactionsResponse { orders, totals }))
}

#[derive(Debug, Serialize)]
struct OnboardingLinkResponse {
    url: String,
}

/// Create a payment-account onboarding link for the vendor.
#[instrument(skip(state, auth), fields(vendor_id = %vendor_id))]
async fn onboarding_link(
    State(state): State<AppState>,
    auth: CurrentVendor,
    Path(vendor_id): Path<VendorId>,
) -> Result<Json<OnboardingLinkResponse>, AppError> {
    if auth.vendor.id != vendor_id {
        return Err(AppError::Forbidden("not your store".to_string()));
    }

    let account = auth.vendor.connected_account().ok_or_else(|| {
        AppError::Conflict("vendor has no connected payment account".to_string())
    })?;

    let base = &state.config().base_url;
    let refresh_url = format!("{base}/api/v1/vendors/{vendor_id}/onboarding-link");
    let return_url = format!("{base}/api/v1/vendors/{vendor_id}/onboarding-complete");

    let link = state
        .stripe()
        .create_account_link(account, &refresh_url, &return_url)
        .await?;

    Ok(Json(OnboardingLinkResponse { url: link.url }))
}

#[derive(Debug, Serialize)]
struct OnboardingCompleteResponse {
    onboarding_complete: bool,
}

/// Return callback after hosted onboarding.
///
/// Unauthenticated: the browser lands here from the processor's redirect.
/// The account state is re-checked with the processor before anything is
/// recorded.
#[instrument(skip(state), fields(vendor_id = %vendor_id))]
async fn onboarding_complete(
    State(state): State<AppState>,
    Path(vendor_id): Path<VendorId>,
) -> Result<Json<OnboardingCompleteResponse>, AppError> {
    let vendors = VendorRepository::new(state.pool());
    let vendor = vendors
        .get_by_id(vendor_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("vendor {vendor_id}")))?;

    let Some(account_id) = vendor.connected_account() else {
        return Err(AppError::Conflict(
            "vendor has no connected payment account".to_string(),
        ));
    };

    let account = state.stripe().retrieve_account(account_id).await?;

    if account.charges_enabled {
        vendors.complete_onboarding(vendor_id).await?;
        info!(vendor_id = %vendor_id, "Vendor onboarding complete");
    }

    Ok(Json(OnboardingCompleteResponse {
        onboarding_complete: account.charges_enabled,
    }))
}
