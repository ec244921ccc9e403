//! Admin endpoints for the vendor application queue.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use tracing::{info, instrument, warn};

use tailwater_core::{UserRole, VendorRequestId, VendorRequestStatus};

use crate::db::{UserRepository, VendorRepository, VendorRequestRepository};
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::{Vendor, VendorRequest};
use crate::state::AppState;

/// Payout hold applied to new vendors, in days.
const DEFAULT_PAYOUT_HOLD_DAYS: i32 = 7;

/// Create admin routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/vendor-requests", get(list_vendor_requests))
        .route(
            "/admin/vendor-requests/{id}/approve",
            post(approve_vendor_request),
        )
}

/// List pending vendor applications, oldest first.
#[instrument(skip_all)]
async fn list_vendor_requests(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<Vec<VendorRequest>>, AppError> {
    let requests = VendorRequestRepository::new(state.pool())
        .list_pending()
        .await?;

    Ok(Json(requests))
}

/// Approve a vendor application.
///
/// Creates the vendor's Express payment account, promotes the request to a
/// vendor row, marks it approved, and upgrades the applicant's role.
#[instrument(skip(state, _admin), fields(request_id = %request_id))]
async fn approve_vendor_request(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(request_id): Path<VendorRequestId>,
) -> Result<Json<Vendor>, AppError> {
    let requests = VendorRequestRepository::new(state.pool());
    let request = requests
        .get_by_id(request_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("vendor request {request_id}")))?;

    if request.status != VendorRequestStatus::Pending {
        return Err(AppError::Conflict(format!(
            "request is already {}",
            request.status.as_str()
        )));
    }

    let users = UserRepository::new(state.pool());
    let applicant = users.get_by_uid(&request.owner_uid).await?;

    let account = state
        .stripe()
        .create_account(applicant.email.as_str())
        .await?;

    let vendor = VendorRepository::new(state.pool())
        .create(
            &request.owner_uid,
            &request.store_name,
            &account.id,
            DEFAULT_PAYOUT_HOLD_DAYS,
        )
        .await?;

    requests
        .set_status(request_id, VendorRequestStatus::Approved)
        .await?;

    if let Err(e) = users.set_role(&request.owner_uid, UserRole::Vendor).await {
        warn!(uid = %request.owner_uid, error = %e, "Failed to promote applicant role");
    }

    info!(
        vendor_id = %vendor.id,
        account_id = %account.id,
        "Vendor application approved"
    );

    Ok(Json(vendor))
}
