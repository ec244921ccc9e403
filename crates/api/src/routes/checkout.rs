//! Checkout endpoint.

use axum::{Json, Router, extract::State, routing::post};
use serde::Deserialize;
use tracing::instrument;

use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::services::{CartLine, CheckoutService, StartedCheckout};
use crate::state::AppState;

/// Create checkout routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/checkout", post(start_checkout))
}

#[derive(Debug, Deserialize)]
struct CheckoutRequest {
    items: Vec<CartLine>,
    success_url: String,
    cancel_url: String,
}

/// Start a checkout from a cart.
#[instrument(skip(state, user, request), fields(customer = %user.0.uid))]
async fn start_checkout(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<StartedCheckout>, AppError> {
    let started = CheckoutService::new(state.pool(), state.stripe())
        .start(
            &user.0.uid,
            &request.items,
            &request.success_url,
            &request.cancel_url,
        )
        .await?;

    Ok(Json(started))
}
