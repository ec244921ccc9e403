//! Stripe webhook handler.

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use tracing::{debug, info, instrument};

use crate::error::AppError;
use crate::services::PayoutService;
use crate::state::AppState;
use crate::stripe;

/// Create webhook routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/webhook/stripe", post(handle_stripe_event))
}

/// Handle a Stripe webhook delivery.
///
/// The signature is verified against the raw body before anything is
/// parsed; an invalid signature is a 401 with no side effects. Only
/// `checkout.session.completed` is acted on.
#[instrument(skip_all)]
async fn handle_stripe_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<StatusCode, AppError> {
    let signature = headers
        .get("Stripe-Signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("missing Stripe-Signature header".to_string()))?;

    stripe::verify_signature(&state.config().stripe.webhook_secret, signature, &body)
        .map_err(|e| AppError::Unauthorized(e.to_string()))?;

    // Payload problems are the caller's fault, not an upstream outage
    let event = stripe::parse_event(&body).map_err(|e| AppError::BadRequest(e.to_string()))?;

    if event.event_type != "checkout.session.completed" {
        debug!(event_type = %event.event_type, "Ignoring event");
        return Ok(StatusCode::OK);
    }

    let session =
        stripe::parse_checkout_session(event).map_err(|e| AppError::BadRequest(e.to_string()))?;

    info!(session_id = %session.id, "Processing completed checkout session");

    PayoutService::new(state.pool(), state.stripe())
        .process_completed_session(&session)
        .await?;

    Ok(StatusCode::OK)
}
