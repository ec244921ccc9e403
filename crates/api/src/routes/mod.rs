//! HTTP route handlers for the marketplace API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                                    - Health check
//!
//! # Checkout
//! POST /api/v1/checkout                           - Start a checkout (customer)
//!
//! # Payment webhook
//! POST /api/v1/webhook/stripe                     - Completion events from Stripe
//!
//! # Withdrawals
//! POST /api/v1/vendors/{id}/withdraw              - Withdraw all matured funds (vendor)
//! POST /api/v1/orders/{id}/withdraw               - Withdraw one order (vendor)
//!
//! # Shipping
//! POST /api/v1/shipping/shipments                 - Quote rates, attach shipment
//! POST /api/v1/shipping/transactions              - Purchase a label
//!
//! # Vendors
//! POST /api/v1/vendor-requests                    - Apply to become a vendor (customer)
//! GET  /api/v1/vendors/{id}/transactions          - Order ledger + totals (vendor)
//! POST /api/v1/vendors/{id}/onboarding-link       - Stripe onboarding link (vendor)
//! GET  /api/v1/vendors/{id}/onboarding-complete   - Onboarding return callback
//!
//! # Admin
//! GET  /api/v1/admin/vendor-requests              - List pending applications
//! POST /api/v1/admin/vendor-requests/{id}/approve - Approve an application
//!
//! # Catalog & reviews
//! GET  /api/v1/products                           - List products
//! POST /api/v1/products                           - Create product (vendor)
//! GET  /api/v1/products/{id}                      - Product detail
//! PUT  /api/v1/products/{id}                      - Update product (owning vendor)
//! GET  /api/v1/products/{id}/reviews              - List product reviews
//! POST /api/v1/products/{id}/reviews              - Review a product (customer)
//! GET  /api/v1/vendors/{id}/reviews               - List vendor reviews
//! POST /api/v1/vendors/{id}/reviews               - Review a vendor (customer)
//! ```

use axum::{Json, Router, routing::get};

use crate::state::AppState;

pub mod admin;
pub mod checkout;
pub mod products;
pub mod reviews;
pub mod shipping;
pub mod vendors;
pub mod webhook;
pub mod withdraw;

/// Build the full application router.
pub fn router() -> Router<AppState> {
    let api = Router::new()
        .merge(checkout::router())
        .merge(webhook::router())
        .merge(withdraw::router())
        .merge(shipping::router())
        .merge(vendors::router())
        .merge(admin::router())
        .merge(products::router())
        .merge(reviews::router());

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
}

/// Health check endpoint.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
