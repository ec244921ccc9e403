//! Product and vendor review endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde::Deserialize;
use tracing::instrument;

use tailwater_core::{ProductId, VendorId};

use crate::db::{ProductRepository, ReviewRepository, VendorRepository};
use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::models::review::{
    MAX_RATING, MIN_RATING, ProductReview, VendorReview, rating_in_bounds,
};
use crate::state::AppState;

/// Create review routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/products/{id}/reviews",
            get(list_product_reviews).post(create_product_review),
        )
        .route(
            "/vendors/{id}/reviews",
            get(list_vendor_reviews).post(create_vendor_review),
        )
}

#[derive(Debug, Deserialize)]
struct ReviewBody {
    rating: i16,
    #[serde(default)]
    body: String,
}

fn check_rating(rating: i16) -> Result<(), AppError> {
    if !rating_in_bounds(rating) {
        return Err(AppError::BadRequest(format!(
            "rating must be between {MIN_RATING} and {MAX_RATING}"
        )));
    }
    Ok(())
}

/// List a product's reviews.
#[instrument(skip(state), fields(product_id = %product_id))]
async fn list_product_reviews(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<Vec<ProductReview>>, AppError> {
    let reviews = ReviewRepository::new(state.pool())
        .list_for_product(product_id)
        .await?;

    Ok(Json(reviews))
}

/// Review a product.
#[instrument(skip(state, user, body), fields(product_id = %product_id))]
async fn create_product_review(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(product_id): Path<ProductId>,
    Json(body): Json<ReviewBody>,
) -> Result<Json<ProductReview>, AppError> {
    check_rating(body.rating)?;

    ProductRepository::new(state.pool())
        .get_by_id(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;

    let review = ReviewRepository::new(state.pool())
        .create_for_product(product_id, &user.0.uid, body.rating, &body.body)
        .await?;

    Ok(Json(review))
}

/// List a vendor's reviews.
#[instrument(skip(state), fields(vendor_id = %vendor_id))]
async fn list_vendor_reviews(
    State(state): State<AppState>,
    Path(vendor_id): Path<VendorId>,
) -> Result<Json<Vec<VendorReview>>, AppError> {
    let reviews = ReviewRepository::new(state.pool())
        .list_for_vendor(vendor_id)
        .await?;

    Ok(Json(reviews))
}

/// Review a vendor's store.
#[instrument(skip(state, user, body), fields(vendor_id = %vendor_id))]
async fn create_vendor_review(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(vendor_id): Path<VendorId>,
    Json(body): Json<ReviewBody>,
) -> Result<Json<VendorReview>, AppError> {
    check_rating(body.rating)?;

    VendorRepository::new(state.pool())
        .get_by_id(vendor_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("vendor {vendor_id}")))?;

    let review = ReviewRepository::new(state.pool())
        .create_for_vendor(vendor_id, &user.0.uid, body.rating, &body.body)
        .await?;

    Ok(Json(review))
}
