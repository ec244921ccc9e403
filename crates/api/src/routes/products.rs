//! Product catalog endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{info, instrument};

use tailwater_core::{CurrencyCode, ProductId};

use crate::db::ProductRepository;
use crate::error::AppError;
use crate::middleware::CurrentVendor;
use crate::models::Product;
use crate::state::AppState;

/// Default page size for listings.
const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;

/// Create product routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/{id}", get(get_product).put(update_product))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    limit: Option<i64>,
}

/// List products, newest first.
#[instrument(skip_all)]
async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Product>>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let products = ProductRepository::new(state.pool()).list(limit).await?;

    Ok(Json(products))
}

/// Product detail.
#[instrument(skip(state), fields(product_id = %product_id))]
async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<Product>, AppError> {
    let product = ProductRepository::new(state.pool())
        .get_by_id(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;

    Ok(Json(product))
}

#[derive(Debug, Deserialize)]
struct CreateProductBody {
    name: String,
    description: String,
    price: Decimal,
    #[serde(default)]
    currency: CurrencyCode,
    #[serde(rename = "catagories", default)]
    categories: Vec<String>,
    stock: i32,
}

/// Create a listing under the caller's store.
#[instrument(skip(state, auth, body), fields(vendor_id = %auth.vendor.id))]
async fn create_product(
    State(state): State<AppState>,
    auth: CurrentVendor,
    Json(body): Json<CreateProductBody>,
) -> Result<Json<Product>, AppError> {
    validate_listing(&body.name, body.price, body.stock)?;

    let product = ProductRepository::new(state.pool())
        .create(
            auth.vendor.id,
            body.name.trim(),
            &body.description,
            body.price,
            body.currency,
            &body.categories,
            body.stock,
        )
        .await?;

    info!(product_id = %product.id, "Product created");

    Ok(Json(product))
}

#[derive(Debug, Deserialize)]
struct UpdateProductBody {
    name: String,
    description: String,
    price: Decimal,
    #[serde(rename = "catagories", default)]
    categories: Vec<String>,
    stock: i32,
}

/// Update a listing. Only the owning vendor may write.
#[instrument(skip(state, auth, body), fields(product_id = %product_id))]
async fn update_product(
    State(state): State<AppState>,
    auth: CurrentVendor,
    Path(product_id): Path<ProductId>,
    Json(body): Json<UpdateProductBody>,
) -> Result<Json<Product>, AppError> {
    validate_listing(&body.name, body.price, body.stock)?;

    let products = ProductRepository::new(state.pool());
    let existing = products
        .get_by_id(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;

    if existing.vendor_id != auth.vendor.id {
        return Err(AppError::Forbidden(
            "product belongs to another vendor".to_string(),
        ));
    }

    let updated = products
        .update(
            product_id,
            body.name.trim(),
            &body.description,
            body.price,
            &body.categories,
            body.stock,
        )
        .await?;

    Ok(Json(updated))
}

fn validate_listing(name: &str, price: Decimal, stock: i32) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }
    if price <= Decimal::ZERO {
        return Err(AppError::BadRequest("price must be positive".to_string()));
    }
    if stock < 0 {
        return Err(AppError::BadRequest("stock cannot be negative".to_string()));
    }
    Ok(())
}
