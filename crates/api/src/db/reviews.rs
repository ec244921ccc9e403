//! Review repositories (products and vendors).

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use tailwater_core::{ProductId, ProductReviewId, VendorId, VendorReviewId};

use super::RepositoryError;
use crate::models::review::{ProductReview, VendorReview};

/// Internal row type for product review queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductReviewRow {
    id: i32,
    product_id: i32,
    customer_uid: String,
    rating: i16,
    body: String,
    created_at: DateTime<Utc>,
}

impl From<ProductReviewRow> for ProductReview {
    fn from(row: ProductReviewRow) -> Self {
        Self {
            id: ProductReviewId::new(row.id),
            product_id: ProductId::new(row.product_id),
            customer_uid: row.customer_uid,
            rating: row.rating,
            body: row.body,
            created_at: row.created_at,
        }
    }
}

/// Internal row type for vendor review queries.
#[derive(Debug, sqlx::FromRow)]
struct VendorReviewRow {
    id: i32,
    vendor_id: i32,
    customer_uid: String,
    rating: i16,
    body: String,
    created_at: DateTime<Utc>,
}

impl From<VendorReviewRow> for VendorReview {
    fn from(row: VendorReviewRow) -> Self {
        Self {
            id: VendorReviewId::new(row.id),
            vendor_id: VendorId::new(row.vendor_id),
            customer_uid: row.customer_uid,
            rating: row.rating,
            body: row.body,
            created_at: row.created_at,
        }
    }
}

/// Repository for both review collections.
pub struct ReviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepository<'a> {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List reviews for a product, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<ProductReview>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductReviewRow>(
            "SELECT id, product_id, customer_uid, rating, body, created_at \
             FROM product_reviews WHERE product_id = $1 ORDER BY created_at DESC",
        )
        .bind(product_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Add a review to a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the customer already reviewed
    /// this product.
    pub async fn create_for_product(
        &self,
        product_id: ProductId,
        customer_uid: &str,
        rating: i16,
        body: &str,
    ) -> Result<ProductReview, RepositoryError> {
        let row = sqlx::query_as::<_, ProductReviewRow>(
            "INSERT INTO product_reviews (product_id, customer_uid, rating, body) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, product_id, customer_uid, rating, body, created_at",
        )
        .bind(product_id.as_i32())
        .bind(customer_uid)
        .bind(rating)
        .bind(body)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "already reviewed"))?;

        Ok(row.into())
    }

    /// List reviews for a vendor's store, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_vendor(
        &self,
        vendor_id: VendorId,
    ) -> Result<Vec<VendorReview>, RepositoryError> {
        let rows = sqlx::query_as::<_, VendorReviewRow>(
            "SELECT id, vendor_id, customer_uid, rating, body, created_at \
             FROM vendor_reviews WHERE vendor_id = $1 ORDER BY created_at DESC",
        )
        .bind(vendor_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Add a review to a vendor's store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the customer already reviewed
    /// this vendor.
    pub async fn create_for_vendor(
        &self,
        vendor_id: VendorId,
        customer_uid: &str,
        rating: i16,
        body: &str,
    ) -> Result<VendorReview, RepositoryError> {
        let row = sqlx::query_as::<_, VendorReviewRow>(
            "INSERT INTO vendor_reviews (vendor_id, customer_uid, rating, body) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, vendor_id, customer_uid, rating, body, created_at",
        )
        .bind(vendor_id.as_i32())
        .bind(customer_uid)
        .bind(rating)
        .bind(body)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "already reviewed"))?;

        Ok(row.into())
    }
}
