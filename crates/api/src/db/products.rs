//! Product catalog repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use tailwater_core::{CurrencyCode, ProductId, VendorId};

use super::RepositoryError;
use crate::models::product::Product;

/// Internal row type for product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    vendor_id: i32,
    name: String,
    description: String,
    price: Decimal,
    currency: String,
    categories: serde_json::Value,
    stock: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let currency = CurrencyCode::parse(&row.currency).ok_or_else(|| {
            RepositoryError::DataCorruption(format!("unknown currency: {}", row.currency))
        })?;
        let categories: Vec<String> = serde_json::from_value(row.categories)
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid categories: {e}")))?;

        Ok(Self {
            id: ProductId::new(row.id),
            vendor_id: VendorId::new(row.vendor_id),
            name: row.name,
            description: row.description,
            price: row.price,
            currency,
            categories,
            stock: row.stock,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const PRODUCT_COLUMNS: &str = "id, vendor_id, name, description, price, currency, \
     categories, stock, created_at, updated_at";

/// Repository for the product catalog.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let query = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        let row = sqlx::query_as::<_, ProductRow>(&query)
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Fetch several products at once (checkout uses this to price a cart).
    ///
    /// Missing ids are silently absent from the result; the caller decides
    /// whether that is an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_many(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        let raw_ids: Vec<i32> = ids.iter().map(ProductId::as_i32).collect();
        let query = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)");
        let rows = sqlx::query_as::<_, ProductRow>(&query)
            .bind(&raw_ids)
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// List the whole catalog, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        let query = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC LIMIT $1"
        );
        let rows = sqlx::query_as::<_, ProductRow>(&query)
            .bind(limit)
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// List one vendor's products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_vendor(
        &self,
        vendor_id: VendorId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let query = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE vendor_id = $1 ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, ProductRow>(&query)
            .bind(vendor_id.as_i32())
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Create a listing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        vendor_id: VendorId,
        name: &str,
        description: &str,
        price: Decimal,
        currency: CurrencyCode,
        categories: &[String],
        stock: i32,
    ) -> Result<Product, RepositoryError> {
        let categories_json = serde_json::to_value(categories).map_err(|e| {
            RepositoryError::DataCorruption(format!("unserializable categories: {e}"))
        })?;

        let query = format!(
            "INSERT INTO products (vendor_id, name, description, price, currency, categories, stock) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {PRODUCT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ProductRow>(&query)
            .bind(vendor_id.as_i32())
            .bind(name)
            .bind(description)
            .bind(price)
            .bind(currency.as_stripe_str())
            .bind(categories_json)
            .bind(stock)
            .fetch_one(self.pool)
            .await?;

        row.try_into()
    }

    /// Update a listing's editable fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn update(
        &self,
        id: ProductId,
        name: &str,
        description: &str,
        price: Decimal,
        categories: &[String],
        stock: i32,
    ) -> Result<Product, RepositoryError> {
        let categories_json = serde_json::to_value(categories).map_err(|e| {
            RepositoryError::DataCorruption(format!("unserializable categories: {e}"))
        })?;

        let query = format!(
            "UPDATE products \
             SET name = $1, description = $2, price = $3, categories = $4, stock = $5, \
                 updated_at = NOW() \
             WHERE id = $6 \
             RETURNING {PRODUCT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ProductRow>(&query)
            .bind(name)
            .bind(description)
            .bind(price)
            .bind(categories_json)
            .bind(stock)
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }
}
