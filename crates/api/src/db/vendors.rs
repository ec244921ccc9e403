//! Vendor repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use tailwater_core::VendorId;

use super::RepositoryError;
use crate::models::vendor::Vendor;

/// Internal row type for vendor queries.
#[derive(Debug, sqlx::FromRow)]
struct VendorRow {
    id: i32,
    owner_uid: String,
    store_name: String,
    stripe_account_id: Option<String>,
    has_stripe_onboarding: bool,
    payout_hold_days: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<VendorRow> for Vendor {
    fn from(row: VendorRow) -> Self {
        Self {
            id: VendorId::new(row.id),
            owner_uid: row.owner_uid,
            store_name: row.store_name,
            stripe_account_id: row.stripe_account_id,
            has_stripe_onboarding: row.has_stripe_onboarding,
            payout_hold_days: row.payout_hold_days,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const VENDOR_COLUMNS: &str = "id, owner_uid, store_name, stripe_account_id, \
     has_stripe_onboarding, payout_hold_days, created_at, updated_at";

/// Repository for vendor records.
pub struct VendorRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> VendorRepository<'a> {
    /// Create a new vendor repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a vendor by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: VendorId) -> Result<Option<Vendor>, RepositoryError> {
        let query = format!("SELECT {VENDOR_COLUMNS} FROM vendors WHERE id = $1");
        let row = sqlx::query_as::<_, VendorRow>(&query)
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    /// Get a vendor by the owning user's UID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_owner(&self, owner_uid: &str) -> Result<Option<Vendor>, RepositoryError> {
        let query = format!("SELECT {VENDOR_COLUMNS} FROM vendors WHERE owner_uid = $1");
        let row = sqlx::query_as::<_, VendorRow>(&query)
            .bind(owner_uid)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    /// Create a vendor record (on admin approval of an application).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the owner already has a store.
    pub async fn create(
        &self,
        owner_uid: &str,
        store_name: &str,
        stripe_account_id: &str,
        payout_hold_days: i32,
    ) -> Result<Vendor, RepositoryError> {
        let query = format!(
            "INSERT INTO vendors (owner_uid, store_name, stripe_account_id, payout_hold_days) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {VENDOR_COLUMNS}"
        );
        let row = sqlx::query_as::<_, VendorRow>(&query)
            .bind(owner_uid)
            .bind(store_name)
            .bind(stripe_account_id)
            .bind(payout_hold_days)
            .fetch_one(self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "owner already has a store"))?;

        Ok(row.into())
    }

    /// Mark a vendor's Stripe onboarding complete.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the vendor doesn't exist.
    pub async fn complete_onboarding(&self, id: VendorId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE vendors SET has_stripe_onboarding = TRUE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id.as_i32())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
