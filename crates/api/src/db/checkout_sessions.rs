//! Checkout session repository.
//!
//! Rows are keyed by the processor's session id so the webhook can look up
//! the pending cart by the id it receives in the event payload. Expired rows
//! are deleted by the periodic cleanup task.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::RepositoryError;
use crate::models::checkout_session::{CheckoutSessionRecord, VendorSplit};

/// Internal row type for checkout session queries.
#[derive(Debug, sqlx::FromRow)]
struct CheckoutSessionRow {
    id: String,
    customer_uid: String,
    vendor_splits: serde_json::Value,
    expires_at: DateTime<Utc>,
}

impl TryFrom<CheckoutSessionRow> for CheckoutSessionRecord {
    type Error = RepositoryError;

    fn try_from(row: CheckoutSessionRow) -> Result<Self, Self::Error> {
        let vendor_splits: Vec<VendorSplit> = serde_json::from_value(row.vendor_splits)
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid vendor splits: {e}")))?;

        Ok(Self {
            id: row.id,
            customer_uid: row.customer_uid,
            vendor_splits,
            expires_at: row.expires_at,
        })
    }
}

/// Repository for ephemeral checkout session records.
pub struct CheckoutSessionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CheckoutSessionRepository<'a> {
    /// Create a new checkout session repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist a pending cart keyed by the processor session id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the session id already exists.
    pub async fn create(
        &self,
        id: &str,
        customer_uid: &str,
        vendor_splits: &[VendorSplit],
        expires_at: DateTime<Utc>,
    ) -> Result<CheckoutSessionRecord, RepositoryError> {
        let splits_json = serde_json::to_value(vendor_splits)
            .map_err(|e| RepositoryError::DataCorruption(format!("unserializable splits: {e}")))?;

        let row = sqlx::query_as::<_, CheckoutSessionRow>(
            "INSERT INTO checkout_sessions (id, customer_uid, vendor_splits, expires_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, customer_uid, vendor_splits, expires_at",
        )
        .bind(id)
        .bind(customer_uid)
        .bind(splits_json)
        .bind(expires_at)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "session already recorded"))?;

        row.try_into()
    }

    /// Look up a pending cart by the processor session id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(
        &self,
        id: &str,
    ) -> Result<Option<CheckoutSessionRecord>, RepositoryError> {
        let row = sqlx::query_as::<_, CheckoutSessionRow>(
            "SELECT id, customer_uid, vendor_splits, expires_at \
             FROM checkout_sessions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Delete a session record (after the webhook has consumed it).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM checkout_sessions WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Sweep sessions whose expiry has passed; returns rows deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM checkout_sessions WHERE expires_at <= $1")
            .bind(now)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
