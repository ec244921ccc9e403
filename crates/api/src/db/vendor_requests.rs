//! Vendor application repository.
//!
//! Applications are promoted to vendor rows on admin approval and are never
//! deleted; rejected rows stay for the audit trail.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use tailwater_core::{VendorRequestId, VendorRequestStatus};

use super::RepositoryError;
use crate::models::vendor::VendorRequest;

/// Internal row type for vendor request queries.
#[derive(Debug, sqlx::FromRow)]
struct VendorRequestRow {
    id: i32,
    owner_uid: String,
    store_name: String,
    message: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<VendorRequestRow> for VendorRequest {
    type Error = RepositoryError;

    fn try_from(row: VendorRequestRow) -> Result<Self, Self::Error> {
        let status = VendorRequestStatus::parse(&row.status).ok_or_else(|| {
            RepositoryError::DataCorruption(format!("unknown request status: {}", row.status))
        })?;

        Ok(Self {
            id: VendorRequestId::new(row.id),
            owner_uid: row.owner_uid,
            store_name: row.store_name,
            message: row.message,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const REQUEST_COLUMNS: &str =
    "id, owner_uid, store_name, message, status, created_at, updated_at";

/// Repository for vendor applications.
pub struct VendorRequestRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> VendorRequestRepository<'a> {
    /// Create a new vendor request repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// File a new application.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the user already has a
    /// pending application.
    pub async fn create(
        &self,
        owner_uid: &str,
        store_name: &str,
        message: &str,
    ) -> Result<VendorRequest, RepositoryError> {
        let query = format!(
            "INSERT INTO vendor_requests (owner_uid, store_name, message, status) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {REQUEST_COLUMNS}"
        );
        let row = sqlx::query_as::<_, VendorRequestRow>(&query)
            .bind(owner_uid)
            .bind(store_name)
            .bind(message)
            .bind(VendorRequestStatus::Pending.as_str())
            .fetch_one(self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "application already pending"))?;

        row.try_into()
    }

    /// Get an application by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(
        &self,
        id: VendorRequestId,
    ) -> Result<Option<VendorRequest>, RepositoryError> {
        let query = format!("SELECT {REQUEST_COLUMNS} FROM vendor_requests WHERE id = $1");
        let row = sqlx::query_as::<_, VendorRequestRow>(&query)
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// List applications still awaiting review, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_pending(&self) -> Result<Vec<VendorRequest>, RepositoryError> {
        let query = format!(
            "SELECT {REQUEST_COLUMNS} FROM vendor_requests \
             WHERE status = $1 ORDER BY created_at ASC"
        );
        let rows = sqlx::query_as::<_, VendorRequestRow>(&query)
            .bind(VendorRequestStatus::Pending.as_str())
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Record the review outcome for an application.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the request doesn't exist.
    pub async fn set_status(
        &self,
        id: VendorRequestId,
        status: VendorRequestStatus,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE vendor_requests SET status = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(status.as_str())
        .bind(id.as_i32())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
