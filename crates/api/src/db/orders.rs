//! Order ledger repository.
//!
//! The withdrawal-critical operations live here. Note the (intentional,
//! inherited) absence of any transactional guard: `list_available_for_vendor`
//! and `mark_withdrawn` are separate calls, so two concurrent withdrawals can
//! select the same rows. See the payouts service for the full discussion.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use tailwater_core::{CurrencyCode, OrderId, PayoutStatus, ShippingStatus, VendorId};

use super::RepositoryError;
use crate::models::order::{Order, OrderLine};

/// Internal row type for order queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    vendor_id: i32,
    customer_uid: String,
    amount: Decimal,
    currency: String,
    products: serde_json::Value,
    payout_status: String,
    shipping_status: String,
    purchase_date: DateTime<Utc>,
    withdraw_available_date: DateTime<Utc>,
    stripe_transfer_id: Option<String>,
    shipment_id: Option<String>,
    tracking_number: Option<String>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let currency = CurrencyCode::parse(&row.currency).ok_or_else(|| {
            RepositoryError::DataCorruption(format!("unknown currency: {}", row.currency))
        })?;
        let payout_status = PayoutStatus::parse(&row.payout_status).ok_or_else(|| {
            RepositoryError::DataCorruption(format!("unknown payout status: {}", row.payout_status))
        })?;
        let shipping_status = ShippingStatus::parse(&row.shipping_status).ok_or_else(|| {
            RepositoryError::DataCorruption(format!(
                "unknown shipping status: {}",
                row.shipping_status
            ))
        })?;
        let products: Vec<OrderLine> = serde_json::from_value(row.products)
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid order lines: {e}")))?;

        Ok(Self {
            id: OrderId::from_uuid(row.id),
            vendor_id: VendorId::new(row.vendor_id),
            customer_uid: row.customer_uid,
            amount: row.amount,
            currency,
            products,
            payout_status,
            shipping_status,
            purchase_date: row.purchase_date,
            withdraw_available_date: row.withdraw_available_date,
            stripe_transfer_id: row.stripe_transfer_id,
            shipment_id: row.shipment_id,
            tracking_number: row.tracking_number,
        })
    }
}

const ORDER_COLUMNS: &str = "id, vendor_id, customer_uid, amount, currency, products, \
     payout_status, shipping_status, purchase_date, withdraw_available_date, \
     stripe_transfer_id, shipment_id, tracking_number";

/// Repository for order ledger operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a ledger entry for one vendor's share of a completed checkout.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        id: OrderId,
        vendor_id: VendorId,
        customer_uid: &str,
        amount: Decimal,
        currency: CurrencyCode,
        products: &[OrderLine],
        purchase_date: DateTime<Utc>,
        withdraw_available_date: DateTime<Utc>,
    ) -> Result<Order, RepositoryError> {
        let products_json = serde_json::to_value(products)
            .map_err(|e| RepositoryError::DataCorruption(format!("unserializable lines: {e}")))?;

        let query = format!(
            "INSERT INTO orders \
             (id, vendor_id, customer_uid, amount, currency, products, payout_status, \
              shipping_status, purchase_date, withdraw_available_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {ORDER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, OrderRow>(&query)
            .bind(id.as_uuid())
            .bind(vendor_id.as_i32())
            .bind(customer_uid)
            .bind(amount)
            .bind(currency.as_stripe_str())
            .bind(products_json)
            .bind(PayoutStatus::Pending.as_str())
            .bind(ShippingStatus::Unshipped.as_str())
            .bind(purchase_date)
            .bind(withdraw_available_date)
            .fetch_one(self.pool)
            .await?;

        row.try_into()
    }

    /// Get an order by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if the row is invalid.
    pub async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let query = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1");
        let row = sqlx::query_as::<_, OrderRow>(&query)
            .bind(id.as_uuid())
            .fetch_optional(self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// List all of a vendor's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_vendor(&self, vendor_id: VendorId) -> Result<Vec<Order>, RepositoryError> {
        let query = format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE vendor_id = $1 ORDER BY purchase_date DESC"
        );
        let rows = sqlx::query_as::<_, OrderRow>(&query)
            .bind(vendor_id.as_i32())
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// List a vendor's orders whose payout status is `available`.
    ///
    /// The hold-date filter is applied client-side by the caller, matching
    /// the original system's behavior.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_available_for_vendor(
        &self,
        vendor_id: VendorId,
    ) -> Result<Vec<Order>, RepositoryError> {
        let query = format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE vendor_id = $1 AND payout_status = $2 \
             ORDER BY purchase_date ASC"
        );
        let rows = sqlx::query_as::<_, OrderRow>(&query)
            .bind(vendor_id.as_i32())
            .bind(PayoutStatus::Available.as_str())
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Mark an order withdrawn, recording the transfer id in the same write.
    ///
    /// The transfer id is written together with the status so a `withdrawn`
    /// row always carries the transfer that paid it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn mark_withdrawn(
        &self,
        id: OrderId,
        transfer_id: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE orders SET payout_status = $1, stripe_transfer_id = $2 WHERE id = $3",
        )
        .bind(PayoutStatus::Withdrawn.as_str())
        .bind(transfer_id)
        .bind(id.as_uuid())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Flip pending orders past their hold date to `available`.
    ///
    /// Run opportunistically before withdrawal scans; returns how many rows
    /// advanced.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn release_matured_holds(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            "UPDATE orders SET payout_status = $1 \
             WHERE payout_status = $2 AND withdraw_available_date <= $3",
        )
        .bind(PayoutStatus::Available.as_str())
        .bind(PayoutStatus::Pending.as_str())
        .bind(now)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Attach a carrier shipment id to an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn attach_shipment(
        &self,
        id: OrderId,
        shipment_id: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE orders SET shipment_id = $1 WHERE id = $2")
            .bind(shipment_id)
            .bind(id.as_uuid())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Record a purchased label: tracking number + shipping status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn record_label(
        &self,
        id: OrderId,
        tracking_number: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE orders SET tracking_number = $1, shipping_status = $2 WHERE id = $3",
        )
        .bind(tracking_number)
        .bind(ShippingStatus::LabelPurchased.as_str())
        .bind(id.as_uuid())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
