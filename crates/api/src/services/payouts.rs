//! Payment splitting and withdrawals.
//!
//! Money moves twice: once when the completion webhook splits a payment
//! across vendors, and again when a vendor withdraws matured funds. The
//! ledger (`orders`) is the record of the second movement.
//!
//! There is deliberately no idempotency key on webhook processing and no
//! lock around the withdrawal read-then-write: a redelivered completion
//! event double-transfers, and two concurrent withdrawals can select the
//! same rows. Both gaps are inherited from the upstream system and are
//! documented in DESIGN.md rather than fixed here.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use sqlx::PgPool;
use tracing::{debug, error, info, instrument, warn};

use tailwater_core::{CurrencyCode, Money, OrderId};

use super::checkout::MetadataSplit;
use crate::db::{CheckoutSessionRepository, OrderRepository, VendorRepository};
use crate::error::AppError;
use crate::models::{Order, Vendor};
use crate::models::checkout_session::VendorSplit;
use crate::stripe::{CheckoutSessionObject, StripeClient};

/// Fixed platform fee rate: 10% of each vendor's gross share.
const PLATFORM_FEE_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// The platform's cut of a gross amount, rounded to cents.
#[must_use]
pub fn platform_fee(gross: Decimal) -> Decimal {
    (gross * PLATFORM_FEE_RATE)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// What the vendor keeps after the platform fee.
///
/// Defined as `gross - platform_fee(gross)` so fee + net always reproduce
/// the gross exactly.
#[must_use]
pub fn net_amount(gross: Decimal) -> Decimal {
    gross - platform_fee(gross)
}

/// The rows a bulk withdrawal will pay out, plus their single-transfer total.
#[derive(Debug)]
struct WithdrawalSelection {
    orders: Vec<Order>,
    currency: CurrencyCode,
    total_net: Decimal,
}

/// Pick the rows a bulk withdrawal covers and sum their net payout.
///
/// Keeps only orders withdrawable at `now`. Rejects an empty selection with
/// `BadRequest` before any money moves, and a mixed-currency ledger with
/// `Conflict` since the transfer is denominated in a single currency.
fn select_withdrawable(
    available: Vec<Order>,
    now: DateTime<Utc>,
) -> Result<WithdrawalSelection, AppError> {
    let eligible: Vec<_> = available
        .into_iter()
        .filter(|o| o.is_withdrawable(now))
        .collect();

    let Some(first) = eligible.first() else {
        return Err(AppError::BadRequest("no withdrawable funds".to_string()));
    };

    let currency = first.currency;
    if eligible.iter().any(|o| o.currency != currency) {
        return Err(AppError::Conflict(
            "ledger mixes currencies; withdraw is per-currency".to_string(),
        ));
    }

    let total_net = eligible.iter().map(|o| net_amount(o.amount)).sum();
    Ok(WithdrawalSelection {
        orders: eligible,
        currency,
        total_net,
    })
}

/// Summary of a completed withdrawal.
#[derive(Debug, Clone, serde::Serialize)]
pub struct WithdrawalReceipt {
    pub transfer_id: String,
    pub amount: Decimal,
    pub currency: CurrencyCode,
    pub order_count: usize,
}

/// Splits completed payments and pays vendors out.
pub struct PayoutService<'a> {
    pool: &'a PgPool,
    stripe: &'a StripeClient,
}

impl<'a> PayoutService<'a> {
    /// Create a new payout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, stripe: &'a StripeClient) -> Self {
        Self { pool, stripe }
    }

    /// Handle a completed checkout session from the payment webhook.
    ///
    /// Resolves the vendor split (session row first, metadata blob as
    /// fallback), then per vendor: transfers the net 90% to the connected
    /// account and inserts a pending ledger entry whose hold expires after
    /// the vendor's `payout_hold_days`. One vendor failing is logged and
    /// skipped; the others still process.
    ///
    /// # Errors
    ///
    /// Returns an error only for database failures on the split lookup;
    /// per-vendor failures are swallowed.
    #[instrument(skip(self, session), fields(session_id = %session.id))]
    pub async fn process_completed_session(
        &self,
        session: &CheckoutSessionObject,
    ) -> Result<(), AppError> {
        let sessions = CheckoutSessionRepository::new(self.pool);
        let record = sessions.get_by_id(&session.id).await?;

        let (splits, customer_uid) = match &record {
            Some(rec) => (rec.vendor_splits.clone(), rec.customer_uid.clone()),
            None => {
                // Session row already swept; fall back to the metadata blob
                let blob = session.metadata.get("vendor_splits").ok_or_else(|| {
                    AppError::BadRequest("completed session has no split metadata".to_string())
                })?;
                let metadata_splits: Vec<MetadataSplit> =
                    serde_json::from_str(blob).map_err(|e| {
                        AppError::BadRequest(format!("malformed split metadata: {e}"))
                    })?;
                let splits = metadata_splits
                    .into_iter()
                    .map(|s| VendorSplit {
                        vendor_id: s.vendor_id,
                        amount: s.amount,
                        lines: Vec::new(),
                    })
                    .collect();
                let customer_uid = session
                    .metadata
                    .get("customer_uid")
                    .cloned()
                    .unwrap_or_default();
                (splits, customer_uid)
            }
        };

        let currency = session
            .currency
            .as_deref()
            .and_then(CurrencyCode::parse)
            .unwrap_or_default();

        let vendors = VendorRepository::new(self.pool);
        let orders = OrderRepository::new(self.pool);
        let now = Utc::now();

        for split in &splits {
            let Some(vendor) = vendors.get_by_id(split.vendor_id).await? else {
                warn!(vendor_id = %split.vendor_id, "Split references unknown vendor, skipping");
                continue;
            };
            let Some(account) = vendor.connected_account() else {
                warn!(vendor_id = %vendor.id, "Vendor has no connected account, skipping");
                continue;
            };

            let net = net_amount(split.amount);
            let Some(minor) = Money::new(net, currency).to_minor_units() else {
                warn!(vendor_id = %vendor.id, "Split amount out of range, skipping");
                continue;
            };

            let transfer = match self
                .stripe
                .create_transfer(
                    minor,
                    currency.as_stripe_str(),
                    account,
                    &format!("marketplace sale, session {}", session.id),
                )
                .await
            {
                Ok(t) => t,
                Err(e) => {
                    error!(
                        vendor_id = %vendor.id,
                        error = %e,
                        "Transfer failed for vendor split, skipping"
                    );
                    continue;
                }
            };

            let hold = Duration::days(i64::from(vendor.payout_hold_days));
            if let Err(e) = orders
                .create(
                    OrderId::generate(),
                    split.vendor_id,
                    &customer_uid,
                    split.amount,
                    currency,
                    &split.lines,
                    now,
                    now + hold,
                )
                .await
            {
                error!(
                    vendor_id = %vendor.id,
                    transfer_id = %transfer.id,
                    error = %e,
                    "Transfer succeeded but ledger insert failed"
                );
                continue;
            }

            info!(
                vendor_id = %vendor.id,
                transfer_id = %transfer.id,
                net = %net,
                "Vendor split paid"
            );
        }

        if record.is_some() {
            sessions.delete(&session.id).await?;
        }

        Ok(())
    }

    /// Withdraw all of a vendor's matured funds in one transfer.
    ///
    /// Caller has already established the vendor belongs to the requester.
    ///
    /// # Errors
    ///
    /// `Conflict` if the vendor has no connected account, `BadRequest` if
    /// no order is past its hold with `available` status.
    #[instrument(skip(self, vendor), fields(vendor_id = %vendor.id))]
    pub async fn withdraw_vendor(&self, vendor: &Vendor) -> Result<WithdrawalReceipt, AppError> {
        let account = vendor.connected_account().ok_or_else(|| {
            AppError::Conflict("vendor has no connected payment account".to_string())
        })?;

        let orders = OrderRepository::new(self.pool);
        let now = Utc::now();

        let released = orders.release_matured_holds(now).await?;
        if released > 0 {
            debug!(released, "Matured holds released before withdrawal scan");
        }

        let available = orders.list_available_for_vendor(vendor.id).await?;
        // Hold filter stays client-side; the query only filters on status.
        // The empty check runs before any transfer is created.
        let selection = select_withdrawable(available, now)?;

        let minor = Money::new(selection.total_net, selection.currency)
            .to_minor_units()
            .ok_or_else(|| AppError::Internal("withdrawal amount out of range".to_string()))?;

        let transfer = self
            .stripe
            .create_transfer(
                minor,
                selection.currency.as_stripe_str(),
                account,
                &format!("withdrawal, vendor {}", vendor.id),
            )
            .await?;

        // The transfer is already done; a failed update here leaves the row
        // still `available` with the money moved. Log and keep going.
        for order in &selection.orders {
            if let Err(e) = orders.mark_withdrawn(order.id, &transfer.id).await {
                error!(
                    order_id = %order.id,
                    transfer_id = %transfer.id,
                    error = %e,
                    "Failed to mark order withdrawn after transfer"
                );
            }
        }

        info!(
            vendor_id = %vendor.id,
            transfer_id = %transfer.id,
            amount = %selection.total_net,
            orders = selection.orders.len(),
            "Vendor withdrawal complete"
        );

        Ok(WithdrawalReceipt {
            transfer_id: transfer.id,
            amount: selection.total_net,
            currency: selection.currency,
            order_count: selection.orders.len(),
        })
    }

    /// Withdraw a single order's funds.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown orders, `Forbidden` when the order belongs to
    /// another vendor, `BadRequest` when the order is not withdrawable.
    #[instrument(skip(self, vendor), fields(vendor_id = %vendor.id, order_id = %order_id))]
    pub async fn withdraw_order(
        &self,
        vendor: &Vendor,
        order_id: OrderId,
    ) -> Result<WithdrawalReceipt, AppError> {
        let account = vendor.connected_account().ok_or_else(|| {
            AppError::Conflict("vendor has no connected payment account".to_string())
        })?;

        let orders = OrderRepository::new(self.pool);
        let now = Utc::now();

        orders.release_matured_holds(now).await?;

        let order = orders
            .get_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("order {order_id}")))?;

        if order.vendor_id != vendor.id {
            return Err(AppError::Forbidden(
                "order belongs to another vendor".to_string(),
            ));
        }
        if !order.is_withdrawable(now) {
            return Err(AppError::BadRequest(
                "order is not withdrawable".to_string(),
            ));
        }

        let net = net_amount(order.amount);
        let minor = Money::new(net, order.currency).to_minor_units().ok_or_else(|| {
            AppError::Internal("withdrawal amount out of range".to_string())
        })?;

        let transfer = self
            .stripe
            .create_transfer(
                minor,
                order.currency.as_stripe_str(),
                account,
                &format!("withdrawal, order {order_id}"),
            )
            .await?;

        if let Err(e) = orders.mark_withdrawn(order.id, &transfer.id).await {
            error!(
                order_id = %order.id,
                transfer_id = %transfer.id,
                error = %e,
                "Failed to mark order withdrawn after transfer"
            );
        }

        info!(
            order_id = %order.id,
            transfer_id = %transfer.id,
            amount = %net,
            "Order withdrawal complete"
        );

        Ok(WithdrawalReceipt {
            transfer_id: transfer.id,
            amount: net,
            currency: order.currency,
            order_count: 1,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_is_ten_percent() {
        assert_eq!(platform_fee(Decimal::new(10000, 2)), Decimal::new(1000, 2));
        assert_eq!(net_amount(Decimal::new(10000, 2)), Decimal::new(9000, 2));
    }

    #[test]
    fn test_fee_rounds_to_cents() {
        // 10% of 0.25 is 0.025, rounds away from zero to 0.03
        assert_eq!(platform_fee(Decimal::new(25, 2)), Decimal::new(3, 2));
        assert_eq!(net_amount(Decimal::new(25, 2)), Decimal::new(22, 2));
    }

    #[test]
    fn test_fee_plus_net_reproduces_gross() {
        for cents in [1i64, 25, 99, 1000, 12345, 999_999] {
            let gross = Decimal::new(cents, 2);
            assert_eq!(platform_fee(gross) + net_amount(gross), gross);
        }
    }

    #[test]
    fn test_tiny_amounts_keep_nonnegative_net() {
        let gross = Decimal::new(1, 2); // one cent
        assert_eq!(platform_fee(gross), Decimal::new(0, 2));
        assert_eq!(net_amount(gross), gross);
    }

    #[test]
    fn test_fee_rate_constant() {
        assert_eq!(PLATFORM_FEE_RATE, Decimal::new(10, 2));
    }

    use tailwater_core::{PayoutStatus, ShippingStatus, VendorId};

    fn ledger_row(cents: i64, currency: CurrencyCode, status: PayoutStatus) -> Order {
        let now = Utc::now();
        Order {
            id: OrderId::generate(),
            vendor_id: VendorId::new(1),
            customer_uid: "cust_1".to_string(),
            amount: Decimal::new(cents, 2),
            currency,
            products: vec![],
            payout_status: status,
            shipping_status: ShippingStatus::Unshipped,
            purchase_date: now - Duration::days(30),
            withdraw_available_date: now - Duration::days(1),
            stripe_transfer_id: None,
            shipment_id: None,
            tracking_number: None,
        }
    }

    #[test]
    fn test_select_rejects_empty_ledger_with_bad_request() {
        let err = select_withdrawable(vec![], Utc::now()).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_select_rejects_ledger_with_nothing_matured() {
        let rows = vec![
            ledger_row(10000, CurrencyCode::Usd, PayoutStatus::Pending),
            ledger_row(5000, CurrencyCode::Usd, PayoutStatus::Withdrawn),
        ];
        let err = select_withdrawable(rows, Utc::now()).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_select_rejects_mixed_currencies() {
        let rows = vec![
            ledger_row(10000, CurrencyCode::Usd, PayoutStatus::Available),
            ledger_row(5000, CurrencyCode::Eur, PayoutStatus::Available),
        ];
        let err = select_withdrawable(rows, Utc::now()).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_select_sums_net_of_matured_rows_only() {
        let rows = vec![
            ledger_row(10000, CurrencyCode::Usd, PayoutStatus::Available),
            ledger_row(5000, CurrencyCode::Usd, PayoutStatus::Available),
            ledger_row(99900, CurrencyCode::Usd, PayoutStatus::Pending),
        ];
        let selection = select_withdrawable(rows, Utc::now()).unwrap();
        assert_eq!(selection.orders.len(), 2);
        assert_eq!(selection.currency, CurrencyCode::Usd);
        // 90.00 + 45.00 after the 10% fee
        assert_eq!(selection.total_net, Decimal::new(13500, 2));
    }
}
