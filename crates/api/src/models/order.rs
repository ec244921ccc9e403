//! Order ledger domain types.
//!
//! An order row is the ledger entry for one vendor's share of a completed
//! checkout. Orders are created by the payment webhook, mutated by the
//! shipping flow (shipment/label fields) and the withdrawal flow (payout
//! status transition + transfer id), and never deleted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tailwater_core::{CurrencyCode, OrderId, PayoutStatus, ProductId, ShippingStatus, VendorId};

/// A single order in the ledger.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Vendor this ledger entry belongs to.
    pub vendor_id: VendorId,
    /// External UID of the purchasing customer.
    pub customer_uid: String,
    /// Gross amount for this vendor's share of the checkout.
    pub amount: Decimal,
    /// Currency of `amount`.
    pub currency: CurrencyCode,
    /// Snapshot of the purchased lines.
    pub products: Vec<OrderLine>,
    /// Payout lifecycle stage of the funds.
    pub payout_status: PayoutStatus,
    /// Shipping lifecycle stage.
    pub shipping_status: ShippingStatus,
    /// When the checkout completed.
    pub purchase_date: DateTime<Utc>,
    /// Earliest instant the funds may be withdrawn.
    pub withdraw_available_date: DateTime<Utc>,
    /// Transfer id recorded when the funds were withdrawn.
    pub stripe_transfer_id: Option<String>,
    /// Carrier shipment id, once the shipping flow has run.
    pub shipment_id: Option<String>,
    /// Carrier tracking number, once a label is purchased.
    pub tracking_number: Option<String>,
}

/// Snapshot of one purchased line at checkout time.
///
/// Stored as JSONB on the order row; prices are frozen at purchase so later
/// product edits do not rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// The product purchased.
    pub product_id: ProductId,
    /// Product name at purchase time.
    pub name: String,
    /// Unit price at purchase time.
    pub unit_price: Decimal,
    /// Quantity purchased.
    pub quantity: u32,
}

impl Order {
    /// Whether this order's funds can be withdrawn right now.
    ///
    /// Requires `payout_status == Available` and the hold date to have
    /// elapsed. This is the client-side filter the withdrawal flow applies;
    /// nothing re-checks it atomically at write time.
    #[must_use]
    pub fn is_withdrawable(&self, now: DateTime<Utc>) -> bool {
        self.payout_status == PayoutStatus::Available && self.withdraw_available_date <= now
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tailwater_core::OrderId;

    fn order(status: PayoutStatus, hold_until: DateTime<Utc>) -> Order {
        Order {
            id: OrderId::generate(),
            vendor_id: VendorId::new(1),
            customer_uid: "cust_1".to_string(),
            amount: Decimal::new(4500, 2),
            currency: CurrencyCode::Usd,
            products: vec![],
            payout_status: status,
            shipping_status: ShippingStatus::Unshipped,
            purchase_date: Utc::now() - Duration::days(30),
            withdraw_available_date: hold_until,
            stripe_transfer_id: None,
            shipment_id: None,
            tracking_number: None,
        }
    }

    #[test]
    fn test_withdrawable_when_available_and_past_hold() {
        let now = Utc::now();
        let o = order(PayoutStatus::Available, now - Duration::days(1));
        assert!(o.is_withdrawable(now));
    }

    #[test]
    fn test_not_withdrawable_while_held() {
        let now = Utc::now();
        let o = order(PayoutStatus::Available, now + Duration::days(3));
        assert!(!o.is_withdrawable(now));
    }

    #[test]
    fn test_not_withdrawable_when_pending_or_withdrawn() {
        let now = Utc::now();
        assert!(!order(PayoutStatus::Pending, now - Duration::days(1)).is_withdrawable(now));
        assert!(!order(PayoutStatus::Withdrawn, now - Duration::days(1)).is_withdrawable(now));
    }

    #[test]
    fn test_order_line_serde() {
        let line = OrderLine {
            product_id: ProductId::new(9),
            name: "Parachute Adams #14".to_string(),
            unit_price: Decimal::new(275, 2),
            quantity: 6,
        };
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["product_id"], 9);
        let back: OrderLine = serde_json::from_value(json).unwrap();
        assert_eq!(back, line);
    }
}
