//! Checkout session domain types.
//!
//! A checkout session row is the ephemeral record of a pending multi-vendor
//! cart: it remembers how the cart total splits across vendors so the
//! payment webhook can issue per-vendor transfers after the processor
//! reports completion. Expired rows are swept by the cleanup task.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tailwater_core::VendorId;

use super::order::OrderLine;

/// One vendor's share of a pending cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorSplit {
    /// Vendor receiving this share.
    pub vendor_id: VendorId,
    /// Gross amount for this vendor before the platform fee.
    pub amount: Decimal,
    /// The purchased lines belonging to this vendor.
    pub lines: Vec<OrderLine>,
}

/// Ephemeral record of a pending checkout.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutSessionRecord {
    /// Payment-processor session id (cs_...), the primary key.
    pub id: String,
    /// External UID of the customer checking out.
    pub customer_uid: String,
    /// Per-vendor split of the cart.
    pub vendor_splits: Vec<VendorSplit>,
    /// When the session stops being honored and becomes sweepable.
    pub expires_at: DateTime<Utc>,
}

impl CheckoutSessionRecord {
    /// Whether the session has expired as of `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let session = CheckoutSessionRecord {
            id: "cs_test_1".to_string(),
            customer_uid: "cust_1".to_string(),
            vendor_splits: vec![],
            expires_at: now,
        };
        assert!(session.is_expired(now));
        assert!(!session.is_expired(now - Duration::seconds(1)));
        assert!(session.is_expired(now + Duration::seconds(1)));
    }

    #[test]
    fn test_vendor_split_serde_roundtrip() {
        let split = VendorSplit {
            vendor_id: VendorId::new(3),
            amount: Decimal::new(12550, 2),
            lines: vec![],
        };
        let json = serde_json::to_string(&split).unwrap();
        let back: VendorSplit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, split);
    }
}
