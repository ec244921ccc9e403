//! Lifecycle status enums for marketplace entities.
//!
//! Statuses are stored as lowercase text in Postgres and converted at the
//! repository boundary, so every enum here carries `as_str`/`parse` pairs.

use serde::{Deserialize, Serialize};

/// Payout lifecycle stage of an order's funds.
///
/// Intended to only ever advance `Pending -> Available -> Withdrawn`.
/// Nothing enforces this atomically: reads and writes are separate calls,
/// so concurrent withdrawals can race (known gap, see the payouts service).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PayoutStatus {
    /// Funds transferred to the vendor account but still inside the hold window.
    #[default]
    Pending,
    /// Hold window elapsed; eligible for withdrawal.
    Available,
    /// Withdrawn to the vendor's external account.
    Withdrawn,
}

impl PayoutStatus {
    /// The database/wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Available => "available",
            Self::Withdrawn => "withdrawn",
        }
    }

    /// Parse the database/wire representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "available" => Some(Self::Available),
            "withdrawn" => Some(Self::Withdrawn),
            _ => None,
        }
    }

    /// Whether `next` is a legal forward transition from `self`.
    #[must_use]
    pub const fn can_advance_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Available) | (Self::Available, Self::Withdrawn)
        )
    }
}

/// Shipping lifecycle stage of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShippingStatus {
    /// No shipment created yet.
    #[default]
    Unshipped,
    /// A label transaction has been purchased from the carrier.
    LabelPurchased,
    /// Carrier has the parcel.
    Shipped,
    /// Carrier reports delivery.
    Delivered,
}

impl ShippingStatus {
    /// The database/wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unshipped => "unshipped",
            Self::LabelPurchased => "label_purchased",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
        }
    }

    /// Parse the database/wire representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "unshipped" => Some(Self::Unshipped),
            "label_purchased" => Some(Self::LabelPurchased),
            "shipped" => Some(Self::Shipped),
            "delivered" => Some(Self::Delivered),
            _ => None,
        }
    }
}

/// Status of a vendor application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VendorRequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl VendorRequestStatus {
    /// The database/wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parse the database/wire representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// Role attached to a marketplace user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Customer,
    Vendor,
    Admin,
}

impl UserRole {
    /// The database/wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Vendor => "vendor",
            Self::Admin => "admin",
        }
    }

    /// Parse the database/wire representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "customer" => Some(Self::Customer),
            "vendor" => Some(Self::Vendor),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_payout_status_roundtrip() {
        for status in [
            PayoutStatus::Pending,
            PayoutStatus::Available,
            PayoutStatus::Withdrawn,
        ] {
            assert_eq!(PayoutStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(PayoutStatus::parse("paid"), None);
    }

    #[test]
    fn test_payout_status_only_advances_forward() {
        assert!(PayoutStatus::Pending.can_advance_to(PayoutStatus::Available));
        assert!(PayoutStatus::Available.can_advance_to(PayoutStatus::Withdrawn));

        assert!(!PayoutStatus::Available.can_advance_to(PayoutStatus::Pending));
        assert!(!PayoutStatus::Withdrawn.can_advance_to(PayoutStatus::Available));
        assert!(!PayoutStatus::Withdrawn.can_advance_to(PayoutStatus::Pending));
        assert!(!PayoutStatus::Pending.can_advance_to(PayoutStatus::Withdrawn));
    }

    #[test]
    fn test_shipping_status_roundtrip() {
        for status in [
            ShippingStatus::Unshipped,
            ShippingStatus::LabelPurchased,
            ShippingStatus::Shipped,
            ShippingStatus::Delivered,
        ] {
            assert_eq!(ShippingStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_user_role_roundtrip() {
        for role in [UserRole::Customer, UserRole::Vendor, UserRole::Admin] {
            assert_eq!(UserRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(UserRole::parse("superuser"), None);
    }

    #[test]
    fn test_serde_wire_names() {
        assert_eq!(
            serde_json::to_string(&ShippingStatus::LabelPurchased).unwrap(),
            "\"label_purchased\""
        );
        assert_eq!(
            serde_json::to_string(&PayoutStatus::Available).unwrap(),
            "\"available\""
        );
    }
}
