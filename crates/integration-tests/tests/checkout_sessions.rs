//! Checkout session bookkeeping across the checkout and webhook flows.
//!
//! The checkout flow persists a session row with the per-vendor split of
//! the cart; the webhook later reads it back (or falls back to the split
//! metadata stored on the payment session). These tests pin the formats
//! both sides must agree on.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;

use tailwater_api::models::{CheckoutSessionRecord, OrderLine, VendorSplit};
use tailwater_core::{ProductId, VendorId};

fn split(vendor: i32, amount: Decimal) -> VendorSplit {
    VendorSplit {
        vendor_id: VendorId::new(vendor),
        amount,
        lines: vec![OrderLine {
            product_id: ProductId::new(1),
            name: "Griffith's Gnat #18".to_string(),
            unit_price: amount,
            quantity: 1,
        }],
    }
}

#[test]
fn test_fresh_session_is_not_expired() {
    let session = CheckoutSessionRecord {
        id: "cs_test_fresh".to_string(),
        customer_uid: "cust_1".to_string(),
        vendor_splits: vec![split(1, Decimal::new(500, 2))],
        expires_at: Utc::now() + Duration::minutes(30),
    };
    assert!(!session.is_expired(Utc::now()));
    assert!(session.is_expired(Utc::now() + Duration::minutes(31)));
}

#[test]
#[allow(clippy::unwrap_used)]
fn test_vendor_splits_survive_a_json_round_trip() {
    // The splits column is JSONB; the webhook deserializes exactly what the
    // checkout flow serialized.
    let splits = vec![
        split(1, Decimal::new(850, 2)),
        split(2, Decimal::new(1200, 2)),
    ];

    let stored = serde_json::to_string(&splits).unwrap();
    let loaded: Vec<VendorSplit> = serde_json::from_str(&stored).unwrap();
    assert_eq!(loaded, splits);
}

#[test]
#[allow(clippy::unwrap_used)]
fn test_split_amounts_serialize_as_decimal_strings() {
    // Amounts must not pass through floating point on the way to JSONB.
    let value = serde_json::to_value(split(1, Decimal::new(1995, 2))).unwrap();
    assert_eq!(value["amount"], serde_json::json!("19.95"));
}
