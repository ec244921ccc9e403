//! Payout lifecycle rules: status transitions, hold dates, and fee math.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;

use tailwater_api::models::{Order, OrderLine};
use tailwater_api::services::{net_amount, platform_fee};
use tailwater_core::{
    CurrencyCode, OrderId, PayoutStatus, ProductId, ShippingStatus, VendorId,
};

fn ledger_entry(status: PayoutStatus, hold: Duration) -> Order {
    let now = Utc::now();
    Order {
        id: OrderId::generate(),
        vendor_id: VendorId::new(3),
        customer_uid: "cust_9".to_string(),
        amount: Decimal::new(1250, 2),
        currency: CurrencyCode::Usd,
        products: vec![OrderLine {
            product_id: ProductId::new(11),
            name: "Royal Wulff #12".to_string(),
            unit_price: Decimal::new(1250, 2),
            quantity: 1,
        }],
        payout_status: status,
        shipping_status: ShippingStatus::Unshipped,
        purchase_date: now - Duration::days(10),
        withdraw_available_date: now + hold,
        stripe_transfer_id: None,
        shipment_id: None,
        tracking_number: None,
    }
}

// ============================================================================
// Status Transitions
// ============================================================================

#[test]
fn test_payout_status_only_moves_forward() {
    assert!(PayoutStatus::Pending.can_advance_to(PayoutStatus::Available));
    assert!(PayoutStatus::Available.can_advance_to(PayoutStatus::Withdrawn));

    assert!(!PayoutStatus::Available.can_advance_to(PayoutStatus::Pending));
    assert!(!PayoutStatus::Withdrawn.can_advance_to(PayoutStatus::Available));
    assert!(!PayoutStatus::Pending.can_advance_to(PayoutStatus::Withdrawn));
}

// ============================================================================
// Withdrawability
// ============================================================================

#[test]
fn test_available_funds_past_hold_are_withdrawable() {
    let order = ledger_entry(PayoutStatus::Available, Duration::days(-1));
    assert!(order.is_withdrawable(Utc::now()));
}

#[test]
fn test_funds_still_on_hold_are_not_withdrawable() {
    let order = ledger_entry(PayoutStatus::Available, Duration::days(3));
    assert!(!order.is_withdrawable(Utc::now()));
}

#[test]
fn test_pending_and_withdrawn_funds_are_not_withdrawable() {
    let now = Utc::now();
    assert!(!ledger_entry(PayoutStatus::Pending, Duration::days(-1)).is_withdrawable(now));
    assert!(!ledger_entry(PayoutStatus::Withdrawn, Duration::days(-1)).is_withdrawable(now));
}

// ============================================================================
// Fee Math
// ============================================================================

#[test]
fn test_fee_and_net_recombine_to_gross() {
    for cents in [1_i64, 99, 100, 1234, 4500, 99_999, 1_000_000] {
        let gross = Decimal::new(cents, 2);
        assert_eq!(platform_fee(gross) + net_amount(gross), gross, "gross {gross}");
    }
}

#[test]
fn test_vendor_keeps_ninety_percent_of_round_amounts() {
    let gross = Decimal::new(10_000, 2); // 100.00
    assert_eq!(platform_fee(gross), Decimal::new(1_000, 2));
    assert_eq!(net_amount(gross), Decimal::new(9_000, 2));
}
