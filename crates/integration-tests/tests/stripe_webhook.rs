//! End-to-end webhook signature and payload handling.
//!
//! Signs realistic `checkout.session.completed` payloads with the same
//! scheme Stripe uses and runs them through the verification and parsing
//! path the webhook route relies on.

use chrono::Utc;
use secrecy::SecretString;
use serde_json::json;

use tailwater_api::stripe::{CheckoutSessionObject, Event, verify_signature};
use tailwater_integration_tests::sign_payload;

const SECRET: &str = "whsec_integration_test_secret";

fn secret() -> SecretString {
    SecretString::from(SECRET)
}

fn completed_session_body() -> String {
    json!({
        "id": "evt_1NG8Du2eZvKYlo2C",
        "type": "checkout.session.completed",
        "data": {
            "object": {
                "id": "cs_test_a1b2c3",
                "amount_total": 4500,
                "currency": "usd",
                "metadata": {
                    "customer_uid": "cust_42",
                    "vendor_splits": "[{\"vendor_id\":7,\"amount\":\"45.00\"}]"
                }
            }
        }
    })
    .to_string()
}

// ============================================================================
// Signature Verification
// ============================================================================

#[test]
fn test_freshly_signed_payload_verifies() {
    let body = completed_session_body();
    let header = sign_payload(SECRET, &body, Utc::now().timestamp());

    assert!(verify_signature(&secret(), &header, &body).is_ok());
}

#[test]
fn test_tampered_body_is_rejected() {
    let body = completed_session_body();
    let header = sign_payload(SECRET, &body, Utc::now().timestamp());

    let tampered = body.replace("4500", "1");
    assert!(verify_signature(&secret(), &header, &tampered).is_err());
}

#[test]
fn test_replayed_old_signature_is_rejected() {
    let body = completed_session_body();
    // Well past the 5 minute tolerance window.
    let header = sign_payload(SECRET, &body, Utc::now().timestamp() - 3600);

    assert!(verify_signature(&secret(), &header, &body).is_err());
}

#[test]
fn test_signature_from_wrong_secret_is_rejected() {
    let body = completed_session_body();
    let header = sign_payload("whsec_other", &body, Utc::now().timestamp());

    assert!(verify_signature(&secret(), &header, &body).is_err());
}

// ============================================================================
// Payload Parsing
// ============================================================================

#[test]
#[allow(clippy::unwrap_used)]
fn test_completed_event_parses_into_session_object() {
    let body = completed_session_body();

    let event: Event = serde_json::from_str(&body).unwrap();
    assert_eq!(event.event_type, "checkout.session.completed");

    let session: CheckoutSessionObject = serde_json::from_value(event.data.object).unwrap();
    assert_eq!(session.id, "cs_test_a1b2c3");
    assert_eq!(session.amount_total, Some(4500));
    assert_eq!(
        session.metadata.get("customer_uid").map(String::as_str),
        Some("cust_42")
    );
}

#[test]
#[allow(clippy::unwrap_used)]
fn test_unrelated_event_type_still_parses() {
    // The route acknowledges unknown event types with a 200; they must at
    // least deserialize.
    let body = json!({
        "id": "evt_2",
        "type": "payment_intent.succeeded",
        "data": { "object": { "id": "pi_123" } }
    })
    .to_string();

    let event: Event = serde_json::from_str(&body).unwrap();
    assert_eq!(event.event_type, "payment_intent.succeeded");
}
