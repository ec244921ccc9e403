//! `Stripe-Signature` verification for incoming webhook requests.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use tracing::debug;

use super::error::StripeError;
use super::types::{CheckoutSessionObject, Event};

/// Maximum allowed skew between the signed timestamp and now, in seconds.
const TOLERANCE_SECS: i64 = 300;

/// Verify a `Stripe-Signature` header against the raw request body.
///
/// The header carries `t=<unix ts>,v1=<hex hmac>` pairs; the signed payload
/// is `"{t}.{body}"`. Rejects timestamps outside the replay window before
/// checking any signature.
///
/// # Errors
///
/// Returns [`StripeError::InvalidSignature`] if the header is malformed,
/// the timestamp is stale, or no `v1` entry matches.
pub fn verify_signature(
    webhook_secret: &SecretString,
    header: &str,
    body: &str,
) -> Result<(), StripeError> {
    let now_secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_err(|e| StripeError::InvalidSignature(e.to_string()))?
        .as_secs();
    let now = i64::try_from(now_secs)
        .map_err(|_| StripeError::InvalidSignature("System time overflow".to_string()))?;

    verify_signature_at(webhook_secret, header, body, now)
}

fn verify_signature_at(
    webhook_secret: &SecretString,
    header: &str,
    body: &str,
    now: i64,
) -> Result<(), StripeError> {
    let mut timestamp: Option<&str> = None;
    let mut candidates: Vec<&str> = Vec::new();

    for pair in header.split(',') {
        match pair.trim().split_once('=') {
            Some(("t", value)) => timestamp = Some(value),
            Some(("v1", value)) => candidates.push(value),
            // Unknown scheme versions are ignored, matching Stripe's guidance
            _ => {}
        }
    }

    let timestamp = timestamp
        .ok_or_else(|| StripeError::InvalidSignature("Missing timestamp".to_string()))?;
    if candidates.is_empty() {
        return Err(StripeError::InvalidSignature(
            "Missing v1 signature".to_string(),
        ));
    }

    let ts: i64 = timestamp
        .parse()
        .map_err(|_| StripeError::InvalidSignature("Invalid timestamp".to_string()))?;

    if (now - ts).abs() > TOLERANCE_SECS {
        return Err(StripeError::InvalidSignature(
            "Request timestamp too old".to_string(),
        ));
    }

    let signed_payload = format!("{timestamp}.{body}");

    let mut mac = Hmac::<Sha256>::new_from_slice(webhook_secret.expose_secret().as_bytes())
        .map_err(|e| StripeError::InvalidSignature(e.to_string()))?;
    mac.update(signed_payload.as_bytes());
    let expected = hex::encode(mac.finalize().into_bytes());

    if !candidates
        .iter()
        .any(|candidate| constant_time_compare(&expected, candidate))
    {
        return Err(StripeError::InvalidSignature(
            "Signature mismatch".to_string(),
        ));
    }

    debug!("Stripe signature verified");

    Ok(())
}

/// Parse a signature-verified webhook body into an [`Event`].
///
/// # Errors
///
/// Returns [`StripeError::InvalidPayload`] if the body is not a valid
/// event envelope.
pub fn parse_event(body: &str) -> Result<Event, StripeError> {
    serde_json::from_str(body).map_err(|e| StripeError::InvalidPayload(e.to_string()))
}

/// Extract the checkout session object from a completed-checkout event.
///
/// # Errors
///
/// Returns [`StripeError::InvalidPayload`] if the event's data object is
/// not a checkout session.
pub fn parse_checkout_session(event: Event) -> Result<CheckoutSessionObject, StripeError> {
    serde_json::from_value(event.data.object)
        .map_err(|e| StripeError::InvalidPayload(e.to_string()))
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_secret";

    fn sign(timestamp: i64, body: &str) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(SECRET.as_bytes()).unwrap();
        mac.update(format!("{timestamp}.{body}").as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    fn secret() -> SecretString {
        SecretString::from(SECRET.to_string())
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc", "abc"));
        assert!(!constant_time_compare("abc", "abd"));
        assert!(!constant_time_compare("abc", "abcd"));
    }

    #[test]
    fn test_valid_signature() {
        let now = 1_700_000_000;
        let body = r#"{"id":"evt_1"}"#;
        let header = format!("t={now},v1={}", sign(now, body));

        assert!(verify_signature_at(&secret(), &header, body, now).is_ok());
    }

    #[test]
    fn test_valid_signature_among_multiple_v1() {
        let now = 1_700_000_000;
        let body = "{}";
        let header = format!("t={now},v1=deadbeef,v1={}", sign(now, body));

        assert!(verify_signature_at(&secret(), &header, body, now).is_ok());
    }

    #[test]
    fn test_signature_mismatch() {
        let now = 1_700_000_000;
        let header = format!("t={now},v1={}", sign(now, "original"));

        let result = verify_signature_at(&secret(), &header, "tampered", now);
        assert!(matches!(result, Err(StripeError::InvalidSignature(_))));
    }

    #[test]
    fn test_stale_timestamp_rejected() {
        let now = 1_700_000_000;
        let old = now - TOLERANCE_SECS - 1;
        let body = "{}";
        let header = format!("t={old},v1={}", sign(old, body));

        let result = verify_signature_at(&secret(), &header, body, now);
        assert!(matches!(result, Err(StripeError::InvalidSignature(_))));
    }

    #[test]
    fn test_timestamp_within_tolerance_accepted() {
        let now = 1_700_000_000;
        let recent = now - TOLERANCE_SECS;
        let body = "{}";
        let header = format!("t={recent},v1={}", sign(recent, body));

        assert!(verify_signature_at(&secret(), &header, body, now).is_ok());
    }

    #[test]
    fn test_malformed_header() {
        let result = verify_signature_at(&secret(), "not-a-header", "{}", 0);
        assert!(matches!(result, Err(StripeError::InvalidSignature(_))));

        let result = verify_signature_at(&secret(), "t=123", "{}", 123);
        assert!(matches!(result, Err(StripeError::InvalidSignature(_))));

        let result = verify_signature_at(&secret(), "v1=abc", "{}", 0);
        assert!(matches!(result, Err(StripeError::InvalidSignature(_))));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let now = 1_700_000_000;
        let body = "{}";
        let header = format!("t={now},v1={}", sign(now, body));

        let other = SecretString::from("whsec_other".to_string());
        let result = verify_signature_at(&other, &header, body, now);
        assert!(matches!(result, Err(StripeError::InvalidSignature(_))));
    }

    #[test]
    fn test_parse_event_roundtrip() {
        let body = r#"{
            "id": "evt_1",
            "type": "checkout.session.completed",
            "data": { "object": { "id": "cs_test_123", "currency": "usd" } }
        }"#;

        let event = parse_event(body).unwrap();
        assert_eq!(event.event_type, "checkout.session.completed");

        let session = parse_checkout_session(event).unwrap();
        assert_eq!(session.id, "cs_test_123");
    }

    #[test]
    fn test_parse_event_rejects_malformed_body() {
        let result = parse_event("not json");
        assert!(matches!(result, Err(StripeError::InvalidPayload(_))));
    }

    #[test]
    fn test_parse_checkout_session_requires_session_object() {
        // Valid envelope, but the data object is missing the session id
        let event = parse_event(r#"{"id":"evt_2","type":"x","data":{"object":{}}}"#).unwrap();
        let result = parse_checkout_session(event);
        assert!(matches!(result, Err(StripeError::InvalidPayload(_))));
    }
}
