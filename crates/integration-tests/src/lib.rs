//! Integration tests for Tailwater.
//!
//! These tests exercise the flows that cross crate boundaries without a
//! live database or network: webhook signature verification against
//! freshly signed payloads, the payout lifecycle rules, and checkout
//! session bookkeeping. Tests that need a running server belong in the
//! `tests/` directory with an `#[ignore]` attribute naming what they
//! require.
//!
//! ```bash
//! cargo test -p tailwater-integration-tests
//! ```

use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Sign `body` the way Stripe does, producing a `Stripe-Signature` header
/// value for the given unix timestamp.
///
/// # Panics
///
/// Panics if the HMAC key is rejected, which cannot happen for SHA-256.
#[must_use]
#[allow(clippy::expect_used)]
pub fn sign_payload(secret: &str, body: &str, timestamp: i64) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(format!("{timestamp}.{body}").as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());
    format!("t={timestamp},v1={signature}")
}
