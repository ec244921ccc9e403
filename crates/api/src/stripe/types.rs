//! Typed subsets of the Stripe API objects the marketplace uses.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One cart line in a Checkout Session request.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutLineItem {
    /// Display name for the hosted checkout page.
    pub name: String,
    /// Unit price in the currency's minor units.
    pub unit_amount: i64,
    /// Quantity purchased.
    pub quantity: i64,
}

/// A created Checkout Session.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    /// Session id (`cs_...`).
    pub id: String,
    /// Hosted checkout redirect URL. Absent once the session completes.
    pub url: Option<String>,
}

/// The `checkout.session` object carried in a completed-session event.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSessionObject {
    /// Session id (`cs_...`).
    pub id: String,
    /// Metadata attached at session creation.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    /// Total charged, in minor units.
    pub amount_total: Option<i64>,
    /// Lowercase ISO currency code.
    pub currency: Option<String>,
}

/// A transfer to a connected account.
#[derive(Debug, Clone, Deserialize)]
pub struct Transfer {
    /// Transfer id (`tr_...`).
    pub id: String,
    /// Amount moved, in minor units.
    pub amount: i64,
    /// Lowercase ISO currency code.
    pub currency: String,
    /// Destination connected account id.
    pub destination: String,
}

/// A Connect account.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    /// Account id (`acct_...`).
    pub id: String,
    /// Whether the account can accept charges.
    #[serde(default)]
    pub charges_enabled: bool,
    /// Whether onboarding details have been submitted.
    #[serde(default)]
    pub details_submitted: bool,
}

/// A hosted onboarding link for a Connect account.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountLink {
    /// Single-use onboarding URL.
    pub url: String,
}

/// A webhook event envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    /// Event id (`evt_...`).
    pub id: String,
    /// Event type, e.g. `checkout.session.completed`.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Event payload.
    pub data: EventData,
}

/// The `data` field of a webhook event.
#[derive(Debug, Clone, Deserialize)]
pub struct EventData {
    /// The API object the event describes, kept raw until the event type
    /// is known.
    pub object: serde_json::Value,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_event_deserializes_completed_session() {
        let payload = serde_json::json!({
            "id": "evt_1",
            "type": "checkout.session.completed",
            "data": {
                "object": {
                    "id": "cs_test_123",
                    "metadata": { "vendor_splits": "[]" },
                    "amount_total": 4250,
                    "currency": "usd"
                }
            }
        });

        let event: Event = serde_json::from_value(payload).unwrap();
        assert_eq!(event.event_type, "checkout.session.completed");

        let session: CheckoutSessionObject =
            serde_json::from_value(event.data.object).unwrap();
        assert_eq!(session.id, "cs_test_123");
        assert_eq!(session.amount_total, Some(4250));
        assert_eq!(session.metadata.get("vendor_splits").unwrap(), "[]");
    }

    #[test]
    fn test_session_object_tolerates_missing_metadata() {
        let session: CheckoutSessionObject =
            serde_json::from_value(serde_json::json!({ "id": "cs_1" })).unwrap();
        assert!(session.metadata.is_empty());
        assert!(session.amount_total.is_none());
    }
}
