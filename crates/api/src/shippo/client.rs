//! Shippo REST API client.

use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, instrument};

use super::error::ShippoError;
use super::types::{Address, Parcel, Shipment, Transaction};

/// Shippo API base URL.
const SHIPPO_API_BASE: &str = "https://api.goshippo.com";

/// Request timeout for carrier calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

struct ShippoClientInner {
    client: reqwest::Client,
    /// Server-side fallback token. Label purchases normally use the
    /// caller's own key instead.
    server_token: Option<SecretString>,
}

/// Shippo API client. Cheap to clone.
#[derive(Clone)]
pub struct ShippoClient {
    inner: Arc<ShippoClientInner>,
}

impl std::fmt::Debug for ShippoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShippoClient")
            .field("server_token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct ShipmentRequest<'a> {
    address_from: &'a Address,
    address_to: &'a Address,
    parcels: Vec<&'a Parcel>,
    /// `false` asks Shippo to generate rates synchronously.
    r#async: bool,
}

#[derive(Serialize)]
struct TransactionRequest<'a> {
    rate: &'a str,
    label_file_type: &'a str,
    /// `false` asks Shippo to process the purchase synchronously.
    r#async: bool,
}

impl ShippoClient {
    /// Create a new Shippo client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(server_token: Option<SecretString>) -> Result<Self, ShippoError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ShippoError::Request(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(ShippoClientInner {
                client,
                server_token,
            }),
        })
    }

    /// Create a shipment and return it with rate quotes attached.
    ///
    /// Addresses and parcel are validated before any network call.
    ///
    /// # Errors
    ///
    /// Returns [`ShippoError::Validation`] on bad input, or a request/API
    /// error from the carrier.
    #[instrument(skip_all)]
    pub async fn create_shipment(
        &self,
        address_from: &Address,
        address_to: &Address,
        parcel: &Parcel,
    ) -> Result<Shipment, ShippoError> {
        address_from.validate("from")?;
        address_to.validate("to")?;
        parcel.validate()?;

        let request = ShipmentRequest {
            address_from,
            address_to,
            parcels: vec![parcel],
            r#async: false,
        };

        let token = self.server_token()?;
        let shipment: Shipment = self
            .post_json("/shipments", &request, token.expose_secret())
            .await?;

        debug!(
            shipment_id = %shipment.object_id,
            rate_count = shipment.rates.len(),
            "Shipment created"
        );

        Ok(shipment)
    }

    /// Purchase a label for a previously quoted rate.
    ///
    /// `api_key` is the caller's own carrier key; when `None`, falls back
    /// to the server token.
    ///
    /// # Errors
    ///
    /// Returns [`ShippoError::MissingToken`] when no key is available,
    /// [`ShippoError::Api`] with the carrier's message when the purchase
    /// fails.
    #[instrument(skip(self, api_key), fields(rate_id = %rate_id))]
    pub async fn purchase_transaction(
        &self,
        rate_id: &str,
        api_key: Option<&SecretString>,
    ) -> Result<Transaction, ShippoError> {
        let request = TransactionRequest {
            rate: rate_id,
            label_file_type: "PDF",
            r#async: false,
        };

        let token = match api_key {
            Some(key) => key,
            None => self.server_token()?,
        };

        let transaction: Transaction = self
            .post_json("/transactions", &request, token.expose_secret())
            .await?;

        if transaction.status == "ERROR" {
            let message = transaction
                .messages
                .iter()
                .find_map(|m| m.text.clone())
                .unwrap_or_else(|| "label purchase failed".to_string());
            return Err(ShippoError::Api(message));
        }

        debug!(
            transaction_id = %transaction.object_id,
            status = %transaction.status,
            "Label transaction created"
        );

        Ok(transaction)
    }

    fn server_token(&self) -> Result<&SecretString, ShippoError> {
        self.inner
            .server_token
            .as_ref()
            .ok_or(ShippoError::MissingToken)
    }

    /// Execute a JSON POST against the Shippo API with the given token.
    async fn post_json<T: serde::de::DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        token: &str,
    ) -> Result<T, ShippoError> {
        let response = self
            .inner
            .client
            .post(format!("{SHIPPO_API_BASE}{path}"))
            .header("Authorization", format!("ShippoToken {token}"))
            .json(body)
            .send()
            .await
            .map_err(|e| ShippoError::Request(e.to_string()))?;

        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| ShippoError::Response(format!("Failed to parse response: {e}")));
        }

        let body = response.text().await.unwrap_or_default();
        Err(ShippoError::Api(format!("{status}: {body}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_request_wire_format() {
        let request = TransactionRequest {
            rate: "rate_123",
            label_file_type: "PDF",
            r#async: false,
        };

        let value = serde_json::to_value(&request).unwrap();
        // `async: false` is what requests synchronous label processing
        assert_eq!(value["async"], serde_json::json!(false));
        assert_eq!(value["rate"], serde_json::json!("rate_123"));
        assert_eq!(value["label_file_type"], serde_json::json!("PDF"));
    }
}
