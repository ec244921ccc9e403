//! Stripe REST API client.
//!
//! Covers the endpoints the marketplace needs: Checkout Sessions, Connect
//! Express accounts, onboarding links, and transfers. Requests are
//! form-encoded as the Stripe API requires.

use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::error::StripeError;
use super::types::{Account, AccountLink, CheckoutLineItem, CheckoutSession, Transfer};

/// Stripe API base URL.
const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

/// Request timeout for Stripe calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

struct StripeClientInner {
    client: reqwest::Client,
    secret_key: SecretString,
}

/// Stripe API client. Cheap to clone.
#[derive(Clone)]
pub struct StripeClient {
    inner: Arc<StripeClientInner>,
}

impl std::fmt::Debug for StripeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeClient")
            .field("secret_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

/// Stripe error envelope: `{"error": {"message": "..."}}`.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

impl StripeClient {
    /// Create a new Stripe client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(secret_key: SecretString) -> Result<Self, StripeError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StripeError::Request(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(StripeClientInner { client, secret_key }),
        })
    }

    /// Create a hosted Checkout Session.
    ///
    /// The vendor split blob rides along in `metadata[vendor_splits]` so the
    /// completion webhook can divide the payment without a second lookup.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or Stripe rejects it.
    #[instrument(skip(self, line_items, metadata), fields(lines = line_items.len()))]
    pub async fn create_checkout_session(
        &self,
        line_items: &[CheckoutLineItem],
        currency: &str,
        success_url: &str,
        cancel_url: &str,
        metadata: &[(&str, &str)],
    ) -> Result<CheckoutSession, StripeError> {
        let mut params: Vec<(String, String)> = vec![
            ("mode".to_string(), "payment".to_string()),
            ("success_url".to_string(), success_url.to_string()),
            ("cancel_url".to_string(), cancel_url.to_string()),
        ];

        for (i, item) in line_items.iter().enumerate() {
            params.push((
                format!("line_items[{i}][price_data][currency]"),
                currency.to_string(),
            ));
            params.push((
                format!("line_items[{i}][price_data][product_data][name]"),
                item.name.clone(),
            ));
            params.push((
                format!("line_items[{i}][price_data][unit_amount]"),
                item.unit_amount.to_string(),
            ));
            params.push((format!("line_items[{i}][quantity]"), item.quantity.to_string()));
        }

        for (key, value) in metadata {
            params.push((format!("metadata[{key}]"), (*value).to_string()));
        }

        let session: CheckoutSession = self.post_form("/checkout/sessions", &params).await?;

        debug!(session_id = %session.id, "Checkout session created");

        Ok(session)
    }

    /// Move funds to a vendor's connected account.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or Stripe rejects it.
    #[instrument(skip(self), fields(destination = %destination))]
    pub async fn create_transfer(
        &self,
        amount: i64,
        currency: &str,
        destination: &str,
        description: &str,
    ) -> Result<Transfer, StripeError> {
        let params: Vec<(String, String)> = vec![
            ("amount".to_string(), amount.to_string()),
            ("currency".to_string(), currency.to_string()),
            ("destination".to_string(), destination.to_string()),
            ("description".to_string(), description.to_string()),
        ];

        let transfer: Transfer = self.post_form("/transfers", &params).await?;

        debug!(transfer_id = %transfer.id, amount, "Transfer created");

        Ok(transfer)
    }

    /// Create an Express connected account for a new vendor.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or Stripe rejects it.
    #[instrument(skip(self))]
    pub async fn create_account(&self, email: &str) -> Result<Account, StripeError> {
        let params: Vec<(String, String)> = vec![
            ("type".to_string(), "express".to_string()),
            ("email".to_string(), email.to_string()),
        ];

        let account: Account = self.post_form("/accounts", &params).await?;

        debug!(account_id = %account.id, "Express account created");

        Ok(account)
    }

    /// Create a single-use onboarding link for a connected account.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or Stripe rejects it.
    #[instrument(skip(self), fields(account = %account_id))]
    pub async fn create_account_link(
        &self,
        account_id: &str,
        refresh_url: &str,
        return_url: &str,
    ) -> Result<AccountLink, StripeError> {
        let params: Vec<(String, String)> = vec![
            ("account".to_string(), account_id.to_string()),
            ("refresh_url".to_string(), refresh_url.to_string()),
            ("return_url".to_string(), return_url.to_string()),
            ("type".to_string(), "account_onboarding".to_string()),
        ];

        self.post_form("/account_links", &params).await
    }

    /// Fetch a connected account's current state.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or Stripe rejects it.
    #[instrument(skip(self), fields(account = %account_id))]
    pub async fn retrieve_account(&self, account_id: &str) -> Result<Account, StripeError> {
        let response = self
            .inner
            .client
            .get(format!("{STRIPE_API_BASE}/accounts/{account_id}"))
            .basic_auth(self.inner.secret_key.expose_secret(), None::<&str>)
            .send()
            .await
            .map_err(|e| StripeError::Request(e.to_string()))?;

        Self::handle_response(response).await
    }

    /// Execute a form-encoded POST against the Stripe API.
    async fn post_form<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<T, StripeError> {
        let response = self
            .inner
            .client
            .post(format!("{STRIPE_API_BASE}{path}"))
            .basic_auth(self.inner.secret_key.expose_secret(), None::<&str>)
            .form(params)
            .send()
            .await
            .map_err(|e| StripeError::Request(e.to_string()))?;

        Self::handle_response(response).await
    }

    /// Parse a Stripe response, surfacing the API's error message on failure.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, StripeError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| StripeError::Response(format!("Failed to parse response: {e}")));
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .and_then(|b| b.error.message)
            .unwrap_or(body);

        Err(StripeError::Api(format!("{status}: {message}")))
    }
}
