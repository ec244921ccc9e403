//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ApiConfig;
use crate::error::AppError;
use crate::shippo::ShippoClient;
use crate::stripe::StripeClient;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: PgPool,
    stripe: StripeClient,
    shippo: ShippoClient,
}

impl AppState {
    /// Create a new application state, building the external API clients
    /// from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client fails to build.
    pub fn new(config: ApiConfig, pool: PgPool) -> Result<Self, AppError> {
        let stripe = StripeClient::new(config.stripe.secret_key.clone())?;
        let shippo = ShippoClient::new(config.shippo.api_token.clone())?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                stripe,
                shippo,
            }),
        })
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the Stripe client.
    #[must_use]
    pub fn stripe(&self) -> &StripeClient {
        &self.inner.stripe
    }

    /// Get a reference to the Shippo client.
    #[must_use]
    pub fn shippo(&self) -> &ShippoClient {
        &self.inner.shippo
    }
}
