//! Database operations for the marketplace `PostgreSQL` instance.
//!
//! # Tables
//!
//! - `orders` - the order ledger (one row per vendor per completed checkout)
//! - `vendors` - vendor records with connected payment accounts
//! - `vendor_requests` - pending vendor applications
//! - `checkout_sessions` - ephemeral pending-cart records
//! - `products` - fly listings
//! - `product_reviews` / `vendor_reviews` - customer reviews
//! - `users` - marketplace users with bearer API tokens
//!
//! # Migrations
//!
//! Migrations live in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p tailwater-cli -- migrate
//! ```
//!
//! Repositories use the runtime query API (`sqlx::query_as::<_, Row>`) with
//! `#[derive(FromRow)]` row structs that convert into domain models through
//! `TryFrom`, surfacing bad data as [`RepositoryError::DataCorruption`].

pub mod checkout_sessions;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod users;
pub mod vendor_requests;
pub mod vendors;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use checkout_sessions::CheckoutSessionRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use reviews::ReviewRepository;
pub use users::UserRepository;
pub use vendor_requests::VendorRequestRepository;
pub use vendors::VendorRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique owner uid).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a sqlx error, converting unique violations into [`Self::Conflict`].
    pub(crate) fn from_sqlx(e: sqlx::Error, conflict_msg: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return Self::Conflict(conflict_msg.to_owned());
        }
        Self::Database(e)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
