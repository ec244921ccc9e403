//! Database migration command.
//!
//! The API server never runs migrations on startup; this command is the
//! only path that applies them.
//!
//! # Usage
//!
//! ```bash
//! tw-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `TAILWATER_DATABASE_URL` - `PostgreSQL` connection string
//!
//! # Migration Files
//!
//! Migrations live in `crates/api/migrations/` and are embedded into the
//! binary at compile time.

use super::{CommandError, connect};

/// Run all pending database migrations.
///
/// # Errors
///
/// Returns an error if the environment is missing `TAILWATER_DATABASE_URL`,
/// the connection fails, or a migration fails to apply.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
