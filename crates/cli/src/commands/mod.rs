//! CLI command implementations.

pub mod migrate;
pub mod seed;
pub mod token;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

use tailwater_api::db::{self, RepositoryError};

/// Errors shared by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Repository error.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Migration error.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Invalid role supplied on the command line.
    #[error("Invalid role: {0}. Valid roles: customer, vendor, admin")]
    InvalidRole(String),

    /// Invalid email supplied on the command line.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// User already exists.
    #[error("User already exists with email: {0}")]
    UserExists(String),

    /// No user matched the given uid.
    #[error("No user found with uid: {0}")]
    UserNotFound(String),
}

/// Connect to the database named by `TAILWATER_DATABASE_URL`.
pub async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("TAILWATER_DATABASE_URL")
        .map_err(|_| CommandError::MissingEnvVar("TAILWATER_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    Ok(db::create_pool(&SecretString::from(database_url)).await?)
}
