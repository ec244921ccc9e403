//! User and API token management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create a new customer and print their token
//! tw-cli token create -e angler@example.com
//!
//! # Create an admin
//! tw-cli token create -e ops@example.com -r admin
//!
//! # Rotate a token (the old token stops working immediately)
//! tw-cli token rotate -u <uid>
//! ```
//!
//! # Environment Variables
//!
//! - `TAILWATER_DATABASE_URL` - `PostgreSQL` connection string

use rand::Rng;
use rand::distr::Alphanumeric;
use uuid::Uuid;

use tailwater_api::db::{RepositoryError, UserRepository};
use tailwater_core::{Email, UserRole};

use super::{CommandError, connect};

const TOKEN_LENGTH: usize = 48;

/// Generate a fresh alphanumeric API token.
fn generate_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Create a new user and print their API token.
///
/// # Errors
///
/// Returns an error if the email or role is invalid, a user with the email
/// already exists, or the database is unreachable.
pub async fn create(email: &str, role: &str) -> Result<(), CommandError> {
    let role = UserRole::parse(role).ok_or_else(|| CommandError::InvalidRole(role.to_owned()))?;
    let email =
        Email::parse(email).map_err(|_| CommandError::InvalidEmail(email.to_owned()))?;

    let pool = connect().await?;
    let users = UserRepository::new(&pool);

    let uid = Uuid::new_v4().to_string();
    let token = generate_token();

    let user = match users.create(&uid, &email, role, &token).await {
        Ok(user) => user,
        Err(RepositoryError::Conflict(_)) => {
            return Err(CommandError::UserExists(email.as_str().to_owned()));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!("Created {} user: {}", role.as_str(), user.email.as_str());

    #[allow(clippy::print_stdout)]
    {
        println!("uid:   {uid}");
        println!("token: {token}");
    }
    Ok(())
}

/// Rotate the API token for an existing user and print the new one.
///
/// # Errors
///
/// Returns an error if no user matches the uid or the database is
/// unreachable.
pub async fn rotate(uid: &str) -> Result<(), CommandError> {
    let pool = connect().await?;
    let users = UserRepository::new(&pool);

    let token = generate_token();

    match users.set_api_token(uid, &token).await {
        Ok(_) => {}
        Err(RepositoryError::NotFound) => {
            return Err(CommandError::UserNotFound(uid.to_owned()));
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!("Rotated token for uid {uid}");

    #[allow(clippy::print_stdout)]
    {
        println!("token: {token}");
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_tokens_are_unique_and_sized() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), TOKEN_LENGTH);
        assert_eq!(b.len(), TOKEN_LENGTH);
        assert_ne!(a, b);
        assert!(a.chars().all(char::is_alphanumeric));
    }
}
