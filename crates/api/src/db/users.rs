//! User lookup and account management.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use tailwater_core::{Email, UserId, UserRole};

use super::RepositoryError;
use crate::models::user::User;

const USER_COLUMNS: &str = "id, uid, email, role, created_at";

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    uid: String,
    email: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("user {} has invalid email: {e}", row.id))
        })?;
        let role = UserRole::parse(&row.role).ok_or_else(|| {
            RepositoryError::DataCorruption(format!(
                "user {} has unknown role {:?}",
                row.id, row.role
            ))
        })?;

        Ok(Self {
            id: UserId::new(row.id),
            uid: row.uid,
            email,
            role,
            created_at: row.created_at,
        })
    }
}

/// Repository for the `users` table.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look up the user owning an API token. Returns `None` for unknown
    /// tokens so the auth layer can map it to 401 rather than 404.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_api_token(&self, token: &str) -> Result<Option<User>, RepositoryError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE api_token = $1");
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(token)
            .fetch_optional(self.pool)
            .await?;

        row.map(User::try_from).transpose()
    }

    /// Look up a user by external identity uid.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such user exists.
    pub async fn get_by_uid(&self, uid: &str) -> Result<User, RepositoryError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE uid = $1");
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(uid)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Create a user with an initial API token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the uid or email is taken.
    pub async fn create(
        &self,
        uid: &str,
        email: &Email,
        role: UserRole,
        api_token: &str,
    ) -> Result<User, RepositoryError> {
        let query = format!(
            "INSERT INTO users (uid, email, role, api_token) \
             VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(uid)
            .bind(email.as_str())
            .bind(role.as_str())
            .bind(api_token)
            .fetch_one(self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "user already exists"))?;

        row.try_into()
    }

    /// Change a user's role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such user exists.
    pub async fn set_role(&self, uid: &str, role: UserRole) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE users SET role = $2 WHERE uid = $1")
            .bind(uid)
            .bind(role.as_str())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Rotate a user's API token, returning the updated record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such user exists.
    pub async fn set_api_token(
        &self,
        uid: &str,
        api_token: &str,
    ) -> Result<User, RepositoryError> {
        let query = format!(
            "UPDATE users SET api_token = $2 WHERE uid = $1 RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(uid)
            .bind(api_token)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }
}
