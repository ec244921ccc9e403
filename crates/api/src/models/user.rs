//! Marketplace user domain type.

use chrono::{DateTime, Utc};

use tailwater_core::{Email, UserId, UserRole};

/// A marketplace user resolved from a bearer API token.
///
/// Session management is out of scope; the API authenticates every request
/// with a long-lived token minted by `tw-cli token create`.
#[derive(Debug, Clone)]
pub struct User {
    /// Database ID.
    pub id: UserId,
    /// External UID (stable across systems, used on orders and vendors).
    pub uid: String,
    /// Email address.
    pub email: Email,
    /// Role controlling endpoint access.
    pub role: UserRole,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Whether the user may act for vendor-gated endpoints.
    #[must_use]
    pub const fn is_vendor(&self) -> bool {
        matches!(self.role, UserRole::Vendor | UserRole::Admin)
    }

    /// Whether the user holds the admin role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Admin)
    }
}
