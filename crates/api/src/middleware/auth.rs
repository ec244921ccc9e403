//! Authentication extractors.
//!
//! API callers hold bearer tokens resolved against the `users` table.
//! Admin endpoints are gated by a shared secret header instead; see
//! [`RequireAdmin`].

use axum::{extract::FromRequestParts, http::request::Parts};
use secrecy::ExposeSecret;

use crate::db::{UserRepository, VendorRepository};
use crate::error::AppError;
use crate::models::{User, Vendor};
use crate::state::AppState;

/// Header carrying the admin shared secret.
const ADMIN_SECRET_HEADER: &str = "x-admin-secret";

/// Extractor requiring a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(CurrentUser(user): CurrentUser) -> impl IntoResponse {
///     format!("hello {}", user.uid)
/// }
/// ```
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))?;

        let user = UserRepository::new(state.pool())
            .get_by_api_token(token)
            .await?
            .ok_or_else(|| AppError::Unauthorized("invalid API token".to_string()))?;

        Ok(Self(user))
    }
}

/// Extractor requiring a vendor-role user who owns a store.
pub struct CurrentVendor {
    pub user: User,
    pub vendor: Vendor,
}

impl FromRequestParts<AppState> for CurrentVendor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;

        if !user.is_vendor() {
            return Err(AppError::Forbidden(
                "vendor account required".to_string(),
            ));
        }

        let vendor = VendorRepository::new(state.pool())
            .get_by_owner(&user.uid)
            .await?
            .ok_or_else(|| AppError::Forbidden("no store for this account".to_string()))?;

        Ok(Self { user, vendor })
    }
}

/// Extractor gating admin endpoints on the shared `x-admin-secret` header.
///
/// The comparison is constant-time.
pub struct RequireAdmin;

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let supplied = parts
            .headers
            .get(ADMIN_SECRET_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("missing admin secret".to_string()))?;

        let expected = state.config().admin_secret.expose_secret();
        if !constant_time_compare(expected, supplied) {
            return Err(AppError::Unauthorized("invalid admin secret".to_string()));
        }

        Ok(Self)
    }
}

/// Pull the token out of an `Authorization: Bearer ...` header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/v1/orders");
        if let Some(v) = value {
            builder = builder.header("authorization", v);
        }
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[test]
    fn test_bearer_token_extraction() {
        let parts = parts_with_auth(Some("Bearer tok_abc123"));
        assert_eq!(bearer_token(&parts), Some("tok_abc123"));
    }

    #[test]
    fn test_bearer_token_missing_or_malformed() {
        assert_eq!(bearer_token(&parts_with_auth(None)), None);
        assert_eq!(bearer_token(&parts_with_auth(Some("Basic abc"))), None);
        assert_eq!(bearer_token(&parts_with_auth(Some("Bearer "))), None);
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("secret", "secret"));
        assert!(!constant_time_compare("secret", "secreT"));
        assert!(!constant_time_compare("secret", "secrets"));
    }
}
