//! Vendor and vendor-application domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use tailwater_core::{VendorId, VendorRequestId, VendorRequestStatus};

/// A marketplace vendor with a connected payment account.
#[derive(Debug, Clone, Serialize)]
pub struct Vendor {
    /// Unique vendor ID.
    pub id: VendorId,
    /// External UID of the owning user.
    pub owner_uid: String,
    /// Public store name.
    pub store_name: String,
    /// Connected Stripe account id (acct_...), once created.
    pub stripe_account_id: Option<String>,
    /// Whether Stripe onboarding has been completed.
    pub has_stripe_onboarding: bool,
    /// Days funds are held before becoming withdrawable.
    pub payout_hold_days: i32,
    /// When the vendor was created.
    pub created_at: DateTime<Utc>,
    /// When the vendor was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Vendor {
    /// The connected account id, or an error message suitable for a 409.
    ///
    /// Transfers and onboarding links both require a connected account.
    #[must_use]
    pub fn connected_account(&self) -> Option<&str> {
        self.stripe_account_id.as_deref()
    }
}

/// A pending vendor application.
///
/// Promoted to a [`Vendor`] on admin approval; never deleted.
#[derive(Debug, Clone, Serialize)]
pub struct VendorRequest {
    /// Unique request ID.
    pub id: VendorRequestId,
    /// External UID of the applying user.
    pub owner_uid: String,
    /// Requested store name.
    pub store_name: String,
    /// Free-form application message.
    pub message: String,
    /// Application status.
    pub status: VendorRequestStatus,
    /// When the application was filed.
    pub created_at: DateTime<Utc>,
    /// When the application was last updated.
    pub updated_at: DateTime<Utc>,
}
