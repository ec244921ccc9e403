//! Review domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use tailwater_core::{ProductId, ProductReviewId, VendorId, VendorReviewId};

/// Minimum allowed rating.
pub const MIN_RATING: i16 = 1;
/// Maximum allowed rating.
pub const MAX_RATING: i16 = 5;

/// A customer review of a product.
#[derive(Debug, Clone, Serialize)]
pub struct ProductReview {
    pub id: ProductReviewId,
    pub product_id: ProductId,
    pub customer_uid: String,
    /// Star rating, 1..=5.
    pub rating: i16,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// A customer review of a vendor's store.
#[derive(Debug, Clone, Serialize)]
pub struct VendorReview {
    pub id: VendorReviewId,
    pub vendor_id: VendorId,
    pub customer_uid: String,
    /// Star rating, 1..=5.
    pub rating: i16,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Validate a star rating is within bounds.
#[must_use]
pub const fn rating_in_bounds(rating: i16) -> bool {
    rating >= MIN_RATING && rating <= MAX_RATING
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        assert!(rating_in_bounds(1));
        assert!(rating_in_bounds(5));
        assert!(!rating_in_bounds(0));
        assert!(!rating_in_bounds(6));
        assert!(!rating_in_bounds(-3));
    }
}
