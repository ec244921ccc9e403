//! Product catalog domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tailwater_core::{CurrencyCode, ProductId, VendorId};

/// A fly listing in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Vendor who listed the product.
    pub vendor_id: VendorId,
    /// Display name (e.g. "Elk Hair Caddis #16").
    pub name: String,
    /// Listing description.
    pub description: String,
    /// Unit price.
    pub price: Decimal,
    /// Currency of `price`.
    pub currency: Currency,
    /// Category tags. The wire name `catagories` is misspelled upstream and
    /// preserved for compatibility.
    #[serde(rename = "catagories")]
    pub categories: Vec<String>,
    /// Units in stock.
    pub stock: i32,
    /// When the listing was created.
    pub created_at: DateTime<Utc>,
    /// When the listing was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Alias kept so product payloads read naturally at call sites.
pub type Currency = CurrencyCode;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_wire_name_is_preserved() {
        let product = Product {
            id: ProductId::new(1),
            vendor_id: VendorId::new(2),
            name: "Woolly Bugger #8".to_string(),
            description: "Olive, bead head".to_string(),
            price: Decimal::new(350, 2),
            currency: CurrencyCode::Usd,
            categories: vec!["streamers".to_string()],
            stock: 24,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&product).unwrap();
        assert!(json.get("catagories").is_some());
        assert!(json.get("categories").is_none());
    }
}
