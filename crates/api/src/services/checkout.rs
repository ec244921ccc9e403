//! Checkout flow: cart → vendor splits → hosted payment session.

use std::collections::BTreeMap;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use tracing::{info, instrument};

use tailwater_core::{CurrencyCode, Money, ProductId, VendorId};

use crate::db::{CheckoutSessionRepository, ProductRepository};
use crate::error::AppError;
use crate::models::checkout_session::VendorSplit;
use crate::models::order::OrderLine;
use crate::stripe::{CheckoutLineItem, StripeClient};

/// How long a pending checkout session is honored.
const SESSION_TTL_MINUTES: i64 = 30;

/// One line of an incoming cart.
#[derive(Debug, Clone, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// The outcome of starting a checkout: where to send the customer.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StartedCheckout {
    pub session_id: String,
    pub url: Option<String>,
}

/// Builds payment sessions from carts.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
    stripe: &'a StripeClient,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, stripe: &'a StripeClient) -> Self {
        Self { pool, stripe }
    }

    /// Start a checkout for a customer's cart.
    ///
    /// Loads the products, groups line totals per vendor, creates the hosted
    /// payment session (with the per-vendor split riding in its metadata),
    /// and persists a session row the completion webhook can consume. The
    /// row expires after 30 minutes; the cleanup task sweeps it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for empty carts, zero quantities,
    /// unknown products, or mixed-currency carts.
    #[instrument(skip(self, cart), fields(customer = %customer_uid, lines = cart.len()))]
    pub async fn start(
        &self,
        customer_uid: &str,
        cart: &[CartLine],
        success_url: &str,
        cancel_url: &str,
    ) -> Result<StartedCheckout, AppError> {
        if cart.is_empty() {
            return Err(AppError::BadRequest("cart is empty".to_string()));
        }
        if cart.iter().any(|line| line.quantity == 0) {
            return Err(AppError::BadRequest(
                "cart line quantity must be at least 1".to_string(),
            ));
        }

        let ids: Vec<ProductId> = cart.iter().map(|line| line.product_id).collect();
        let products = ProductRepository::new(self.pool).get_many(&ids).await?;

        let (splits, currency) = build_vendor_splits(cart, &products)?;

        let line_items: Vec<CheckoutLineItem> = splits
            .iter()
            .flat_map(|split| &split.lines)
            .map(|line| {
                let unit = Money::new(line.unit_price, currency)
                    .to_minor_units()
                    .ok_or_else(|| {
                        AppError::BadRequest(format!(
                            "price out of range for product {}",
                            line.product_id
                        ))
                    })?;
                Ok(CheckoutLineItem {
                    name: line.name.clone(),
                    unit_amount: unit,
                    quantity: i64::from(line.quantity),
                })
            })
            .collect::<Result<_, AppError>>()?;

        // Compact split blob for the webhook; the session row keeps the full
        // line detail.
        let metadata_splits = serde_json::to_string(
            &splits
                .iter()
                .map(|s| MetadataSplit {
                    vendor_id: s.vendor_id,
                    amount: s.amount,
                })
                .collect::<Vec<_>>(),
        )
        .map_err(|e| AppError::Internal(format!("split metadata: {e}")))?;

        let session = self
            .stripe
            .create_checkout_session(
                &line_items,
                currency.as_stripe_str(),
                success_url,
                cancel_url,
                &[
                    ("vendor_splits", metadata_splits.as_str()),
                    ("customer_uid", customer_uid),
                ],
            )
            .await?;

        let expires_at = Utc::now() + Duration::minutes(SESSION_TTL_MINUTES);
        CheckoutSessionRepository::new(self.pool)
            .create(&session.id, customer_uid, &splits, expires_at)
            .await?;

        info!(
            session_id = %session.id,
            vendors = splits.len(),
            "Checkout session started"
        );

        Ok(StartedCheckout {
            session_id: session.id,
            url: session.url,
        })
    }
}

/// Wire shape of one metadata split entry.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub(crate) struct MetadataSplit {
    pub vendor_id: VendorId,
    pub amount: Decimal,
}

/// Group cart lines by vendor and total each vendor's share.
///
/// All products must share one currency; the cart is priced from the
/// catalog rows, not from anything the client sends.
fn build_vendor_splits(
    cart: &[CartLine],
    products: &[crate::models::Product],
) -> Result<(Vec<VendorSplit>, CurrencyCode), AppError> {
    let mut currency: Option<CurrencyCode> = None;
    // BTreeMap keeps split order stable for the metadata blob
    let mut by_vendor: BTreeMap<i32, VendorSplit> = BTreeMap::new();

    for line in cart {
        let product = products
            .iter()
            .find(|p| p.id == line.product_id)
            .ok_or_else(|| {
                AppError::BadRequest(format!("unknown product {}", line.product_id))
            })?;

        match currency {
            None => currency = Some(product.currency),
            Some(c) if c == product.currency => {}
            Some(_) => {
                return Err(AppError::BadRequest(
                    "cart mixes currencies".to_string(),
                ));
            }
        }

        let line_total = product.price * Decimal::from(line.quantity);
        let split = by_vendor
            .entry(product.vendor_id.as_i32())
            .or_insert_with(|| VendorSplit {
                vendor_id: product.vendor_id,
                amount: Decimal::ZERO,
                lines: Vec::new(),
            });
        split.amount += line_total;
        split.lines.push(OrderLine {
            product_id: product.id,
            name: product.name.clone(),
            unit_price: product.price,
            quantity: line.quantity,
        });
    }

    let currency = currency.ok_or_else(|| AppError::BadRequest("cart is empty".to_string()))?;
    Ok((by_vendor.into_values().collect(), currency))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::Product;
    use chrono::Utc;

    fn product(id: i32, vendor: i32, price_cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            vendor_id: VendorId::new(vendor),
            name: format!("Fly {id}"),
            description: String::new(),
            price: Decimal::new(price_cents, 2),
            currency: CurrencyCode::Usd,
            categories: vec![],
            stock: 100,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_splits_group_by_vendor() {
        let products = vec![product(1, 10, 250), product(2, 10, 300), product(3, 20, 500)];
        let cart = vec![
            CartLine {
                product_id: ProductId::new(1),
                quantity: 2,
            },
            CartLine {
                product_id: ProductId::new(2),
                quantity: 1,
            },
            CartLine {
                product_id: ProductId::new(3),
                quantity: 4,
            },
        ];

        let (splits, currency) = build_vendor_splits(&cart, &products).unwrap();
        assert_eq!(currency, CurrencyCode::Usd);
        assert_eq!(splits.len(), 2);

        let v10 = splits.iter().find(|s| s.vendor_id == VendorId::new(10)).unwrap();
        // 2 * 2.50 + 1 * 3.00
        assert_eq!(v10.amount, Decimal::new(800, 2));
        assert_eq!(v10.lines.len(), 2);

        let v20 = splits.iter().find(|s| s.vendor_id == VendorId::new(20)).unwrap();
        assert_eq!(v20.amount, Decimal::new(2000, 2));
    }

    #[test]
    fn test_unknown_product_rejected() {
        let products = vec![product(1, 10, 250)];
        let cart = vec![CartLine {
            product_id: ProductId::new(99),
            quantity: 1,
        }];

        let err = build_vendor_splits(&cart, &products).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_mixed_currency_rejected() {
        let mut eur = product(2, 10, 400);
        eur.currency = CurrencyCode::Eur;
        let products = vec![product(1, 10, 250), eur];
        let cart = vec![
            CartLine {
                product_id: ProductId::new(1),
                quantity: 1,
            },
            CartLine {
                product_id: ProductId::new(2),
                quantity: 1,
            },
        ];

        let err = build_vendor_splits(&cart, &products).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_metadata_split_round_trips() {
        let splits = vec![MetadataSplit {
            vendor_id: VendorId::new(7),
            amount: Decimal::new(1234, 2),
        }];
        let json = serde_json::to_string(&splits).unwrap();
        let back: Vec<MetadataSplit> = serde_json::from_str(&json).unwrap();
        assert_eq!(back[0].vendor_id, VendorId::new(7));
        assert_eq!(back[0].amount, Decimal::new(1234, 2));
    }
}
