//! Seed the database with demo data.
//!
//! Creates two vendor stores with a handful of fly listings and one
//! customer account, so a fresh environment has something to browse and
//! buy against. Safe to re-run: seeding is skipped when any demo account
//! already exists. Seeded vendors have no connected payout account, which
//! also makes them useful for exercising the onboarding flow.
//!
//! # Usage
//!
//! ```bash
//! tw-cli seed
//! ```
//!
//! # Environment Variables
//!
//! - `TAILWATER_DATABASE_URL` - `PostgreSQL` connection string

use rust_decimal::Decimal;
use sqlx::PgPool;

use tailwater_api::db::{ProductRepository, UserRepository};
use tailwater_core::{CurrencyCode, Email, UserRole, VendorId};

use super::CommandError;
use super::connect;

struct DemoProduct {
    name: &'static str,
    description: &'static str,
    price: Decimal,
    categories: &'static [&'static str],
    stock: i32,
}

struct DemoVendor {
    uid: &'static str,
    email: &'static str,
    store_name: &'static str,
    products: &'static [DemoProduct],
}

const DEMO_CUSTOMER_UID: &str = "demo-customer";

const DEMO_VENDORS: &[DemoVendor] = &[
    DemoVendor {
        uid: "demo-vendor-driftline",
        email: "driftline@example.com",
        store_name: "Driftline Flies",
        products: &[
            DemoProduct {
                name: "Parachute Adams #14",
                description: "All-purpose mayfly dry, hand tied.",
                price: Decimal::from_parts(275, 0, 0, false, 2),
                categories: &["dry", "mayfly"],
                stock: 120,
            },
            DemoProduct {
                name: "Elk Hair Caddis #16",
                description: "High-floating caddis for riffled water.",
                price: Decimal::from_parts(250, 0, 0, false, 2),
                categories: &["dry", "caddis"],
                stock: 80,
            },
            DemoProduct {
                name: "Pheasant Tail Nymph #18",
                description: "Classic slim-profile nymph.",
                price: Decimal::from_parts(225, 0, 0, false, 2),
                categories: &["nymph"],
                stock: 200,
            },
        ],
    },
    DemoVendor {
        uid: "demo-vendor-tailout",
        email: "tailout@example.com",
        store_name: "Tailout Tying Co",
        products: &[
            DemoProduct {
                name: "Woolly Bugger Olive #8",
                description: "Weighted streamer, marabou tail.",
                price: Decimal::from_parts(350, 0, 0, false, 2),
                categories: &["streamer"],
                stock: 60,
            },
            DemoProduct {
                name: "Zebra Midge #20",
                description: "Tungsten bead midge for tailwaters.",
                price: Decimal::from_parts(195, 0, 0, false, 2),
                categories: &["nymph", "midge"],
                stock: 150,
            },
        ],
    },
];

/// Seed demo vendors, products, and a customer account.
///
/// # Errors
///
/// Returns an error if the environment is missing `TAILWATER_DATABASE_URL`
/// or any insert fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    let existing: Option<i32> = sqlx::query_scalar("SELECT id FROM users WHERE uid = $1")
        .bind(DEMO_CUSTOMER_UID)
        .fetch_optional(&pool)
        .await?;

    if existing.is_some() {
        tracing::info!("Demo data already present, nothing to do");
        return Ok(());
    }

    create_user(
        &pool,
        DEMO_CUSTOMER_UID,
        "customer@example.com",
        UserRole::Customer,
    )
    .await?;

    let products = ProductRepository::new(&pool);

    for vendor in DEMO_VENDORS {
        create_user(&pool, vendor.uid, vendor.email, UserRole::Vendor).await?;

        // No connected payout account yet; onboarding is a separate step.
        let vendor_id: i32 = sqlx::query_scalar(
            "INSERT INTO vendors (owner_uid, store_name) VALUES ($1, $2) RETURNING id",
        )
        .bind(vendor.uid)
        .bind(vendor.store_name)
        .fetch_one(&pool)
        .await?;

        for product in vendor.products {
            let categories: Vec<String> =
                product.categories.iter().map(ToString::to_string).collect();
            products
                .create(
                    VendorId::new(vendor_id),
                    product.name,
                    product.description,
                    product.price,
                    CurrencyCode::Usd,
                    &categories,
                    product.stock,
                )
                .await?;
        }

        tracing::info!(
            "Seeded store {:?} with {} products",
            vendor.store_name,
            vendor.products.len()
        );
    }

    tracing::info!("Seeding complete!");
    tracing::info!("Demo tokens follow the pattern token-<uid>, e.g. token-demo-customer");
    Ok(())
}

async fn create_user(
    pool: &PgPool,
    uid: &str,
    email: &str,
    role: UserRole,
) -> Result<(), CommandError> {
    let email = Email::parse(email).map_err(|_| CommandError::InvalidEmail(email.to_owned()))?;

    // Deterministic tokens keep local testing scriptable. Never run this
    // against a production database.
    let token = format!("token-{uid}");

    UserRepository::new(pool)
        .create(uid, &email, role, &token)
        .await?;
    Ok(())
}
