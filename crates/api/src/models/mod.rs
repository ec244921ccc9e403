//! Domain types for the marketplace.
//!
//! These are validated domain objects; raw database rows live in the
//! repositories and convert into these via `TryFrom`.

pub mod checkout_session;
pub mod order;
pub mod product;
pub mod review;
pub mod user;
pub mod vendor;

pub use checkout_session::{CheckoutSessionRecord, VendorSplit};
pub use order::{Order, OrderLine};
pub use product::Product;
pub use review::{ProductReview, VendorReview};
pub use user::User;
pub use vendor::{Vendor, VendorRequest};
