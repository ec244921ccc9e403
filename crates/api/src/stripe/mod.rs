//! Stripe integration for the marketplace.
//!
//! This module provides:
//! - [`StripeClient`] for Checkout Sessions, Connect accounts and transfers
//! - Webhook signature verification (`Stripe-Signature` header)
//! - Typed subsets of the Stripe objects the marketplace touches
//!
//! # Flow
//!
//! 1. Checkout creates a hosted Checkout Session carrying the vendor split
//!    metadata
//! 2. Stripe calls the webhook when the session completes
//! 3. The webhook handler verifies the signature, splits the payment and
//!    issues one transfer per vendor's connected account
//! 4. Vendors later withdraw matured funds via further transfers

mod client;
mod error;
mod types;
mod webhook;

pub use client::StripeClient;
pub use error::StripeError;
pub use types::{
    Account, AccountLink, CheckoutLineItem, CheckoutSession, CheckoutSessionObject, Event,
    Transfer,
};
pub use webhook::{parse_checkout_session, parse_event, verify_signature};
