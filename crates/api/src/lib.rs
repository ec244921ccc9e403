//! Tailwater marketplace API library.
//!
//! The marketplace backend for a multi-vendor fly-fishing storefront:
//! checkout and payment splitting, the order ledger, vendor onboarding and
//! withdrawals, shipping labels, and the product catalog.
//!
//! Exposed as a library so the flows can be tested without the binary.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod shippo;
pub mod state;
pub mod stripe;
