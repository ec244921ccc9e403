//! Shippo integration for the shipping flow.
//!
//! This module provides:
//! - [`ShippoClient`] for rate quoting and label purchase
//! - Address and parcel types with request validation
//!
//! Label purchases authenticate with the caller's own carrier API key,
//! forwarded unchanged; the server token from config is only a fallback.

mod client;
mod error;
mod types;

pub use client::ShippoClient;
pub use error::ShippoError;
pub use types::{Address, Parcel, Rate, Shipment, Transaction};
