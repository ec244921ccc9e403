//! Shippo-related errors.

use thiserror::Error;

/// Errors that can occur when interacting with the Shippo API.
#[derive(Debug, Error)]
pub enum ShippoError {
    /// HTTP request failed.
    #[error("Shippo request failed: {0}")]
    Request(String),

    /// Failed to parse response.
    #[error("Shippo response error: {0}")]
    Response(String),

    /// Shippo API returned an error.
    #[error("Shippo API error: {0}")]
    Api(String),

    /// Request payload failed validation before being sent.
    #[error("Invalid shipment request: {0}")]
    Validation(String),

    /// No API token available for the request.
    #[error("No Shippo API token configured or supplied")]
    MissingToken,
}
