//! Typed subsets of the Shippo API objects the marketplace uses.

use serde::{Deserialize, Serialize};

use super::error::ShippoError;

/// A shipping address, sent verbatim to the carrier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub name: String,
    pub street1: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

impl Address {
    /// Reject addresses with blank required fields before hitting the API.
    ///
    /// # Errors
    ///
    /// Returns [`ShippoError::Validation`] naming the first blank field.
    pub fn validate(&self, label: &str) -> Result<(), ShippoError> {
        let fields = [
            ("name", &self.name),
            ("street1", &self.street1),
            ("city", &self.city),
            ("state", &self.state),
            ("zip", &self.zip),
            ("country", &self.country),
        ];

        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(ShippoError::Validation(format!(
                    "{label} address is missing {field}"
                )));
            }
        }

        Ok(())
    }
}

/// Parcel dimensions and weight. Shippo takes these as strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parcel {
    pub length: String,
    pub width: String,
    pub height: String,
    /// Unit for the dimensions, e.g. `in` or `cm`.
    pub distance_unit: String,
    pub weight: String,
    /// Unit for the weight, e.g. `oz` or `kg`.
    pub mass_unit: String,
}

impl Parcel {
    /// Reject parcels whose dimensions or weight are not strictly positive
    /// numbers.
    ///
    /// # Errors
    ///
    /// Returns [`ShippoError::Validation`] naming the offending field.
    pub fn validate(&self) -> Result<(), ShippoError> {
        let fields = [
            ("length", &self.length),
            ("width", &self.width),
            ("height", &self.height),
            ("weight", &self.weight),
        ];

        for (field, value) in fields {
            match value.trim().parse::<f64>() {
                Ok(v) if v > 0.0 => {}
                _ => {
                    return Err(ShippoError::Validation(format!(
                        "parcel {field} must be a positive number, got {value:?}"
                    )));
                }
            }
        }

        if self.distance_unit.trim().is_empty() || self.mass_unit.trim().is_empty() {
            return Err(ShippoError::Validation(
                "parcel units must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// A rate quote for one carrier service level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rate {
    pub object_id: String,
    pub amount: String,
    pub currency: String,
    pub provider: String,
    #[serde(default)]
    pub servicelevel_name: Option<String>,
    #[serde(default)]
    pub estimated_days: Option<i32>,
}

/// A created shipment with its rate quotes.
#[derive(Debug, Clone, Deserialize)]
pub struct Shipment {
    pub object_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub rates: Vec<Rate>,
}

/// A purchased label transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct Transaction {
    pub object_id: String,
    /// `SUCCESS`, `ERROR`, or `QUEUED`.
    pub status: String,
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub label_url: Option<String>,
    #[serde(default)]
    pub messages: Vec<TransactionMessage>,
}

/// A carrier message attached to a transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionMessage {
    #[serde(default)]
    pub text: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn address() -> Address {
        Address {
            name: "Dana Mills".to_string(),
            street1: "12 Brook St".to_string(),
            city: "Missoula".to_string(),
            state: "MT".to_string(),
            zip: "59801".to_string(),
            country: "US".to_string(),
        }
    }

    fn parcel() -> Parcel {
        Parcel {
            length: "6".to_string(),
            width: "4".to_string(),
            height: "2".to_string(),
            distance_unit: "in".to_string(),
            weight: "3.5".to_string(),
            mass_unit: "oz".to_string(),
        }
    }

    #[test]
    fn test_address_validates() {
        assert!(address().validate("from").is_ok());
    }

    #[test]
    fn test_address_rejects_blank_field() {
        let mut addr = address();
        addr.city = "  ".to_string();
        let err = addr.validate("to").unwrap_err();
        assert!(err.to_string().contains("city"));
    }

    #[test]
    fn test_parcel_validates() {
        assert!(parcel().validate().is_ok());
    }

    #[test]
    fn test_parcel_rejects_zero_and_negative_dims() {
        let mut p = parcel();
        p.height = "0".to_string();
        assert!(p.validate().is_err());

        let mut p = parcel();
        p.weight = "-1".to_string();
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_parcel_rejects_non_numeric() {
        let mut p = parcel();
        p.length = "tall".to_string();
        let err = p.validate().unwrap_err();
        assert!(err.to_string().contains("length"));
    }
}
