//! Type-safe money representation using decimal arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An amount of money with currency information.
///
/// Amounts are held in the currency's standard unit (dollars, not cents)
/// as a [`Decimal`] so fee math never loses precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the currency's standard unit.
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Money {
    /// Create a new money value.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Zero in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency_code,
        }
    }

    /// Create a money value from an integer number of minor units
    /// (e.g. cents for USD).
    #[must_use]
    pub fn from_minor_units(units: i64, currency_code: CurrencyCode) -> Self {
        Self {
            amount: Decimal::new(units, 2),
            currency_code,
        }
    }

    /// The amount as an integer number of minor units, rounding half-up.
    ///
    /// Returns `None` if the amount does not fit in an `i64`.
    #[must_use]
    pub fn to_minor_units(&self) -> Option<i64> {
        use rust_decimal::RoundingStrategy;
        let scaled = (self.amount * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        scaled.try_into().ok()
    }

    /// Format for display (e.g. "19.99 USD").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{:.2} {}", self.amount, self.currency_code.code())
    }
}

/// ISO 4217 currency codes accepted by the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CurrencyCode {
    #[default]
    Usd,
    Eur,
    Gbp,
    Cad,
    Aud,
}

impl CurrencyCode {
    /// The uppercase ISO 4217 code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
            Self::Cad => "CAD",
            Self::Aud => "AUD",
        }
    }

    /// The lowercase code the payment processor expects.
    #[must_use]
    pub const fn as_stripe_str(&self) -> &'static str {
        match self {
            Self::Usd => "usd",
            Self::Eur => "eur",
            Self::Gbp => "gbp",
            Self::Cad => "cad",
            Self::Aud => "aud",
        }
    }

    /// Parse a currency code, accepting either case.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "usd" => Some(Self::Usd),
            "eur" => Some(Self::Eur),
            "gbp" => Some(Self::Gbp),
            "cad" => Some(Self::Cad),
            "aud" => Some(Self::Aud),
            _ => None,
        }
    }
}

impl core::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_minor_units_roundtrip() {
        let m = Money::from_minor_units(1999, CurrencyCode::Usd);
        assert_eq!(m.amount, Decimal::new(1999, 2));
        assert_eq!(m.to_minor_units(), Some(1999));
    }

    #[test]
    fn test_minor_units_rounds_half_up() {
        let m = Money::new(Decimal::new(12345, 4), CurrencyCode::Usd); // 1.2345
        assert_eq!(m.to_minor_units(), Some(123));
        let m = Money::new(Decimal::new(12355, 4), CurrencyCode::Usd); // 1.2355
        assert_eq!(m.to_minor_units(), Some(124));
    }

    #[test]
    fn test_display() {
        let m = Money::from_minor_units(250, CurrencyCode::Gbp);
        assert_eq!(m.display(), "2.50 GBP");
    }

    #[test]
    fn test_currency_parse() {
        assert_eq!(CurrencyCode::parse("USD"), Some(CurrencyCode::Usd));
        assert_eq!(CurrencyCode::parse("eur"), Some(CurrencyCode::Eur));
        assert_eq!(CurrencyCode::parse("yen"), None);
    }
}
