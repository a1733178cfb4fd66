//! Currency model
//!
//! Currencies carry their own number of minor-unit digits so amounts can be
//! parsed and rounded correctly (JPY has none).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// Number of decimal places for an ISO 4217 code
///
/// Unknown codes fall back to 2.
pub fn minor_units(code: &str) -> u32 {
    match code.to_ascii_uppercase().as_str() {
        "JPY" | "KRW" | "VND" | "CLP" | "ISK" => 0,
        "BHD" | "KWD" | "OMR" | "JOD" | "TND" => 3,
        _ => 2,
    }
}

/// A currency the user holds a balance in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    /// ISO 4217 code, e.g. "USD"
    pub code: String,

    /// Display name, e.g. "US Dollar"
    pub name: String,

    /// Decimal places in the minor unit
    pub minor_units: u32,

    /// Wallet balance in this currency
    pub balance: Money,
}

impl Currency {
    /// Create a currency with the standard minor units for its code
    pub fn new(code: impl Into<String>, name: impl Into<String>, balance: Money) -> Self {
        let code = code.into().to_ascii_uppercase();
        Self {
            minor_units: minor_units(&code),
            code,
            name: name.into(),
            balance,
        }
    }

    /// Format an amount in this currency, e.g. "1,250,000 JPY"
    pub fn format(&self, amount: Money) -> String {
        amount.format_with_code(self.minor_units, &self.code)
    }

    /// Parse an amount typed in this currency
    pub fn parse(&self, input: &str) -> Result<Money, super::money::MoneyParseError> {
        Money::parse(input, self.minor_units)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minor_units() {
        assert_eq!(minor_units("USD"), 2);
        assert_eq!(minor_units("jpy"), 0);
        assert_eq!(minor_units("KWD"), 3);
    }

    #[test]
    fn test_new_uppercases_code() {
        let jpy = Currency::new("jpy", "Japanese Yen", Money::from_minor(1_250_000));
        assert_eq!(jpy.code, "JPY");
        assert_eq!(jpy.minor_units, 0);
        assert_eq!(jpy.format(jpy.balance), "1,250,000 JPY");
    }

    #[test]
    fn test_parse_uses_currency_scale() {
        let usd = Currency::new("USD", "US Dollar", Money::zero());
        assert_eq!(usd.parse("12.34").unwrap().minor(), 1234);

        let jpy = Currency::new("JPY", "Japanese Yen", Money::zero());
        assert_eq!(jpy.parse("1200").unwrap().minor(), 1200);
        assert!(jpy.parse("12.5").is_err());
    }
}
