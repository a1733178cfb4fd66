//! Money type for representing currency amounts
//!
//! Internally stores amounts in minor units (i64) to avoid floating-point
//! precision issues. The number of decimal places belongs to the currency
//! (2 for USD/EUR/GBP/INR, 0 for JPY), so parsing and formatting take a scale.
//! Rate arithmetic goes through `rust_decimal::Decimal`.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

/// Represents a monetary amount stored in minor units of its currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from minor units
    ///
    /// # Examples
    /// ```
    /// use paystreet_cli::models::Money;
    /// let amount = Money::from_minor(1050); // 10.50 in a 2-decimal currency
    /// assert_eq!(amount.minor(), 1050);
    /// ```
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Create a Money amount from whole major units at the given scale
    ///
    /// # Examples
    /// ```
    /// use paystreet_cli::models::Money;
    /// assert_eq!(Money::from_major(25, 2).minor(), 2500);
    /// assert_eq!(Money::from_major(25, 0).minor(), 25);
    /// ```
    pub const fn from_major(major: i64, scale: u32) -> Self {
        Self(major * 10i64.pow(scale))
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in minor units
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Check if the amount is zero
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Check if the amount is positive
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Check if the amount is negative
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Get the absolute value
    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Add, returning `None` on overflow
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Subtract, returning `None` on overflow
    pub const fn checked_sub(self, other: Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Clamp negative amounts to zero
    pub fn floor_zero(self) -> Self {
        self.max(Self::zero())
    }

    /// Exact decimal value in major units
    pub fn to_decimal(&self, scale: u32) -> Decimal {
        Decimal::new(self.0, scale)
    }

    /// Convert a decimal in major units to Money, rounding half away from
    /// zero to `scale` places
    pub fn from_decimal(value: Decimal, scale: u32) -> Result<Self, MoneyParseError> {
        let mut rounded = value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(scale);
        i64::try_from(rounded.mantissa())
            .map(Self)
            .map_err(|_| MoneyParseError::OutOfRange(value.to_string()))
    }

    /// Parse a money amount typed by a user
    ///
    /// Accepts formats: "10.50", "-10.50", "$10.50", "1,000.50", "10".
    /// More decimal places than the currency supports is an error.
    pub fn parse(s: &str, scale: u32) -> Result<Self, MoneyParseError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(MoneyParseError::Empty);
        }

        // Handle negative sign at start
        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else {
            (false, trimmed)
        };

        // Remove currency symbol and grouping separators
        let rest = rest.trim_start_matches(['$', '€', '£', '¥', '₹']);
        if rest.starts_with(['-', '+']) {
            return Err(MoneyParseError::InvalidFormat(trimmed.to_string()));
        }
        let cleaned: String = rest.chars().filter(|c| *c != ',' && *c != '_').collect();

        let value = Decimal::from_str(&cleaned)
            .map_err(|_| MoneyParseError::InvalidFormat(trimmed.to_string()))?;

        if value.normalize().scale() > scale {
            return Err(MoneyParseError::TooPrecise {
                input: trimmed.to_string(),
                scale,
            });
        }

        let money = Self::from_decimal(value, scale)?;
        Ok(if negative { -money } else { money })
    }

    /// Format with grouping separators at the given scale, e.g. "24,580.00"
    pub fn format(&self, scale: u32) -> String {
        let divisor = 10i64.pow(scale);
        let whole = (self.0 / divisor).abs();
        let frac = (self.0 % divisor).abs();

        let digits = whole.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        let sign = if self.is_negative() { "-" } else { "" };
        if scale == 0 {
            format!("{}{}", sign, grouped)
        } else {
            format!(
                "{}{}.{:0width$}",
                sign,
                grouped,
                frac,
                width = scale as usize
            )
        }
    }

    /// Format followed by a currency code, e.g. "840.00 EUR"
    pub fn format_with_code(&self, scale: u32, code: &str) -> String {
        format!("{} {}", self.format(scale), code)
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(2))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    Empty,
    InvalidFormat(String),
    TooPrecise { input: String, scale: u32 },
    OutOfRange(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::Empty => write!(f, "Amount is empty"),
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
            MoneyParseError::TooPrecise { input, scale } => write!(
                f,
                "{} has more than {} decimal place(s) for this currency",
                input, scale
            ),
            MoneyParseError::OutOfRange(s) => write!(f, "Amount out of range: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_minor() {
        let m = Money::from_minor(1050);
        assert_eq!(m.minor(), 1050);
        assert_eq!(m.to_decimal(2), Decimal::new(1050, 2));
    }

    #[test]
    fn test_from_major() {
        assert_eq!(Money::from_major(10, 2).minor(), 1000);
        assert_eq!(Money::from_major(10, 0).minor(), 10);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_minor(1050)), "10.50");
        assert_eq!(format!("{}", Money::from_minor(0)), "0.00");
        assert_eq!(format!("{}", Money::from_minor(-1050)), "-10.50");
        assert_eq!(format!("{}", Money::from_minor(5)), "0.05");
    }

    #[test]
    fn test_format_grouping() {
        assert_eq!(Money::from_minor(2_458_000).format(2), "24,580.00");
        assert_eq!(Money::from_minor(1_250_000).format(0), "1,250,000");
        assert_eq!(Money::from_minor(84_000).format_with_code(2, "EUR"), "840.00 EUR");
        assert_eq!(Money::from_minor(-100_000).format(2), "-1,000.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_minor(1000);
        let b = Money::from_minor(500);

        assert_eq!((a + b).minor(), 1500);
        assert_eq!((a - b).minor(), 500);
        assert_eq!((-a).minor(), -1000);
        assert_eq!((b - a).floor_zero(), Money::zero());
    }

    #[test]
    fn test_checked_arithmetic() {
        let max = Money::from_minor(i64::MAX);
        assert_eq!(max.checked_add(Money::from_minor(1)), None);
        assert_eq!(Money::from_minor(i64::MIN).checked_sub(Money::from_minor(1)), None);
        assert_eq!(
            Money::from_minor(1000).checked_add(Money::from_minor(500)),
            Some(Money::from_minor(1500))
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50", 2).unwrap().minor(), 1050);
        assert_eq!(Money::parse("$10.50", 2).unwrap().minor(), 1050);
        assert_eq!(Money::parse("-10.50", 2).unwrap().minor(), -1050);
        assert_eq!(Money::parse("10", 2).unwrap().minor(), 1000);
        assert_eq!(Money::parse("10.5", 2).unwrap().minor(), 1050);
        assert_eq!(Money::parse("1,000.25", 2).unwrap().minor(), 100_025);
        assert_eq!(Money::parse("5000", 0).unwrap().minor(), 5000);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(Money::parse("", 2), Err(MoneyParseError::Empty));
        assert!(Money::parse("--5", 2).is_err());
        assert!(Money::parse("-$-5", 2).is_err());
        assert!(Money::parse("-+5", 2).is_err());
        assert!(matches!(
            Money::parse("abc", 2),
            Err(MoneyParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            Money::parse("10.505", 2),
            Err(MoneyParseError::TooPrecise { .. })
        ));
        assert!(matches!(
            Money::parse("100.5", 0),
            Err(MoneyParseError::TooPrecise { .. })
        ));
    }

    #[test]
    fn test_from_decimal_rounds_half_away_from_zero() {
        assert_eq!(
            Money::from_decimal(Decimal::new(8455, 3), 2).unwrap().minor(),
            846
        );
        assert_eq!(
            Money::from_decimal(Decimal::new(-8455, 3), 2).unwrap().minor(),
            -846
        );
        assert_eq!(
            Money::from_decimal(Decimal::new(1105, 1), 0).unwrap().minor(),
            111
        );
    }

    #[test]
    fn test_sum() {
        let amounts = vec![
            Money::from_minor(100),
            Money::from_minor(200),
            Money::from_minor(300),
        ];
        let total: Money = amounts.into_iter().sum();
        assert_eq!(total.minor(), 600);
    }

    #[test]
    fn test_serialization() {
        let m = Money::from_minor(1050);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "1050");

        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, deserialized);
    }
}
