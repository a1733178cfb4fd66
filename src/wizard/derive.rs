//! Derivation engine
//!
//! Pure functions computing the fee, converted amount and total from an
//! amount and a rate quote. Nothing here is cached: the engine calls
//! `derive` after every mutation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PaystreetError, PaystreetResult};
use crate::models::{Money, RateQuote};

/// How a flow turns the converted amount and fee into a total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Composition {
    /// Sending: the fee is charged on top of the principal
    Outbound,
    /// Converting: the fee comes out of the proceeds
    Conversion,
    /// No pricing at all
    None,
}

/// Values computed from the fields and the active quote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedValues {
    /// Amount the other side receives, in the target currency
    pub converted_amount: Money,

    /// Fee in the quote currency, including any lock surcharge
    pub fee: Money,

    /// Outbound: amount + fee (source currency). Conversion: converted amount.
    pub total: Money,
}

/// Compute derived values
///
/// `amount` is at `source_scale`; the converted amount and the fee are at
/// `target_scale`. Rounding is half away from zero.
///
/// - `converted = max(0, round(amount * rate) - fee)`
/// - `fee = quote.fee`
/// - `total = amount + fee` (outbound) or `converted` (conversion)
///
/// # Errors
///
/// `Validation` on `amount` when the product, the net amount or the total
/// does not fit in a `Money`.
pub fn derive(
    amount: Money,
    source_scale: u32,
    quote: &RateQuote,
    target_scale: u32,
    composition: Composition,
) -> PaystreetResult<DerivedValues> {
    if composition == Composition::None {
        return Ok(DerivedValues::default());
    }

    let gross = convert(amount, source_scale, quote.rate, target_scale)?;
    let converted_amount = gross.checked_sub(quote.fee).ok_or_else(too_large)?.floor_zero();
    let fee = quote.fee;

    let total = match composition {
        Composition::Outbound => amount.checked_add(fee).ok_or_else(too_large)?,
        Composition::Conversion => converted_amount,
        Composition::None => Money::zero(),
    };

    Ok(DerivedValues {
        converted_amount,
        fee,
        total,
    })
}

/// Multiply an amount by a rate and round to the target scale
pub fn convert(
    amount: Money,
    source_scale: u32,
    rate: Decimal,
    target_scale: u32,
) -> PaystreetResult<Money> {
    let product = amount
        .to_decimal(source_scale)
        .checked_mul(rate)
        .ok_or_else(too_large)?;

    Money::from_decimal(product, target_scale).map_err(|_| too_large())
}

fn too_large() -> PaystreetError {
    PaystreetError::validation("amount", "Amount is too large")
}

/// Re-express an amount at a different scale
pub fn rescale(amount: Money, from_scale: u32, to_scale: u32) -> PaystreetResult<Money> {
    convert(amount, from_scale, Decimal::ONE, to_scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn quote(rate: Decimal, fee: Money) -> RateQuote {
        RateQuote::new("USD", "EUR", rate, Decimal::new(5, 1), fee, Utc::now(), 300)
    }

    #[test]
    fn test_conversion_subtracts_fee() {
        // 1000 * 0.85 = 850.00, less 5.00
        let q = quote(Decimal::new(85, 2), Money::from_minor(500));
        let d = derive(Money::from_major(1000, 2), 2, &q, 2, Composition::Conversion).unwrap();
        assert_eq!(d.converted_amount, Money::from_minor(84_500));
        assert_eq!(d.fee, Money::from_minor(500));
        assert_eq!(d.total, d.converted_amount);
    }

    #[test]
    fn test_outbound_adds_fee() {
        let q = RateQuote::flat_fee("USD", Money::from_major(25, 2), Utc::now(), 300);
        let d = derive(Money::from_major(500, 2), 2, &q, 2, Composition::Outbound).unwrap();
        assert_eq!(d.total, Money::from_minor(52_500));
        assert_eq!(d.fee, Money::from_minor(2_500));
        assert_eq!(d.converted_amount, Money::from_minor(47_500));
    }

    #[test]
    fn test_converted_never_negative() {
        let q = quote(Decimal::new(85, 2), Money::from_minor(500));
        for minor in [1, 99, 100, 588, 589, 590, 1_000] {
            let d = derive(Money::from_minor(minor), 2, &q, 2, Composition::Conversion).unwrap();
            assert!(!d.converted_amount.is_negative(), "amount {}", minor);
        }
        let d = derive(Money::from_minor(100), 2, &q, 2, Composition::Conversion).unwrap();
        assert!(d.converted_amount.is_zero());
    }

    #[test]
    fn test_rounds_to_target_scale() {
        // 10.00 USD * 110.25 = 1102.5 JPY, rounds away from zero
        let q = RateQuote::new("USD", "JPY", Decimal::new(11025, 2), Decimal::ZERO, Money::zero(), Utc::now(), 300);
        let d = derive(Money::from_major(10, 2), 2, &q, 0, Composition::Conversion).unwrap();
        assert_eq!(d.converted_amount, Money::from_minor(1_103));
    }

    #[test]
    fn test_none_composition_is_zero() {
        let q = quote(Decimal::new(85, 2), Money::from_minor(500));
        let d = derive(Money::from_major(1000, 2), 2, &q, 2, Composition::None).unwrap();
        assert_eq!(d, DerivedValues::default());
    }

    #[test]
    fn test_rescale() {
        assert_eq!(rescale(Money::from_minor(2_500), 2, 0).unwrap(), Money::from_minor(25));
        assert_eq!(rescale(Money::from_minor(250), 2, 0).unwrap(), Money::from_minor(3));
    }

    #[test]
    fn test_overflow_is_validation() {
        let q = quote(Decimal::new(11025, 2), Money::zero());
        let err = convert(Money::from_minor(i64::MAX), 0, q.rate, 2).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_outbound_total_overflow_is_validation() {
        let q = RateQuote::flat_fee("USD", Money::from_major(25, 2), Utc::now(), 300);
        let err = derive(Money::from_minor(i64::MAX), 2, &q, 2, Composition::Outbound).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.field(), Some("amount"));
    }
}
