//! Rate quote model
//!
//! A time-boxed snapshot of an exchange rate and the fee charged against it.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::money::Money;
use crate::error::{PaystreetError, PaystreetResult};

/// Exchange rate quote
///
/// The quote is valid while `now - issued_at < ttl_seconds`, or for as long
/// as it is locked. A quote can be locked once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateQuote {
    /// Source currency code
    pub from: String,

    /// Target currency code
    pub to: String,

    /// Customer rate: units of `to` per unit of `from`
    pub rate: Decimal,

    /// Markup over the mid-market rate already included in `rate`, in percent
    pub markup_percent: Decimal,

    /// Fee in the target currency, including any lock surcharge
    pub fee: Money,

    pub issued_at: DateTime<Utc>,

    pub ttl_seconds: u32,

    pub locked: bool,
}

impl RateQuote {
    /// Create a new, unlocked quote
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        rate: Decimal,
        markup_percent: Decimal,
        fee: Money,
        issued_at: DateTime<Utc>,
        ttl_seconds: u32,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            rate,
            markup_percent,
            fee,
            issued_at,
            ttl_seconds,
            locked: false,
        }
    }

    /// Same-currency quote carrying only a flat fee (rate 1, no markup)
    pub fn flat_fee(currency: impl Into<String>, fee: Money, issued_at: DateTime<Utc>, ttl_seconds: u32) -> Self {
        let currency = currency.into();
        Self::new(
            currency.clone(),
            currency,
            Decimal::ONE,
            Decimal::ZERO,
            fee,
            issued_at,
            ttl_seconds,
        )
    }

    /// When the quote stops being valid if it is not locked
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.issued_at + Duration::seconds(i64::from(self.ttl_seconds))
    }

    /// Whether the quote may still be acted on at `now`
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.locked || now < self.expires_at()
    }

    /// Lock the rate: resets the validity window once and adds the surcharge
    /// to the fee. Returns false without changing anything when already locked.
    ///
    /// # Errors
    ///
    /// `Validation` on `fee` when the surcharge overflows; the quote is left
    /// unlocked.
    pub fn lock(&mut self, now: DateTime<Utc>, ttl_seconds: u32, surcharge: Money) -> PaystreetResult<bool> {
        if self.locked {
            return Ok(false);
        }
        let fee = self
            .fee
            .checked_add(surcharge)
            .ok_or_else(|| PaystreetError::validation("fee", "Fee is too large"))?;
        self.fee = fee;
        self.locked = true;
        self.issued_at = now;
        self.ttl_seconds = ttl_seconds;
        Ok(true)
    }

    /// Interbank rate the customer rate was marked down from
    ///
    /// The markup lowers what the customer receives, so
    /// `rate = mid * (1 - markup / 100)`.
    pub fn mid_market_rate(&self) -> Decimal {
        let factor = Decimal::ONE - self.markup_percent / Decimal::ONE_HUNDRED;
        if factor <= Decimal::ZERO {
            return self.rate;
        }
        self.rate.checked_div(factor).unwrap_or(self.rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd_eur(issued_at: DateTime<Utc>) -> RateQuote {
        RateQuote::new(
            "USD",
            "EUR",
            Decimal::new(85, 2),
            Decimal::new(5, 1),
            Money::from_minor(500),
            issued_at,
            300,
        )
    }

    #[test]
    fn test_validity_window() {
        let t0 = Utc::now();
        let quote = usd_eur(t0);

        assert!(quote.is_valid_at(t0));
        assert!(quote.is_valid_at(t0 + Duration::seconds(299)));
        assert!(!quote.is_valid_at(t0 + Duration::seconds(300)));
    }

    #[test]
    fn test_lock_is_one_way() {
        let t0 = Utc::now();
        let mut quote = usd_eur(t0);
        let later = t0 + Duration::seconds(200);

        assert!(quote.lock(later, 300, Money::from_minor(250)).unwrap());
        assert_eq!(quote.fee, Money::from_minor(750));
        assert_eq!(quote.issued_at, later);
        assert!(quote.is_valid_at(t0 + Duration::seconds(10_000)));

        assert!(!quote.lock(later + Duration::seconds(5), 300, Money::from_minor(250)).unwrap());
        assert_eq!(quote.fee, Money::from_minor(750));
        assert_eq!(quote.issued_at, later);
    }

    #[test]
    fn test_flat_fee_quote() {
        let quote = RateQuote::flat_fee("USD", Money::from_minor(2500), Utc::now(), 300);
        assert_eq!(quote.from, "USD");
        assert_eq!(quote.to, "USD");
        assert_eq!(quote.rate, Decimal::ONE);
    }

    #[test]
    fn test_lock_surcharge_overflow() {
        let t0 = Utc::now();
        let mut quote = usd_eur(t0);
        quote.fee = Money::from_minor(i64::MAX);

        let err = quote.lock(t0, 300, Money::from_minor(250)).unwrap_err();
        assert!(err.is_validation());
        assert!(!quote.locked);
        assert_eq!(quote.fee, Money::from_minor(i64::MAX));
    }

    #[test]
    fn test_mid_market_rate_removes_markup() {
        // 0.85 is 0.5% below the interbank rate
        let quote = usd_eur(Utc::now());
        let mid = quote.mid_market_rate();
        assert_eq!(mid.round_dp(4), Decimal::new(8543, 4));
        assert_eq!((mid * Decimal::new(995, 3)).round_dp(10), Decimal::new(85, 2));

        let flat = RateQuote::flat_fee("USD", Money::zero(), Utc::now(), 300);
        assert_eq!(flat.mid_market_rate(), Decimal::ONE);
    }
}
