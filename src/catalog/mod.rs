//! Reference data for the wizards
//!
//! The wizards read beneficiaries, payment methods, currencies and exchange
//! rates through the `ReferenceData` and `RateSource` traits and never
//! modify them. `StaticCatalog` and `StaticRates` serve the bundled sample
//! data from memory.

pub mod seed;

use std::collections::HashMap;
use std::sync::RwLock;

use rust_decimal::Decimal;

use crate::error::{PaystreetError, PaystreetResult};
use crate::models::{Beneficiary, BeneficiaryId, Currency, PaymentMethod, PaymentMethodKind};

/// Read-only catalogs consumed by the wizards
pub trait ReferenceData {
    /// All saved beneficiaries, favorites first
    fn list_beneficiaries(&self) -> PaystreetResult<Vec<Beneficiary>>;

    /// Payment methods offered by the send flow
    fn list_payment_methods(&self) -> Vec<PaymentMethod>;

    /// Wallet currencies
    fn list_currencies(&self) -> Vec<Currency>;

    /// Look up a beneficiary by id
    fn find_beneficiary(&self, id: BeneficiaryId) -> PaystreetResult<Beneficiary> {
        self.list_beneficiaries()?
            .into_iter()
            .find(|b| b.id == id)
            .ok_or_else(|| PaystreetError::beneficiary_not_found(id.to_string()))
    }

    /// Look up a beneficiary by id (full or short form) or by legal name
    fn find_beneficiary_by_ref(&self, reference: &str) -> PaystreetResult<Beneficiary> {
        let all = self.list_beneficiaries()?;
        let reference = reference.trim();

        if let Ok(id) = reference.parse::<BeneficiaryId>() {
            if let Some(found) = all.iter().find(|b| b.id == id) {
                return Ok(found.clone());
            }
        }

        all.into_iter()
            .find(|b| {
                b.id.short().eq_ignore_ascii_case(reference)
                    || b.legal_name.eq_ignore_ascii_case(reference)
            })
            .ok_or_else(|| PaystreetError::beneficiary_not_found(reference))
    }

    /// Look up a payment method by its id ("swift", "ach", ...)
    fn find_payment_method(&self, id: &str) -> PaystreetResult<PaymentMethod> {
        let kind = PaymentMethodKind::parse(id)
            .ok_or_else(|| PaystreetError::payment_method_not_found(id))?;
        self.list_payment_methods()
            .into_iter()
            .find(|m| m.kind == kind)
            .ok_or_else(|| PaystreetError::payment_method_not_found(id))
    }

    /// Look up a currency by ISO code
    fn find_currency(&self, code: &str) -> PaystreetResult<Currency> {
        self.list_currencies()
            .into_iter()
            .find(|c| c.code.eq_ignore_ascii_case(code.trim()))
            .ok_or_else(|| PaystreetError::currency_not_found(code))
    }
}

/// Source of customer exchange rates
pub trait RateSource {
    /// Units of `to` per unit of `from`
    fn rate(&self, from: &str, to: &str) -> PaystreetResult<Decimal>;
}

/// In-memory catalog seeded with the sample data
pub struct StaticCatalog {
    beneficiaries: RwLock<Vec<Beneficiary>>,
    payment_methods: Vec<PaymentMethod>,
    currencies: Vec<Currency>,
}

impl StaticCatalog {
    /// Create a catalog with the bundled sample data
    pub fn new() -> Self {
        Self::with_data(seed::beneficiaries(), seed::payment_methods(), seed::currencies())
    }

    /// Create a catalog from explicit data
    pub fn with_data(
        beneficiaries: Vec<Beneficiary>,
        payment_methods: Vec<PaymentMethod>,
        currencies: Vec<Currency>,
    ) -> Self {
        Self {
            beneficiaries: RwLock::new(beneficiaries),
            payment_methods,
            currencies,
        }
    }

    /// Check a beneficiary could be registered without adding it
    pub fn check_registration(&self, beneficiary: &Beneficiary) -> PaystreetResult<()> {
        beneficiary
            .validate()
            .map_err(|e| PaystreetError::validation("beneficiary", e.to_string()))?;

        let data = self.beneficiaries.read().map_err(|e| {
            PaystreetError::Catalog(format!("Failed to acquire read lock: {}", e))
        })?;
        ensure_unique(&data, beneficiary)
    }

    /// Add a beneficiary created by the onboarding flow
    ///
    /// A new default beneficiary clears the flag on all others.
    pub fn register_beneficiary(&self, beneficiary: Beneficiary) -> PaystreetResult<()> {
        beneficiary
            .validate()
            .map_err(|e| PaystreetError::validation("beneficiary", e.to_string()))?;

        let mut data = self.beneficiaries.write().map_err(|e| {
            PaystreetError::Catalog(format!("Failed to acquire write lock: {}", e))
        })?;
        ensure_unique(&data, &beneficiary)?;

        if beneficiary.is_default {
            for existing in data.iter_mut() {
                existing.is_default = false;
            }
        }

        data.push(beneficiary);
        Ok(())
    }

    /// Filter beneficiaries by search term and favorite flag
    pub fn search_beneficiaries(
        &self,
        term: &str,
        favorites_only: bool,
    ) -> PaystreetResult<Vec<Beneficiary>> {
        Ok(self
            .list_beneficiaries()?
            .into_iter()
            .filter(|b| b.matches_search(term))
            .filter(|b| !favorites_only || b.is_favorite)
            .collect())
    }
}

/// Same id, or same legal name and account number
fn ensure_unique(existing: &[Beneficiary], beneficiary: &Beneficiary) -> PaystreetResult<()> {
    let duplicate = existing.iter().any(|b| {
        b.id == beneficiary.id
            || (b.legal_name.eq_ignore_ascii_case(&beneficiary.legal_name)
                && b.account_number == beneficiary.account_number)
    });
    if duplicate {
        return Err(PaystreetError::Duplicate {
            entity_type: "Beneficiary",
            identifier: beneficiary.legal_name.clone(),
        });
    }
    Ok(())
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceData for StaticCatalog {
    fn list_beneficiaries(&self) -> PaystreetResult<Vec<Beneficiary>> {
        let data = self.beneficiaries.read().map_err(|e| {
            PaystreetError::Catalog(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut list = data.clone();
        list.sort_by(|a, b| {
            b.is_favorite
                .cmp(&a.is_favorite)
                .then_with(|| a.legal_name.cmp(&b.legal_name))
        });
        Ok(list)
    }

    fn list_payment_methods(&self) -> Vec<PaymentMethod> {
        self.payment_methods.clone()
    }

    fn list_currencies(&self) -> Vec<Currency> {
        self.currencies.clone()
    }
}

/// Fixed exchange rates quoted against a base currency
///
/// Inverse and cross rates are derived and rounded to 6 decimal places.
pub struct StaticRates {
    base: String,
    rates: HashMap<String, Decimal>,
}

impl StaticRates {
    /// Rates bundled with the sample data (USD base)
    pub fn new() -> Self {
        Self::with_rates(
            "USD",
            seed::usd_rates()
                .into_iter()
                .map(|(code, rate)| (code.to_string(), rate)),
        )
    }

    /// Build from base-relative rates
    pub fn with_rates(
        base: impl Into<String>,
        rates: impl IntoIterator<Item = (String, Decimal)>,
    ) -> Self {
        Self {
            base: base.into().to_ascii_uppercase(),
            rates: rates
                .into_iter()
                .map(|(code, rate)| (code.to_ascii_uppercase(), rate))
                .collect(),
        }
    }

    fn from_base(&self, code: &str) -> Option<Decimal> {
        if code == self.base {
            Some(Decimal::ONE)
        } else {
            self.rates.get(code).copied().filter(|r| !r.is_zero())
        }
    }

    /// All quoted (code, rate) pairs, sorted by code
    pub fn quoted(&self) -> Vec<(String, Decimal)> {
        let mut pairs: Vec<_> = self
            .rates
            .iter()
            .map(|(code, rate)| (code.clone(), *rate))
            .collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        pairs
    }

    /// Base currency code
    pub fn base(&self) -> &str {
        &self.base
    }
}

impl Default for StaticRates {
    fn default() -> Self {
        Self::new()
    }
}

impl RateSource for StaticRates {
    fn rate(&self, from: &str, to: &str) -> PaystreetResult<Decimal> {
        let from = from.trim().to_ascii_uppercase();
        let to = to.trim().to_ascii_uppercase();

        if from == to {
            return Ok(Decimal::ONE);
        }

        let from_rate = self
            .from_base(&from)
            .ok_or_else(|| PaystreetError::rate_not_found(&from, &to))?;
        let to_rate = self
            .from_base(&to)
            .ok_or_else(|| PaystreetError::rate_not_found(&from, &to))?;

        if from == self.base {
            return Ok(to_rate);
        }

        Ok((to_rate / from_rate).round_dp(6))
    }
}
