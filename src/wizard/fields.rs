//! Field records collected by a wizard
//!
//! Values are kept as the text the user typed. Typed parsing happens in step
//! validation and in derivation, so a field that is cleared after being
//! valid is caught the next time the step is checked.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::PaystreetResult;
use crate::models::Beneficiary;

/// Raw inputs the derivation engine reads from a field record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PricingInputs {
    /// Amount text in the source currency
    pub amount: String,
    pub source_currency: Option<String>,
    pub target_currency: Option<String>,
    pub payment_method: Option<String>,
}

/// Per-flow field record driven by a `WizardEngine`
pub trait FieldSet: Clone + Default + fmt::Debug + Serialize {
    /// Key that selects a saved beneficiary, resolved through the catalog
    const BENEFICIARY_FIELD: Option<&'static str> = None;

    /// Every key `set` and `get` accept, in form order
    fn keys() -> &'static [&'static str];

    /// Store a value typed by the user
    ///
    /// Unknown keys fail with `NotFound`; a value that cannot be stored at
    /// all (a flag that is not a boolean) fails with `Validation`.
    fn set(&mut self, key: &str, value: &str) -> PaystreetResult<()>;

    /// Current text of a field
    fn get(&self, key: &str) -> Option<String>;

    /// Pricing inputs, empty for flows without pricing
    fn pricing(&self) -> PricingInputs {
        PricingInputs::default()
    }

    /// Fill recipient fields from a saved beneficiary
    ///
    /// Returns false when the flow has no use for beneficiaries.
    fn apply_beneficiary(&mut self, _beneficiary: &Beneficiary) -> bool {
        false
    }

    /// Exchange source and target currency
    ///
    /// Returns false when the flow has no currency pair.
    fn swap_currencies(&mut self) -> bool {
        false
    }

    /// All non-empty fields keyed by name
    fn to_map(&self) -> BTreeMap<String, String> {
        Self::keys()
            .iter()
            .filter_map(|key| {
                self.get(key)
                    .filter(|v| !v.is_empty())
                    .map(|v| (key.to_string(), v))
            })
            .collect()
    }
}

/// Parse a yes/no style flag
pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "on" => Some(true),
        "false" | "no" | "n" | "0" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Trim and store an optional text value
pub(crate) fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
