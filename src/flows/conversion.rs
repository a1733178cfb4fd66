//! Currency conversion wizard
//!
//! quote → review → complete. Leaving the quote step issues a rate quote
//! and starts its countdown; the conversion fee comes out of the proceeds.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::catalog::{RateSource, ReferenceData};
use crate::error::{PaystreetError, PaystreetResult};
use crate::models::currency::minor_units;
use crate::models::Money;
use crate::wizard::{FieldError, FieldSet, FlowKind, PricingInputs, Step, WizardDefinition, WizardEngine};

/// Wallet currencies that can be converted between
pub const CURRENCIES: &[&str] = &["USD", "EUR", "GBP", "JPY", "INR"];

const KEYS: &[&str] = &["amount", "from", "to"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionFields {
    pub amount: String,
    pub from: String,
    pub to: String,
}

impl Default for ConversionFields {
    fn default() -> Self {
        Self {
            amount: String::new(),
            from: "USD".into(),
            to: "EUR".into(),
        }
    }
}

impl FieldSet for ConversionFields {
    fn keys() -> &'static [&'static str] {
        KEYS
    }

    fn set(&mut self, key: &str, value: &str) -> PaystreetResult<()> {
        match key {
            "amount" => self.amount = value.trim().to_string(),
            "from" => self.from = value.trim().to_ascii_uppercase(),
            "to" => self.to = value.trim().to_ascii_uppercase(),
            _ => return Err(PaystreetError::field_not_found(key)),
        }
        Ok(())
    }

    fn get(&self, key: &str) -> Option<String> {
        match key {
            "amount" => Some(self.amount.clone()),
            "from" => Some(self.from.clone()),
            "to" => Some(self.to.clone()),
            _ => None,
        }
    }

    fn pricing(&self) -> PricingInputs {
        PricingInputs {
            amount: self.amount.clone(),
            source_currency: Some(self.from.clone()),
            target_currency: Some(self.to.clone()),
            payment_method: None,
        }
    }

    fn swap_currencies(&mut self) -> bool {
        std::mem::swap(&mut self.from, &mut self.to);
        true
    }
}

fn check_quote(f: &ConversionFields) -> Result<(), FieldError> {
    if !CURRENCIES.contains(&f.from.as_str()) {
        return Err(FieldError::new("from", "Choose a wallet currency"));
    }
    if !CURRENCIES.contains(&f.to.as_str()) {
        return Err(FieldError::new("to", "Choose a wallet currency"));
    }
    if f.from == f.to {
        return Err(FieldError::new("to", "Choose a different currency to convert to"));
    }

    let amount = Money::parse(&f.amount, minor_units(&f.from))
        .map_err(|e| FieldError::new("amount", e.to_string()))?;
    if !amount.is_positive() {
        return Err(FieldError::new("amount", "Enter an amount greater than zero"));
    }
    Ok(())
}

/// The conversion step list
pub fn definition() -> PaystreetResult<WizardDefinition<ConversionFields>> {
    WizardDefinition::new(
        FlowKind::Conversion,
        vec![
            Step::new("quote", "Quote", check_quote),
            Step::always("review", "Review"),
            Step::always("complete", "Complete"),
        ],
        "review",
        Some("quote"),
    )
}

/// Start a conversion wizard
pub fn engine(
    catalog: Arc<dyn ReferenceData>,
    rates: Arc<dyn RateSource>,
) -> PaystreetResult<WizardEngine<ConversionFields>> {
    Ok(WizardEngine::new(definition()?, catalog, rates))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition() {
        let def = definition().unwrap();
        assert_eq!(def.len(), 3);
        assert_eq!(def.quote_index(), Some(0));
        assert_eq!(def.review_index(), 1);
    }

    #[test]
    fn test_quote_step() {
        let mut f = ConversionFields::default();
        assert_eq!(check_quote(&f).unwrap_err().field, "amount");

        f.set("amount", "1000").unwrap();
        assert!(check_quote(&f).is_ok());

        f.set("to", "usd").unwrap();
        assert_eq!(check_quote(&f).unwrap_err().field, "to");

        f.set("to", "CHF").unwrap();
        assert_eq!(check_quote(&f).unwrap_err().field, "to");
    }

    #[test]
    fn test_swap() {
        let mut f = ConversionFields::default();
        assert!(f.swap_currencies());
        assert_eq!((f.from.as_str(), f.to.as_str()), ("EUR", "USD"));
    }
}
