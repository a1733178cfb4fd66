//! Beneficiary onboarding wizard
//!
//! legal-name → bank-details → review → confirm → manage. Finalizing from
//! `confirm` lands on `manage`, where the new beneficiary is shown with its
//! pending status. There is no pricing.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::catalog::{RateSource, ReferenceData};
use crate::error::{PaystreetError, PaystreetResult};
use crate::models::{Beneficiary, Country};
use crate::wizard::fields::{optional, parse_flag};
use crate::wizard::{FieldError, FieldSet, FlowKind, Step, WizardDefinition, WizardEngine};

const KEYS: &[&str] = &[
    "legal_name",
    "country",
    "address",
    "bank_name",
    "account_number",
    "swift_code",
    "routing_number",
    "currency",
    "favorite",
    "default",
];

const MAX_NAME_LEN: usize = 140;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BeneficiaryFields {
    pub legal_name: String,
    /// Two-letter form code: us, uk, de, jp, in
    pub country: String,
    pub address: Option<String>,
    pub bank_name: String,
    pub account_number: String,
    pub swift_code: Option<String>,
    pub routing_number: Option<String>,
    /// Payout currency; defaults to the country's currency
    pub currency: Option<String>,
    pub favorite: bool,
    pub default: bool,
}

impl BeneficiaryFields {
    /// Build the beneficiary these fields describe
    ///
    /// The result is `Pending` until the bank details are verified.
    pub fn to_beneficiary(&self) -> PaystreetResult<Beneficiary> {
        let country = Country::parse(&self.country)
            .ok_or_else(|| PaystreetError::validation("country", "Select a country"))?;

        let mut beneficiary = Beneficiary::new(
            self.legal_name.trim(),
            self.bank_name.trim(),
            self.account_number.clone(),
            country,
        );
        beneficiary.swift_code = self.swift_code.clone();
        beneficiary.routing_number = self.routing_number.clone();
        beneficiary.address = self.address.clone();
        if let Some(currency) = &self.currency {
            beneficiary.currency = currency.clone();
        }
        beneficiary.is_favorite = self.favorite;
        beneficiary.is_default = self.default;

        beneficiary
            .validate()
            .map_err(|e| PaystreetError::validation("beneficiary", e.to_string()))?;
        Ok(beneficiary)
    }
}

impl FieldSet for BeneficiaryFields {
    fn keys() -> &'static [&'static str] {
        KEYS
    }

    fn set(&mut self, key: &str, value: &str) -> PaystreetResult<()> {
        let flag = |key: &str| {
            parse_flag(value).ok_or_else(|| PaystreetError::validation(key, "Expected yes or no"))
        };

        match key {
            "legal_name" => self.legal_name = value.to_string(),
            "country" => self.country = value.trim().to_lowercase(),
            "address" => self.address = optional(value),
            "bank_name" => self.bank_name = value.to_string(),
            "account_number" => self.account_number = value.trim().to_string(),
            "swift_code" => self.swift_code = optional(value).map(|s| s.to_ascii_uppercase()),
            "routing_number" => self.routing_number = optional(value),
            "currency" => self.currency = optional(value).map(|s| s.to_ascii_uppercase()),
            "favorite" => self.favorite = flag(key)?,
            "default" => self.default = flag(key)?,
            _ => return Err(PaystreetError::field_not_found(key)),
        }
        Ok(())
    }

    fn get(&self, key: &str) -> Option<String> {
        let yes_no = |b: bool| Some(if b { "yes" } else { "no" }.to_string());
        match key {
            "legal_name" => Some(self.legal_name.clone()),
            "country" => Some(self.country.clone()),
            "address" => self.address.clone(),
            "bank_name" => Some(self.bank_name.clone()),
            "account_number" => Some(self.account_number.clone()),
            "swift_code" => self.swift_code.clone(),
            "routing_number" => self.routing_number.clone(),
            "currency" => self.currency.clone(),
            "favorite" => yes_no(self.favorite),
            "default" => yes_no(self.default),
            _ => None,
        }
    }
}

fn check_legal_name(f: &BeneficiaryFields) -> Result<(), FieldError> {
    let name = f.legal_name.trim();
    if name.is_empty() {
        return Err(FieldError::new("legal_name", "Enter the beneficiary's legal name"));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(FieldError::new(
            "legal_name",
            format!("Legal name is limited to {} characters", MAX_NAME_LEN),
        ));
    }
    if Country::parse(&f.country).is_none() {
        return Err(FieldError::new("country", "Select a country"));
    }
    Ok(())
}

fn check_bank_details(f: &BeneficiaryFields) -> Result<(), FieldError> {
    if f.bank_name.trim().is_empty() {
        return Err(FieldError::new("bank_name", "Enter the bank name"));
    }
    if f.account_number.is_empty() {
        return Err(FieldError::new("account_number", "Enter the account number"));
    }
    let needs_routing = Country::parse(&f.country)
        .map(|c| c.requires_routing_number())
        .unwrap_or(false);
    if needs_routing && f.routing_number.is_none() {
        return Err(FieldError::new(
            "routing_number",
            "US accounts need a routing number",
        ));
    }
    Ok(())
}

/// The onboarding step list
pub fn definition() -> PaystreetResult<WizardDefinition<BeneficiaryFields>> {
    WizardDefinition::new(
        FlowKind::Beneficiary,
        vec![
            Step::new("legal-name", "Legal Name", check_legal_name),
            Step::new("bank-details", "Bank Details", check_bank_details),
            Step::always("review", "Review"),
            Step::always("confirm", "Confirm"),
            Step::always("manage", "Manage"),
        ],
        "confirm",
        None,
    )
}

/// Start an onboarding wizard
pub fn engine(
    catalog: Arc<dyn ReferenceData>,
    rates: Arc<dyn RateSource>,
) -> PaystreetResult<WizardEngine<BeneficiaryFields>> {
    Ok(WizardEngine::new(definition()?, catalog, rates))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BeneficiaryStatus;

    fn filled() -> BeneficiaryFields {
        BeneficiaryFields {
            legal_name: "Globex GmbH".into(),
            country: "de".into(),
            bank_name: "Commerzbank".into(),
            account_number: "DE89370400440532013000".into(),
            swift_code: Some("COBADEFF".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_definition_has_five_steps() {
        let def = definition().unwrap();
        assert_eq!(def.len(), 5);
        assert_eq!(def.index_of("confirm").unwrap(), def.review_index());
        assert_eq!(def.steps()[def.last_index()].id, "manage");
    }

    #[test]
    fn test_legal_name_step() {
        let mut f = filled();
        assert!(check_legal_name(&f).is_ok());

        f.country = "fr".into();
        assert_eq!(check_legal_name(&f).unwrap_err().field, "country");

        f.country = "de".into();
        f.legal_name = "   ".into();
        assert_eq!(check_legal_name(&f).unwrap_err().field, "legal_name");

        f.legal_name = "x".repeat(141);
        assert!(check_legal_name(&f).is_err());
    }

    #[test]
    fn test_us_needs_routing_number() {
        let mut f = filled();
        f.country = "us".into();
        assert_eq!(check_bank_details(&f).unwrap_err().field, "routing_number");

        f.set("routing_number", "021000021").unwrap();
        assert!(check_bank_details(&f).is_ok());
    }

    #[test]
    fn test_to_beneficiary() {
        let mut f = filled();
        f.set("favorite", "yes").unwrap();

        let b = f.to_beneficiary().unwrap();
        assert_eq!(b.legal_name, "Globex GmbH");
        assert_eq!(b.country, Country::De);
        assert_eq!(b.currency, "EUR");
        assert_eq!(b.status, BeneficiaryStatus::Pending);
        assert!(b.is_favorite);
        assert!(!b.is_default);
    }

    #[test]
    fn test_unknown_key() {
        let mut f = BeneficiaryFields::default();
        assert!(f.set("iban", "x").unwrap_err().is_not_found());
        assert!(f.set("default", "perhaps").unwrap_err().is_validation());
    }
}
