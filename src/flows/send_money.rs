//! Send money wizard
//!
//! recipient → bank → amount → method → schedule → review → complete.
//! The fee is the selected payment method's flat fee, charged on top of
//! the amount.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::catalog::{RateSource, ReferenceData};
use crate::error::{PaystreetError, PaystreetResult};
use crate::models::currency::minor_units;
use crate::models::{Beneficiary, Money, PaymentMethodKind};
use crate::wizard::fields::{optional, parse_flag};
use crate::wizard::{FieldError, FieldSet, FlowKind, PricingInputs, Step, WizardDefinition, WizardEngine};

/// Currencies a payment can be sent in
pub const CURRENCIES: &[&str] = &["USD", "EUR", "GBP", "JPY"];

/// Reasons a payment can be filed under
pub const PURPOSES: &[&str] = &["business", "goods", "invoice", "salary", "other"];

/// Repeat intervals for recurring payments
pub const FREQUENCIES: &[&str] = &["weekly", "monthly", "quarterly", "annually"];

const KEYS: &[&str] = &[
    "recipient_id",
    "recipient_name",
    "bank_name",
    "account_number",
    "amount",
    "currency",
    "purpose",
    "note",
    "payment_method",
    "scheduled_date",
    "recurring",
    "frequency",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendMoneyFields {
    /// Saved beneficiary the recipient fields were filled from
    pub recipient_id: Option<String>,
    pub recipient_name: String,
    pub bank_name: String,
    pub account_number: String,
    pub amount: String,
    pub currency: String,
    pub purpose: String,
    pub note: Option<String>,
    pub payment_method: String,
    /// One-off execution date, YYYY-MM-DD
    pub scheduled_date: Option<String>,
    pub recurring: bool,
    pub frequency: Option<String>,
}

impl Default for SendMoneyFields {
    fn default() -> Self {
        Self {
            recipient_id: None,
            recipient_name: String::new(),
            bank_name: String::new(),
            account_number: String::new(),
            amount: String::new(),
            currency: "USD".into(),
            purpose: String::new(),
            note: None,
            payment_method: PaymentMethodKind::default().id().into(),
            scheduled_date: None,
            recurring: false,
            frequency: None,
        }
    }
}

impl FieldSet for SendMoneyFields {
    const BENEFICIARY_FIELD: Option<&'static str> = Some("recipient_id");

    fn keys() -> &'static [&'static str] {
        KEYS
    }

    fn set(&mut self, key: &str, value: &str) -> PaystreetResult<()> {
        match key {
            "recipient_id" => self.recipient_id = optional(value),
            "recipient_name" => {
                self.recipient_name = value.to_string();
                // a typed name no longer refers to the saved beneficiary
                self.recipient_id = None;
            }
            "bank_name" => self.bank_name = value.to_string(),
            "account_number" => self.account_number = value.trim().to_string(),
            "amount" => self.amount = value.trim().to_string(),
            "currency" => self.currency = value.trim().to_ascii_uppercase(),
            "purpose" => self.purpose = value.trim().to_lowercase(),
            "note" => self.note = optional(value),
            "payment_method" => self.payment_method = value.trim().to_lowercase(),
            "scheduled_date" => self.scheduled_date = optional(value),
            "recurring" => {
                self.recurring = parse_flag(value).ok_or_else(|| {
                    PaystreetError::validation("recurring", "Expected yes or no")
                })?
            }
            "frequency" => self.frequency = optional(value).map(|f| f.to_lowercase()),
            _ => return Err(PaystreetError::field_not_found(key)),
        }
        Ok(())
    }

    fn get(&self, key: &str) -> Option<String> {
        match key {
            "recipient_id" => self.recipient_id.clone(),
            "recipient_name" => Some(self.recipient_name.clone()),
            "bank_name" => Some(self.bank_name.clone()),
            "account_number" => Some(self.account_number.clone()),
            "amount" => Some(self.amount.clone()),
            "currency" => Some(self.currency.clone()),
            "purpose" => Some(self.purpose.clone()),
            "note" => self.note.clone(),
            "payment_method" => Some(self.payment_method.clone()),
            "scheduled_date" => self.scheduled_date.clone(),
            "recurring" => Some(if self.recurring { "yes" } else { "no" }.to_string()),
            "frequency" => self.frequency.clone(),
            _ => None,
        }
    }

    fn pricing(&self) -> PricingInputs {
        PricingInputs {
            amount: self.amount.clone(),
            source_currency: Some(self.currency.clone()),
            target_currency: Some(self.currency.clone()),
            payment_method: Some(self.payment_method.clone()),
        }
    }

    fn apply_beneficiary(&mut self, beneficiary: &Beneficiary) -> bool {
        self.recipient_id = Some(beneficiary.id.short());
        self.recipient_name = beneficiary.legal_name.clone();
        self.bank_name = beneficiary.bank_name.clone();
        self.account_number = beneficiary.account_number.clone();
        if CURRENCIES.contains(&beneficiary.currency.as_str()) {
            self.currency = beneficiary.currency.clone();
        }
        true
    }
}

fn check_recipient(f: &SendMoneyFields) -> Result<(), FieldError> {
    if f.recipient_name.trim().is_empty() {
        return Err(FieldError::new(
            "recipient_name",
            "Choose a saved beneficiary or enter a recipient name",
        ));
    }
    Ok(())
}

fn check_bank(f: &SendMoneyFields) -> Result<(), FieldError> {
    if f.bank_name.trim().is_empty() {
        return Err(FieldError::new("bank_name", "Enter the recipient's bank"));
    }
    if f.account_number.is_empty() {
        return Err(FieldError::new("account_number", "Enter the account number"));
    }
    Ok(())
}

fn check_amount(f: &SendMoneyFields) -> Result<(), FieldError> {
    if !CURRENCIES.contains(&f.currency.as_str()) {
        return Err(FieldError::new(
            "currency",
            format!("Choose one of {}", CURRENCIES.join(", ")),
        ));
    }

    let amount = Money::parse(&f.amount, minor_units(&f.currency))
        .map_err(|e| FieldError::new("amount", e.to_string()))?;
    if !amount.is_positive() {
        return Err(FieldError::new("amount", "Enter an amount greater than zero"));
    }

    if !PURPOSES.contains(&f.purpose.as_str()) {
        return Err(FieldError::new("purpose", "Select the purpose of the payment"));
    }
    Ok(())
}

fn check_method(f: &SendMoneyFields) -> Result<(), FieldError> {
    PaymentMethodKind::parse(&f.payment_method)
        .map(|_| ())
        .ok_or_else(|| FieldError::new("payment_method", "Select a payment method"))
}

fn check_schedule(f: &SendMoneyFields) -> Result<(), FieldError> {
    if let Some(date) = &f.scheduled_date {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| FieldError::new("scheduled_date", "Use the format YYYY-MM-DD"))?;
    }

    if f.recurring {
        match f.frequency.as_deref() {
            Some(freq) if FREQUENCIES.contains(&freq) => {}
            _ => {
                return Err(FieldError::new(
                    "frequency",
                    format!("Choose one of {}", FREQUENCIES.join(", ")),
                ))
            }
        }
    }
    Ok(())
}

/// The send money step list
pub fn definition() -> PaystreetResult<WizardDefinition<SendMoneyFields>> {
    WizardDefinition::new(
        FlowKind::SendMoney,
        vec![
            Step::new("recipient", "Recipient", check_recipient),
            Step::new("bank", "Bank Details", check_bank),
            Step::new("amount", "Amount", check_amount),
            Step::new("method", "Payment Method", check_method),
            Step::new("schedule", "Schedule", check_schedule),
            Step::always("review", "Review"),
            Step::always("complete", "Complete"),
        ],
        "review",
        None,
    )
}

/// Start a send money wizard
pub fn engine(
    catalog: Arc<dyn ReferenceData>,
    rates: Arc<dyn RateSource>,
) -> PaystreetResult<WizardEngine<SendMoneyFields>> {
    Ok(WizardEngine::new(definition()?, catalog, rates))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed;

    fn filled() -> SendMoneyFields {
        SendMoneyFields {
            recipient_name: "Microsoft Corporation".into(),
            bank_name: "JP Morgan Chase".into(),
            account_number: "****1234".into(),
            amount: "500".into(),
            purpose: "invoice".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_definition_order() {
        let def = definition().unwrap();
        let ids: Vec<_> = def.steps().iter().map(|s| s.id).collect();
        assert_eq!(
            ids,
            ["recipient", "bank", "amount", "method", "schedule", "review", "complete"]
        );
        assert_eq!(def.review_index(), 5);
        assert_eq!(def.quote_index(), None);
    }

    #[test]
    fn test_amount_step() {
        let mut f = filled();
        assert!(check_amount(&f).is_ok());

        f.amount = String::new();
        assert_eq!(check_amount(&f).unwrap_err().field, "amount");

        f.amount = "0".into();
        assert_eq!(check_amount(&f).unwrap_err().field, "amount");

        f.amount = "10.505".into();
        assert_eq!(check_amount(&f).unwrap_err().field, "amount");

        f.amount = "10".into();
        f.purpose = String::new();
        assert_eq!(check_amount(&f).unwrap_err().field, "purpose");

        f.purpose = "goods".into();
        f.currency = "INR".into();
        assert_eq!(check_amount(&f).unwrap_err().field, "currency");
    }

    #[test]
    fn test_jpy_amount_has_no_decimals() {
        let mut f = filled();
        f.currency = "JPY".into();
        f.amount = "5000".into();
        assert!(check_amount(&f).is_ok());
        f.amount = "5000.5".into();
        assert!(check_amount(&f).is_err());
    }

    #[test]
    fn test_schedule_step() {
        let mut f = filled();
        assert!(check_schedule(&f).is_ok());

        f.scheduled_date = Some("15/01/2025".into());
        assert_eq!(check_schedule(&f).unwrap_err().field, "scheduled_date");

        f.scheduled_date = Some("2025-01-15".into());
        f.recurring = true;
        assert_eq!(check_schedule(&f).unwrap_err().field, "frequency");

        f.frequency = Some("monthly".into());
        assert!(check_schedule(&f).is_ok());
    }

    #[test]
    fn test_set_and_get() {
        let mut f = SendMoneyFields::default();
        f.set("recurring", "yes").unwrap();
        assert_eq!(f.get("recurring").as_deref(), Some("yes"));

        let err = f.set("recurring", "sometimes").unwrap_err();
        assert!(err.is_validation());

        let err = f.set("iban", "DE89").unwrap_err();
        assert!(err.is_not_found());

        f.set("currency", "eur").unwrap();
        assert_eq!(f.currency, "EUR");
    }

    #[test]
    fn test_apply_beneficiary() {
        let shopify = seed::beneficiaries()
            .into_iter()
            .find(|b| b.id == seed::SHOPIFY_ID)
            .unwrap();

        let mut f = SendMoneyFields::default();
        assert!(f.apply_beneficiary(&shopify));
        assert_eq!(f.recipient_name, "Shopify Inc.");
        assert_eq!(f.bank_name, "Deutsche Bank");
        assert_eq!(f.currency, "EUR");
        assert!(check_recipient(&f).is_ok());
        assert!(check_bank(&f).is_ok());

        f.set("recipient_name", "Someone Else").unwrap();
        assert!(f.recipient_id.is_none());
    }
}
