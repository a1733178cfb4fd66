//! Sample reference data
//!
//! The beneficiaries, payment rails, wallet balances and exchange rates the
//! app ships with.

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;

use crate::models::{
    Beneficiary, BeneficiaryId, BeneficiaryStatus, Country, Currency, Money, PaymentMethod,
    PaymentMethodKind,
};

pub const MICROSOFT_ID: BeneficiaryId = BeneficiaryId::from_u128(0xa001);
pub const SHOPIFY_ID: BeneficiaryId = BeneficiaryId::from_u128(0xa002);
pub const AWS_ID: BeneficiaryId = BeneficiaryId::from_u128(0xa003);

/// Saved beneficiaries
pub fn beneficiaries() -> Vec<Beneficiary> {
    let created_at = Utc
        .with_ymd_and_hms(2024, 11, 4, 9, 30, 0)
        .single()
        .unwrap_or_else(Utc::now);

    let entry = |id, name: &str, bank: &str, account: &str, country: Country| Beneficiary {
        id,
        legal_name: name.to_string(),
        bank_name: bank.to_string(),
        account_number: account.to_string(),
        swift_code: None,
        routing_number: None,
        address: None,
        country,
        currency: country.default_currency().to_string(),
        status: BeneficiaryStatus::Verified,
        is_favorite: false,
        is_default: false,
        created_at,
    };

    let mut microsoft = entry(
        MICROSOFT_ID,
        "Microsoft Corporation",
        "JP Morgan Chase",
        "****1234",
        Country::Us,
    );
    microsoft.routing_number = Some("021000021".into());
    microsoft.is_favorite = true;
    microsoft.is_default = true;

    let mut shopify = entry(SHOPIFY_ID, "Shopify Inc.", "Deutsche Bank", "****5678", Country::De);
    shopify.swift_code = Some("DEUTDEFF".into());
    shopify.is_favorite = true;

    let mut aws = entry(AWS_ID, "Amazon Web Services", "HSBC", "****9012", Country::Uk);
    aws.swift_code = Some("HBUKGB4B".into());
    aws.status = BeneficiaryStatus::Pending;

    vec![microsoft, shopify, aws]
}

/// Payment rails offered by the send flow
pub fn payment_methods() -> Vec<PaymentMethod> {
    vec![
        PaymentMethod::new(
            PaymentMethodKind::Swift,
            "SWIFT Wire",
            Money::from_major(25, 2),
            "1-2 business days",
        ),
        PaymentMethod::new(
            PaymentMethodKind::Ach,
            "ACH Transfer",
            Money::from_major(5, 2),
            "2-3 business days",
        ),
        PaymentMethod::new(
            PaymentMethodKind::Sepa,
            "SEPA Transfer",
            Money::from_major(2, 2),
            "Same day",
        ),
        PaymentMethod::new(
            PaymentMethodKind::Faster,
            "Faster Payments",
            Money::from_major(1, 2),
            "Instant",
        ),
    ]
}

/// Wallet currencies and balances
pub fn currencies() -> Vec<Currency> {
    vec![
        Currency::new("USD", "US Dollar", Money::from_minor(2_458_000)),
        Currency::new("EUR", "Euro", Money::from_minor(842_050)),
        Currency::new("GBP", "British Pound", Money::from_minor(523_075)),
        Currency::new("JPY", "Japanese Yen", Money::from_minor(1_250_000)),
        Currency::new("INR", "Indian Rupee", Money::zero()),
    ]
}

/// Customer rates quoted against USD
pub fn usd_rates() -> Vec<(&'static str, Decimal)> {
    vec![
        ("EUR", Decimal::new(85, 2)),
        ("GBP", Decimal::new(73, 2)),
        ("JPY", Decimal::new(11025, 2)),
        ("INR", Decimal::new(7450, 2)),
    ]
}
