//! Core data models for PayStreet
//!
//! This module contains the data structures the wizards work with: money,
//! currencies, payment methods, beneficiaries and rate quotes.

pub mod beneficiary;
pub mod currency;
pub mod ids;
pub mod money;
pub mod payment_method;
pub mod quote;

pub use beneficiary::{Beneficiary, BeneficiaryStatus, Country};
pub use currency::Currency;
pub use ids::{BeneficiaryId, SessionId};
pub use money::{Money, MoneyParseError};
pub use payment_method::{PaymentMethod, PaymentMethodKind, FEE_SCALE};
pub use quote::RateQuote;
