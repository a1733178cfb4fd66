//! The three PayStreet wizards
//!
//! Each flow supplies a field record and a step list; `WizardEngine` does
//! the rest.

pub mod beneficiary;
pub mod conversion;
pub mod send_money;

pub use beneficiary::BeneficiaryFields;
pub use conversion::ConversionFields;
pub use send_money::SendMoneyFields;
