//! Beneficiary model
//!
//! A saved payee that money can be sent to. Created by the onboarding flow,
//! read by the send-money flow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::BeneficiaryId;

/// Verification status of a beneficiary's bank details
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BeneficiaryStatus {
    Verified,
    #[default]
    Pending,
    Failed,
}

impl fmt::Display for BeneficiaryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Verified => write!(f, "Verified"),
            Self::Pending => write!(f, "Pending"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

/// Countries a beneficiary bank can be located in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Country {
    Us,
    Uk,
    De,
    Jp,
    In,
}

impl Country {
    /// Parse a two-letter form code or a full country name
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "us" | "usa" | "united states" => Some(Self::Us),
            "uk" | "gb" | "united kingdom" => Some(Self::Uk),
            "de" | "germany" => Some(Self::De),
            "jp" | "japan" => Some(Self::Jp),
            "in" | "india" => Some(Self::In),
            _ => None,
        }
    }

    /// Two-letter code used in forms
    pub fn code(&self) -> &'static str {
        match self {
            Self::Us => "us",
            Self::Uk => "uk",
            Self::De => "de",
            Self::Jp => "jp",
            Self::In => "in",
        }
    }

    /// Currency normally used for payouts in this country
    pub fn default_currency(&self) -> &'static str {
        match self {
            Self::Us => "USD",
            Self::Uk => "GBP",
            Self::De => "EUR",
            Self::Jp => "JPY",
            Self::In => "INR",
        }
    }

    /// US banks need an ABA routing number
    pub fn requires_routing_number(&self) -> bool {
        matches!(self, Self::Us)
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Us => write!(f, "United States"),
            Self::Uk => write!(f, "United Kingdom"),
            Self::De => write!(f, "Germany"),
            Self::Jp => write!(f, "Japan"),
            Self::In => write!(f, "India"),
        }
    }
}

/// A saved beneficiary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beneficiary {
    pub id: BeneficiaryId,

    /// Registered legal name of the recipient
    pub legal_name: String,

    pub bank_name: String,

    /// Full or masked account number
    pub account_number: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swift_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    pub country: Country,

    /// Payout currency code
    pub currency: String,

    pub status: BeneficiaryStatus,

    #[serde(default)]
    pub is_favorite: bool,

    #[serde(default)]
    pub is_default: bool,

    pub created_at: DateTime<Utc>,
}

impl Beneficiary {
    /// Create a new pending beneficiary
    pub fn new(
        legal_name: impl Into<String>,
        bank_name: impl Into<String>,
        account_number: impl Into<String>,
        country: Country,
    ) -> Self {
        Self {
            id: BeneficiaryId::new(),
            legal_name: legal_name.into(),
            bank_name: bank_name.into(),
            account_number: account_number.into(),
            swift_code: None,
            routing_number: None,
            address: None,
            country,
            currency: country.default_currency().to_string(),
            status: BeneficiaryStatus::Pending,
            is_favorite: false,
            is_default: false,
            created_at: Utc::now(),
        }
    }

    /// Account number with all but the last four characters hidden
    pub fn masked_account(&self) -> String {
        let visible: String = self
            .account_number
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("****{}", visible)
    }

    /// Case-insensitive match against name, bank and country
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.legal_name.to_lowercase().contains(&term)
            || self.bank_name.to_lowercase().contains(&term)
            || self.country.to_string().to_lowercase().contains(&term)
    }

    /// Validate the beneficiary
    pub fn validate(&self) -> Result<(), BeneficiaryValidationError> {
        if self.legal_name.trim().is_empty() {
            return Err(BeneficiaryValidationError::EmptyName);
        }

        if self.legal_name.len() > 140 {
            return Err(BeneficiaryValidationError::NameTooLong(self.legal_name.len()));
        }

        if self.bank_name.trim().is_empty() {
            return Err(BeneficiaryValidationError::EmptyBank);
        }

        if self.account_number.trim().is_empty() {
            return Err(BeneficiaryValidationError::EmptyAccountNumber);
        }

        if self.country.requires_routing_number()
            && self
                .routing_number
                .as_deref()
                .map_or(true, |r| r.trim().is_empty())
        {
            return Err(BeneficiaryValidationError::MissingRoutingNumber);
        }

        Ok(())
    }
}

/// Validation errors for beneficiaries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeneficiaryValidationError {
    EmptyName,
    NameTooLong(usize),
    EmptyBank,
    EmptyAccountNumber,
    MissingRoutingNumber,
}

impl fmt::Display for BeneficiaryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Legal name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Legal name too long ({} chars, max 140)", len)
            }
            Self::EmptyBank => write!(f, "Bank name cannot be empty"),
            Self::EmptyAccountNumber => write!(f, "Account number cannot be empty"),
            Self::MissingRoutingNumber => {
                write!(f, "Routing number is required for US beneficiaries")
            }
        }
    }
}

impl std::error::Error for BeneficiaryValidationError {}
