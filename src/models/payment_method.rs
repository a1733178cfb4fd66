//! Payment method model
//!
//! Rails a payment can be sent over, each with a flat fee and an arrival
//! estimate.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// Decimal places method fees are quoted with
pub const FEE_SCALE: u32 = 2;

/// Payment rail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethodKind {
    /// International wire
    #[default]
    Swift,
    /// US domestic ACH
    Ach,
    /// Eurozone SEPA credit transfer
    Sepa,
    /// UK Faster Payments
    Faster,
}

impl PaymentMethodKind {
    /// Parse from the id used in forms and on the command line
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "swift" | "wire" => Some(Self::Swift),
            "ach" => Some(Self::Ach),
            "sepa" => Some(Self::Sepa),
            "faster" | "faster_payments" | "fps" => Some(Self::Faster),
            _ => None,
        }
    }

    /// Stable id string
    pub fn id(&self) -> &'static str {
        match self {
            Self::Swift => "swift",
            Self::Ach => "ach",
            Self::Sepa => "sepa",
            Self::Faster => "faster",
        }
    }
}

impl fmt::Display for PaymentMethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// A payment method offered in the send flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub kind: PaymentMethodKind,

    /// Display name, e.g. "SWIFT Wire"
    pub name: String,

    /// Flat fee, at `FEE_SCALE`, charged in the source currency
    pub fee: Money,

    /// Human-readable arrival estimate
    pub arrival: String,
}

impl PaymentMethod {
    pub fn new(
        kind: PaymentMethodKind,
        name: impl Into<String>,
        fee: Money,
        arrival: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            fee,
            arrival: arrival.into(),
        }
    }
}
