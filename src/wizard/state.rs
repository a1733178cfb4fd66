//! Wizard state and the read-only snapshot handed to renderers

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{RateQuote, SessionId};

use super::definition::FlowKind;
use super::derive::DerivedValues;
use super::timer::TimerState;

/// Mutable record of one wizard session
///
/// Only `WizardEngine` changes it; everything else reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WizardState<F> {
    pub(super) step_index: usize,
    pub(super) fields: F,
    pub(super) derived: DerivedValues,
    pub(super) reference_id: Option<String>,
}

impl<F> WizardState<F> {
    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn fields(&self) -> &F {
        &self.fields
    }

    pub fn derived(&self) -> &DerivedValues {
        &self.derived
    }

    pub fn reference_id(&self) -> Option<&str> {
        self.reference_id.as_deref()
    }
}

/// Everything a renderer needs after a mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardSnapshot {
    pub flow: FlowKind,
    pub session_id: SessionId,
    pub current_step: String,
    pub step_label: String,
    /// 1-based
    pub step_number: usize,
    pub step_count: usize,
    pub progress_percent: u8,
    pub fields: BTreeMap<String, String>,
    pub derived: DerivedValues,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_currency: Option<String>,
    /// Decimal places of the source and target currency
    pub source_scale: u32,
    pub target_scale: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<RateQuote>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_arrival: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer_remaining_seconds: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer_state: Option<TimerState>,
    pub reference_id: Option<String>,
    pub is_complete: bool,
}

impl WizardSnapshot {
    /// Field value or an empty string
    pub fn field(&self, key: &str) -> &str {
        self.fields.get(key).map(String::as_str).unwrap_or("")
    }
}

/// Percentage of the wizard completed when standing on `step_index`
pub fn progress_percent(step_index: usize, step_count: usize) -> u8 {
    if step_count <= 1 {
        return 100;
    }
    let pct = step_index.min(step_count - 1) * 100 / (step_count - 1);
    u8::try_from(pct).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_percent() {
        assert_eq!(progress_percent(0, 3), 0);
        assert_eq!(progress_percent(1, 3), 50);
        assert_eq!(progress_percent(2, 3), 100);
        assert_eq!(progress_percent(3, 7), 50);
        assert_eq!(progress_percent(9, 7), 100);
        assert_eq!(progress_percent(0, 1), 100);
    }

    #[test]
    fn test_default_state() {
        let state: WizardState<BTreeMap<String, String>> = WizardState::default();
        assert_eq!(state.step_index(), 0);
        assert!(state.reference_id().is_none());
        assert_eq!(*state.derived(), DerivedValues::default());
    }
}
