//! Step registry
//!
//! A `WizardDefinition` is the fixed, ordered list of steps for one flow
//! together with the flow's configuration: which step is the review step
//! that finalizes, and which step (if any) issues a rate quote.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::{PaystreetError, PaystreetResult};

use super::derive::Composition;

/// A missing or invalid field on a step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl From<FieldError> for PaystreetError {
    fn from(err: FieldError) -> Self {
        PaystreetError::validation(err.field, err.message)
    }
}

/// Completion predicate for a step
pub type StepCheck<F> = fn(&F) -> Result<(), FieldError>;

/// One screen of a wizard
pub struct Step<F> {
    pub id: &'static str,
    pub label: &'static str,
    check: StepCheck<F>,
}

impl<F> Step<F> {
    pub fn new(id: &'static str, label: &'static str, check: StepCheck<F>) -> Self {
        Self { id, label, check }
    }

    /// A step with nothing to fill in (review and completion screens)
    pub fn always(id: &'static str, label: &'static str) -> Self {
        Self::new(id, label, |_| Ok(()))
    }

    /// Check the step against the current fields
    pub fn check(&self, fields: &F) -> Result<(), FieldError> {
        (self.check)(fields)
    }
}

impl<F> Clone for Step<F> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            label: self.label,
            check: self.check,
        }
    }
}

impl<F> fmt::Debug for Step<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("id", &self.id)
            .field("label", &self.label)
            .finish()
    }
}

/// Which wizard a definition describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowKind {
    SendMoney,
    Beneficiary,
    Conversion,
}

impl FlowKind {
    /// Three-letter prefix of reference ids issued by this flow
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::SendMoney => "PAY",
            Self::Beneficiary => "BEN",
            Self::Conversion => "CNV",
        }
    }

    /// How the flow composes its totals
    pub fn composition(&self) -> Composition {
        match self {
            Self::SendMoney => Composition::Outbound,
            Self::Beneficiary => Composition::None,
            Self::Conversion => Composition::Conversion,
        }
    }

    /// Parse a flow name from the command line
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "send" | "send-money" | "send_money" | "pay" => Some(Self::SendMoney),
            "beneficiary" | "add-beneficiary" | "ben" => Some(Self::Beneficiary),
            "convert" | "conversion" | "fx" => Some(Self::Conversion),
            _ => None,
        }
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SendMoney => write!(f, "Send Money"),
            Self::Beneficiary => write!(f, "Add Beneficiary"),
            Self::Conversion => write!(f, "Currency Conversion"),
        }
    }
}

/// Ordered steps plus flow configuration, fixed at construction
pub struct WizardDefinition<F> {
    kind: FlowKind,
    steps: Vec<Step<F>>,
    review_index: usize,
    quote_index: Option<usize>,
}

impl<F> WizardDefinition<F> {
    /// Build a definition
    ///
    /// # Errors
    ///
    /// - `Config` when there are fewer than two steps or the review step is
    ///   the last one (finalizing needs a terminal step to move to)
    /// - `Duplicate` when two steps share an id
    /// - `NotFound` when the review or quote step id is not in the list, or
    ///   the quote step comes after the review step
    pub fn new(
        kind: FlowKind,
        steps: Vec<Step<F>>,
        review_step: &str,
        quote_step: Option<&str>,
    ) -> PaystreetResult<Self> {
        if steps.len() < 2 {
            return Err(PaystreetError::Config(format!(
                "{} needs at least two steps",
                kind
            )));
        }

        let mut seen = HashSet::new();
        for step in &steps {
            if !seen.insert(step.id) {
                return Err(PaystreetError::Duplicate {
                    entity_type: "Step",
                    identifier: step.id.to_string(),
                });
            }
        }

        let position = |id: &str| {
            steps
                .iter()
                .position(|s| s.id == id)
                .ok_or_else(|| PaystreetError::step_not_found(id))
        };

        let review_index = position(review_step)?;
        if review_index + 1 >= steps.len() {
            return Err(PaystreetError::Config(format!(
                "Review step '{}' cannot be the terminal step",
                review_step
            )));
        }

        let quote_index = match quote_step {
            Some(id) => {
                let index = position(id)?;
                if index >= review_index {
                    return Err(PaystreetError::Config(format!(
                        "Quote step '{}' must come before the review step",
                        id
                    )));
                }
                Some(index)
            }
            None => None,
        };

        Ok(Self {
            kind,
            steps,
            review_index,
            quote_index,
        })
    }

    pub fn kind(&self) -> FlowKind {
        self.kind
    }

    pub fn prefix(&self) -> &'static str {
        self.kind.prefix()
    }

    /// All steps in order
    pub fn steps(&self) -> &[Step<F>] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&Step<F>> {
        self.steps.get(index)
    }

    /// Position of a step id
    pub fn index_of(&self, id: &str) -> PaystreetResult<usize> {
        self.steps
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| PaystreetError::step_not_found(id))
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Index of the terminal step
    pub fn last_index(&self) -> usize {
        self.steps.len() - 1
    }

    pub fn is_terminal(&self, index: usize) -> bool {
        index == self.last_index()
    }

    pub fn review_index(&self) -> usize {
        self.review_index
    }

    pub fn quote_index(&self) -> Option<usize> {
        self.quote_index
    }
}

impl<F> fmt::Debug for WizardDefinition<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WizardDefinition")
            .field("kind", &self.kind)
            .field("steps", &self.steps)
            .field("review_index", &self.review_index)
            .field("quote_index", &self.quote_index)
            .finish()
    }
}
