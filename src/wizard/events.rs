//! Events emitted by the wizards
//!
//! The engine tells the outside world about submissions, rate locks, quote
//! expiry and cancellations through an `EventSink`. Sinks only observe; a
//! failing sink never rolls back a transition that already committed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::{PaystreetError, PaystreetResult};
use crate::models::{RateQuote, SessionId};

use super::definition::FlowKind;
use super::derive::DerivedValues;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WizardEvent {
    /// The wizard was finalized and reached its terminal step
    Submitted {
        flow: FlowKind,
        session_id: SessionId,
        reference_id: String,
        fields: BTreeMap<String, String>,
        derived: DerivedValues,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        quote: Option<RateQuote>,
    },

    /// The quote was locked and the surcharge applied
    RateLocked {
        flow: FlowKind,
        session_id: SessionId,
        quote: RateQuote,
    },

    /// The quote ran out and the wizard went back to the quote step
    QuoteExpired {
        flow: FlowKind,
        session_id: SessionId,
        step: String,
    },

    /// An in-progress wizard was abandoned
    Cancelled {
        flow: FlowKind,
        session_id: SessionId,
        step: String,
    },
}

impl WizardEvent {
    pub fn flow(&self) -> FlowKind {
        match self {
            Self::Submitted { flow, .. }
            | Self::RateLocked { flow, .. }
            | Self::QuoteExpired { flow, .. }
            | Self::Cancelled { flow, .. } => *flow,
        }
    }

    pub fn session_id(&self) -> SessionId {
        match self {
            Self::Submitted { session_id, .. }
            | Self::RateLocked { session_id, .. }
            | Self::QuoteExpired { session_id, .. }
            | Self::Cancelled { session_id, .. } => *session_id,
        }
    }

    /// Short event name, e.g. "submitted"
    pub fn name(&self) -> &'static str {
        match self {
            Self::Submitted { .. } => "submitted",
            Self::RateLocked { .. } => "rate_locked",
            Self::QuoteExpired { .. } => "quote_expired",
            Self::Cancelled { .. } => "cancelled",
        }
    }

    /// One-line summary for display
    pub fn summary(&self) -> String {
        match self {
            Self::Submitted {
                flow, reference_id, ..
            } => format!("{} submitted as {}", flow, reference_id),
            Self::RateLocked { flow, quote, .. } => format!(
                "{}: rate {} {}/{} locked",
                flow, quote.rate, quote.from, quote.to
            ),
            Self::QuoteExpired { flow, step, .. } => {
                format!("{}: quote expired, back to '{}'", flow, step)
            }
            Self::Cancelled { flow, step, .. } => {
                format!("{}: cancelled at '{}'", flow, step)
            }
        }
    }
}

/// Receiver of wizard events
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &WizardEvent) -> PaystreetResult<()>;
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: &WizardEvent) -> PaystreetResult<()> {
        Ok(())
    }
}

/// Keeps events in memory for the UI and tests
#[derive(Debug, Default)]
pub struct MemorySink {
    events: RwLock<Vec<WizardEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything emitted so far, oldest first
    pub fn events(&self) -> Vec<WizardEvent> {
        self.events
            .read()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Most recent event
    pub fn last(&self) -> Option<WizardEvent> {
        self.events
            .read()
            .ok()
            .and_then(|events| events.last().cloned())
    }

    pub fn len(&self) -> usize {
        self.events.read().map(|events| events.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: &WizardEvent) -> PaystreetResult<()> {
        let mut events = self.events.write().map_err(|e| {
            PaystreetError::Io(format!("Failed to acquire write lock: {}", e))
        })?;
        events.push(event.clone());
        Ok(())
    }
}
