//! The one wizard a user is working through
//!
//! `FlowSession` holds at most one active flow. Starting another flow or
//! leaving for the dashboard cancels the current one, which stops its quote
//! countdown and discards its state. Beneficiaries created by the onboarding
//! flow are registered into the shared catalog when the flow is finalized.

use std::sync::Arc;
use tracing::{info, warn};

use crate::catalog::{RateSource, StaticCatalog};
use crate::config::PricingSettings;
use crate::error::{PaystreetError, PaystreetResult};
use crate::flows::{beneficiary, conversion, send_money};
use crate::flows::{BeneficiaryFields, ConversionFields, SendMoneyFields};
use crate::models::{Beneficiary, BeneficiaryId};
use crate::wizard::{
    Clock, EventSink, FieldSet, FlowKind, NullSink, TickOutcome, WizardEngine, WizardSnapshot,
};

/// A running wizard of any kind
pub enum ActiveFlow {
    SendMoney(WizardEngine<SendMoneyFields>),
    Beneficiary(WizardEngine<BeneficiaryFields>),
    Conversion(WizardEngine<ConversionFields>),
}

macro_rules! dispatch {
    ($flow:expr, $engine:ident => $body:expr) => {
        match $flow {
            ActiveFlow::SendMoney($engine) => $body,
            ActiveFlow::Beneficiary($engine) => $body,
            ActiveFlow::Conversion($engine) => $body,
        }
    };
}

impl ActiveFlow {
    pub fn kind(&self) -> FlowKind {
        dispatch!(self, e => e.kind())
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        dispatch!(self, e => e.snapshot())
    }

    /// Keys the current flow accepts in `set_field`
    pub fn field_keys(&self) -> &'static [&'static str] {
        match self {
            Self::SendMoney(_) => SendMoneyFields::keys(),
            Self::Beneficiary(_) => BeneficiaryFields::keys(),
            Self::Conversion(_) => ConversionFields::keys(),
        }
    }

    pub fn is_complete(&self) -> bool {
        dispatch!(self, e => e.is_complete())
    }

    fn set_field(&mut self, key: &str, value: &str) -> PaystreetResult<WizardSnapshot> {
        dispatch!(self, e => e.set_field(key, value))
    }

    fn select_beneficiary(&mut self, id: BeneficiaryId) -> PaystreetResult<WizardSnapshot> {
        dispatch!(self, e => e.select_beneficiary(id))
    }

    fn swap_currencies(&mut self) -> PaystreetResult<WizardSnapshot> {
        dispatch!(self, e => e.swap_currencies())
    }

    fn advance(&mut self) -> PaystreetResult<WizardSnapshot> {
        dispatch!(self, e => e.advance())
    }

    fn retreat(&mut self) -> WizardSnapshot {
        dispatch!(self, e => e.retreat())
    }

    fn lock_rate(&mut self) -> PaystreetResult<WizardSnapshot> {
        dispatch!(self, e => e.lock_rate())
    }

    fn finalize(&mut self) -> PaystreetResult<WizardSnapshot> {
        dispatch!(self, e => e.finalize())
    }

    fn tick(&mut self) -> TickOutcome {
        dispatch!(self, e => e.tick())
    }

    fn cancel(&mut self) -> WizardSnapshot {
        dispatch!(self, e => e.cancel())
    }
}

pub struct FlowSession {
    catalog: Arc<StaticCatalog>,
    rates: Arc<dyn RateSource>,
    events: Arc<dyn EventSink>,
    pricing: PricingSettings,
    clock: Option<Clock>,
    active: Option<ActiveFlow>,
    last_registered: Option<Beneficiary>,
}

impl FlowSession {
    pub fn new(catalog: Arc<StaticCatalog>, rates: Arc<dyn RateSource>) -> Self {
        Self {
            catalog,
            rates,
            events: Arc::new(NullSink),
            pricing: PricingSettings::default(),
            clock: None,
            active: None,
            last_registered: None,
        }
    }

    pub fn with_pricing(mut self, pricing: PricingSettings) -> Self {
        self.pricing = pricing;
        self
    }

    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn catalog(&self) -> &Arc<StaticCatalog> {
        &self.catalog
    }

    pub fn active(&self) -> Option<&ActiveFlow> {
        self.active.as_ref()
    }

    pub fn kind(&self) -> Option<FlowKind> {
        self.active.as_ref().map(ActiveFlow::kind)
    }

    /// Beneficiary added by the most recent onboarding flow
    pub fn last_registered(&self) -> Option<&Beneficiary> {
        self.last_registered.as_ref()
    }

    /// Start a flow, cancelling whatever was running
    pub fn start(&mut self, kind: FlowKind) -> PaystreetResult<WizardSnapshot> {
        let flow = match kind {
            FlowKind::SendMoney => ActiveFlow::SendMoney(self.configure(send_money::engine(
                self.catalog.clone(),
                self.rates.clone(),
            )?)),
            FlowKind::Beneficiary => ActiveFlow::Beneficiary(self.configure(beneficiary::engine(
                self.catalog.clone(),
                self.rates.clone(),
            )?)),
            FlowKind::Conversion => ActiveFlow::Conversion(self.configure(conversion::engine(
                self.catalog.clone(),
                self.rates.clone(),
            )?)),
        };

        self.leave();
        let snapshot = flow.snapshot();
        self.active = Some(flow);
        info!(flow = %kind, "flow started");
        Ok(snapshot)
    }

    fn configure<F: FieldSet>(&self, engine: WizardEngine<F>) -> WizardEngine<F> {
        let engine = engine
            .with_pricing(self.pricing.clone())
            .with_events(self.events.clone());
        match self.clock {
            Some(clock) => engine.with_clock(clock),
            None => engine,
        }
    }

    /// Back to the dashboard: cancel and discard the active flow
    ///
    /// Returns whether a flow was running.
    pub fn leave(&mut self) -> bool {
        match self.active.take() {
            Some(mut flow) => {
                flow.cancel();
                info!(flow = %flow.kind(), "flow closed");
                true
            }
            None => false,
        }
    }

    fn active_mut(&mut self) -> PaystreetResult<&mut ActiveFlow> {
        self.active
            .as_mut()
            .ok_or_else(|| PaystreetError::validation("flow", "No wizard is open"))
    }

    pub fn snapshot(&self) -> Option<WizardSnapshot> {
        self.active.as_ref().map(ActiveFlow::snapshot)
    }

    pub fn set_field(&mut self, key: &str, value: &str) -> PaystreetResult<WizardSnapshot> {
        self.active_mut()?.set_field(key, value)
    }

    pub fn select_beneficiary(&mut self, id: BeneficiaryId) -> PaystreetResult<WizardSnapshot> {
        self.active_mut()?.select_beneficiary(id)
    }

    pub fn swap_currencies(&mut self) -> PaystreetResult<WizardSnapshot> {
        self.active_mut()?.swap_currencies()
    }

    pub fn advance(&mut self) -> PaystreetResult<WizardSnapshot> {
        let at_beneficiary_review = match self.active_mut()? {
            ActiveFlow::Beneficiary(engine) => {
                engine.state().step_index() == engine.definition().review_index()
            }
            _ => false,
        };
        if at_beneficiary_review {
            return self.finalize();
        }
        self.active_mut()?.advance()
    }

    pub fn retreat(&mut self) -> PaystreetResult<WizardSnapshot> {
        Ok(self.active_mut()?.retreat())
    }

    pub fn lock_rate(&mut self) -> PaystreetResult<WizardSnapshot> {
        self.active_mut()?.lock_rate()
    }

    /// Finalize the active flow
    ///
    /// The onboarding flow's beneficiary is checked against the catalog first
    /// and registered once the wizard has committed.
    pub fn finalize(&mut self) -> PaystreetResult<WizardSnapshot> {
        let catalog = self.catalog.clone();
        let (snapshot, registered) = match self.active_mut()? {
            ActiveFlow::Beneficiary(engine) => {
                let at_review =
                    engine.state().step_index() == engine.definition().review_index();
                if !at_review {
                    return engine.finalize();
                }

                let beneficiary = engine.fields().to_beneficiary()?;
                catalog.check_registration(&beneficiary)?;
                let snapshot = engine.finalize()?;
                (snapshot, Some(beneficiary))
            }
            flow => (flow.finalize()?, None),
        };

        if let Some(beneficiary) = registered {
            match catalog.register_beneficiary(beneficiary.clone()) {
                Ok(()) => {
                    info!(beneficiary = %beneficiary.id, "beneficiary registered");
                    self.last_registered = Some(beneficiary);
                }
                Err(e) => warn!("beneficiary not registered: {}", e),
            }
        }
        Ok(snapshot)
    }

    /// Forward one timer tick to the active flow
    pub fn tick(&mut self) -> TickOutcome {
        match self.active.as_mut() {
            Some(flow) => flow.tick(),
            None => TickOutcome::Idle,
        }
    }

    /// Cancel the active flow but keep it open on its first step
    pub fn cancel(&mut self) -> PaystreetResult<WizardSnapshot> {
        Ok(self.active_mut()?.cancel())
    }
}
