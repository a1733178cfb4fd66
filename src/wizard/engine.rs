//! Transition controller
//!
//! `WizardEngine` owns a wizard's state, its rate quote and the quote's
//! countdown, and is the only thing that changes them. Every operation works
//! on a copy and commits it only when the whole transition succeeds, so a
//! failed call leaves the wizard exactly as it was. The one exception is a
//! stale quote: detecting it sends the wizard back to the quote step before
//! `QuoteExpired` is returned.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::catalog::{RateSource, ReferenceData};
use crate::config::PricingSettings;
use crate::error::{PaystreetError, PaystreetResult};
use crate::models::currency::minor_units;
use crate::models::payment_method::FEE_SCALE;
use crate::models::{BeneficiaryId, Money, RateQuote, SessionId};

use super::definition::{FlowKind, Step, WizardDefinition};
use super::derive::{self, Composition, DerivedValues};
use super::events::{EventSink, NullSink, WizardEvent};
use super::fields::FieldSet;
use super::reference::ReferenceGenerator;
use super::state::{progress_percent, WizardSnapshot, WizardState};
use super::timer::{QuoteTimer, TickOutcome};

/// Source of the current time
pub type Clock = fn() -> DateTime<Utc>;

/// Everything a transition may change
#[derive(Debug, Clone)]
struct Session<F> {
    state: WizardState<F>,
    quote: Option<RateQuote>,
    timer: Option<QuoteTimer>,
}

impl<F: Default> Default for Session<F> {
    fn default() -> Self {
        Self {
            state: WizardState::default(),
            quote: None,
            timer: None,
        }
    }
}

pub struct WizardEngine<F: FieldSet> {
    session_id: SessionId,
    definition: WizardDefinition<F>,
    session: Session<F>,
    pricing: PricingSettings,
    catalog: Arc<dyn ReferenceData>,
    rates: Arc<dyn RateSource>,
    events: Arc<dyn EventSink>,
    references: ReferenceGenerator,
    clock: Clock,
}

impl<F: FieldSet> WizardEngine<F> {
    /// Start a wizard on its first step with default pricing
    pub fn new(
        definition: WizardDefinition<F>,
        catalog: Arc<dyn ReferenceData>,
        rates: Arc<dyn RateSource>,
    ) -> Self {
        let mut engine = Self {
            session_id: SessionId::new(),
            definition,
            session: Session::default(),
            pricing: PricingSettings::default(),
            catalog,
            rates,
            events: Arc::new(NullSink),
            references: ReferenceGenerator::new(),
            clock: Utc::now,
        };
        engine.session.state.derived = engine.derive_quietly(&engine.session);
        engine
    }

    /// Use configured fees, markup and quote lifetime
    pub fn with_pricing(mut self, pricing: PricingSettings) -> Self {
        self.pricing = pricing;
        self.session.state.derived = self.derive_quietly(&self.session);
        self
    }

    /// Send events to `sink`
    pub fn with_events(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.events = sink;
        self
    }

    /// Replace the wall clock
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn kind(&self) -> FlowKind {
        self.definition.kind()
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn definition(&self) -> &WizardDefinition<F> {
        &self.definition
    }

    pub fn state(&self) -> &WizardState<F> {
        &self.session.state
    }

    pub fn fields(&self) -> &F {
        &self.session.state.fields
    }

    pub fn quote(&self) -> Option<&RateQuote> {
        self.session.quote.as_ref()
    }

    pub fn timer(&self) -> Option<&QuoteTimer> {
        self.session.timer.as_ref()
    }

    pub fn pricing(&self) -> &PricingSettings {
        &self.pricing
    }

    pub fn current_step(&self) -> &Step<F> {
        &self.definition.steps()[self.current_index()]
    }

    pub fn is_complete(&self) -> bool {
        self.definition.is_terminal(self.current_index())
    }

    fn current_index(&self) -> usize {
        self.session.state.step_index.min(self.definition.last_index())
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Store a field value and recompute derived values
    ///
    /// Changing the currency pair after a quote was issued drops the quote
    /// and returns to the quote step.
    pub fn set_field(&mut self, key: &str, value: &str) -> PaystreetResult<WizardSnapshot> {
        if self.is_complete() {
            return Err(PaystreetError::validation(
                key,
                "This wizard is complete; reset it to start again",
            ));
        }

        let mut next = self.session.clone();
        let before = next.state.fields.pricing();

        if F::BENEFICIARY_FIELD == Some(key) && !value.trim().is_empty() {
            let beneficiary = self.catalog.find_beneficiary_by_ref(value).map_err(|e| {
                error!(flow = %self.kind(), reference = value, "beneficiary lookup failed: {}", e);
                e
            })?;
            next.state.fields.apply_beneficiary(&beneficiary);
        } else {
            next.state.fields.set(key, value).map_err(|e| {
                if e.is_not_found() {
                    error!(flow = %self.kind(), key, "unknown field");
                } else {
                    warn!(flow = %self.kind(), key, "rejected field value: {}", e);
                }
                e
            })?;
        }

        let after = next.state.fields.pricing();
        let pair_changed = before.source_currency != after.source_currency
            || before.target_currency != after.target_currency;
        if pair_changed && next.quote.is_some() {
            self.drop_quote(&mut next);
            debug!(flow = %self.kind(), "currency pair changed, quote dropped");
        }

        next.state.derived = self.derive_values(&next)?;
        self.session = next;
        debug!(flow = %self.kind(), key, "field updated");
        Ok(self.snapshot())
    }

    /// Fill the recipient from a saved beneficiary
    pub fn select_beneficiary(&mut self, id: BeneficiaryId) -> PaystreetResult<WizardSnapshot> {
        let field = F::BENEFICIARY_FIELD.ok_or_else(|| {
            PaystreetError::validation("beneficiary", "This wizard does not use saved beneficiaries")
        })?;
        let beneficiary = self.catalog.find_beneficiary(id).map_err(|e| {
            error!(flow = %self.kind(), %id, "beneficiary lookup failed: {}", e);
            e
        })?;
        self.set_field(field, &beneficiary.id.short())
    }

    /// Exchange source and target currency on the quote step
    pub fn swap_currencies(&mut self) -> PaystreetResult<WizardSnapshot> {
        let quote_index = self.definition.quote_index().ok_or_else(|| {
            PaystreetError::validation("to", "This wizard has no currency pair")
        })?;
        if self.current_index() != quote_index {
            return Err(PaystreetError::validation(
                "from",
                "Currencies can only be swapped while requesting a quote",
            ));
        }

        let mut next = self.session.clone();
        if !next.state.fields.swap_currencies() {
            return Err(PaystreetError::validation("to", "This wizard has no currency pair"));
        }
        next.state.derived = self.derive_values(&next)?;
        self.session = next;
        debug!(flow = %self.kind(), "currencies swapped");
        Ok(self.snapshot())
    }

    /// Move to the next step
    ///
    /// The current step is re-validated against the current fields. On the
    /// review step this finalizes; on the terminal step it does nothing.
    pub fn advance(&mut self) -> PaystreetResult<WizardSnapshot> {
        let index = self.current_index();

        if self.definition.is_terminal(index) {
            debug!(flow = %self.kind(), "advance at terminal step ignored");
            return Ok(self.snapshot());
        }
        if index == self.definition.review_index() {
            return self.finalize();
        }

        if let Some(quote_index) = self.definition.quote_index() {
            if index > quote_index {
                self.ensure_quote_valid()?;
            }
        }

        let step = &self.definition.steps()[index];
        if let Err(e) = step.check(&self.session.state.fields) {
            warn!(flow = %self.kind(), step = step.id, field = e.field, "step incomplete: {}", e.message);
            return Err(e.into());
        }

        let mut next = self.session.clone();
        if Some(index) == self.definition.quote_index() {
            let quote = self.issue_quote(&next.state.fields)?;
            info!(
                flow = %self.kind(),
                from = %quote.from,
                to = %quote.to,
                rate = %quote.rate,
                "quote issued"
            );
            next.quote = Some(quote);
            next.timer = Some(QuoteTimer::new(self.pricing.quote_ttl_seconds));
        }

        next.state.step_index = index + 1;
        next.state.derived = self.derive_values(&next)?;
        self.session = next;
        debug!(flow = %self.kind(), step = self.current_step().id, "advanced");
        Ok(self.snapshot())
    }

    /// Move to the previous step
    ///
    /// Never fails. Going back to the quote step drops the quote and stops
    /// its countdown. A completed wizard stays complete until `reset`.
    pub fn retreat(&mut self) -> WizardSnapshot {
        let index = self.current_index();
        if index == 0 || self.definition.is_terminal(index) {
            debug!(flow = %self.kind(), "retreat ignored");
            return self.snapshot();
        }

        let mut next = self.session.clone();
        next.state.step_index = index - 1;
        if Some(next.state.step_index) == self.definition.quote_index() {
            next.quote = None;
            next.timer = None;
        }
        next.state.derived = self.derive_quietly(&next);
        self.session = next;
        debug!(flow = %self.kind(), step = self.current_step().id, "retreated");
        self.snapshot()
    }

    /// Lock the quoted rate
    ///
    /// Resets the quote's validity once and adds the lock surcharge to the
    /// fee. Locking an already locked quote changes nothing.
    pub fn lock_rate(&mut self) -> PaystreetResult<WizardSnapshot> {
        if self.definition.quote_index().is_none() {
            return Err(PaystreetError::validation("rate", "This wizard has no rate to lock"));
        }
        if self.is_complete() {
            return Err(PaystreetError::validation("rate", "This wizard is already complete"));
        }

        match &self.session.quote {
            None => {
                return Err(PaystreetError::validation("rate", "Request a quote first"));
            }
            Some(quote) if quote.locked => {
                debug!(flow = %self.kind(), "rate already locked");
                return Ok(self.snapshot());
            }
            Some(_) => {}
        }

        self.ensure_quote_valid()?;

        let mut next = self.session.clone();
        let now = self.now();
        let ttl = self.pricing.quote_ttl_seconds;
        if let Some(quote) = next.quote.as_mut() {
            let surcharge = self.pricing.rate_lock_fee_in(minor_units(&quote.to))?;
            quote.lock(now, ttl, surcharge)?;
        }
        if let Some(timer) = next.timer.as_mut() {
            timer.lock();
        }
        next.state.derived = self.derive_values(&next)?;
        self.session = next;

        if let Some(quote) = &self.session.quote {
            info!(flow = %self.kind(), fee = %quote.fee, "rate locked");
            self.emit(WizardEvent::RateLocked {
                flow: self.kind(),
                session_id: self.session_id,
                quote: quote.clone(),
            });
        }
        Ok(self.snapshot())
    }

    /// Submit from the review step
    ///
    /// Re-validates every earlier step, issues a reference id, moves to the
    /// terminal step and emits `Submitted`. Calling it again once complete
    /// returns the same state.
    pub fn finalize(&mut self) -> PaystreetResult<WizardSnapshot> {
        let index = self.current_index();
        if self.definition.is_terminal(index) {
            debug!(flow = %self.kind(), "already finalized");
            return Ok(self.snapshot());
        }

        let review = self.definition.review_index();
        if index != review {
            return Err(PaystreetError::validation(
                "step",
                format!(
                    "Submit is only available on the '{}' step",
                    self.definition.steps()[review].id
                ),
            ));
        }

        if self.definition.quote_index().is_some() {
            self.ensure_quote_valid()?;
        }

        for step in &self.definition.steps()[..review] {
            if let Err(e) = step.check(&self.session.state.fields) {
                warn!(flow = %self.kind(), step = step.id, field = e.field, "cannot submit: {}", e.message);
                return Err(e.into());
            }
        }

        let mut next = self.session.clone();
        next.state.step_index = self.definition.last_index();
        next.timer = None;
        next.state.derived = self.derive_values(&next)?;
        let now = self.now();
        let reference_id = self.references.next(self.definition.prefix(), now);
        next.state.reference_id = Some(reference_id.clone());
        self.session = next;

        info!(flow = %self.kind(), reference_id = %reference_id, "wizard submitted");
        self.emit(WizardEvent::Submitted {
            flow: self.kind(),
            session_id: self.session_id,
            reference_id,
            fields: self.session.state.fields.to_map(),
            derived: self.session.state.derived,
            quote: self.session.quote.clone(),
        });
        Ok(self.snapshot())
    }

    /// One second of the quote countdown
    ///
    /// Without a running countdown this does nothing. When the countdown runs
    /// out the wizard returns to the quote step.
    pub fn tick(&mut self) -> TickOutcome {
        let outcome = match self.session.timer.as_mut() {
            Some(timer) => timer.tick(),
            None => return TickOutcome::Idle,
        };

        if outcome == TickOutcome::Expired {
            self.expire_quote();
        }
        outcome
    }

    /// Abandon the wizard and start over on the first step
    pub fn cancel(&mut self) -> WizardSnapshot {
        let in_progress = !self.is_complete()
            && (self.current_index() > 0
                || self.session.quote.is_some()
                || self.session.state.fields.to_map() != F::default().to_map());

        let step = self.current_step().id.to_string();
        self.restart();

        if in_progress {
            info!(flow = %self.kind(), step = %step, "wizard cancelled");
            self.emit(WizardEvent::Cancelled {
                flow: self.kind(),
                session_id: self.session_id,
                step,
            });
        }
        self.session_id = SessionId::new();
        self.snapshot()
    }

    /// Start over, e.g. after completion
    ///
    /// Same as `cancel`: an unfinished session is reported as cancelled.
    pub fn reset(&mut self) -> WizardSnapshot {
        self.cancel()
    }

    fn restart(&mut self) {
        let mut fresh = Session::default();
        fresh.state.derived = self.derive_quietly(&fresh);
        self.session = fresh;
    }

    /// Read-only view for rendering
    pub fn snapshot(&self) -> WizardSnapshot {
        let index = self.current_index();
        let step = &self.definition.steps()[index];
        let inputs = self.session.state.fields.pricing();
        let composition = self.kind().composition();

        let method = match composition {
            Composition::Outbound => inputs
                .payment_method
                .as_deref()
                .and_then(|id| self.catalog.find_payment_method(id).ok()),
            _ => None,
        };

        let quote = match composition {
            Composition::Conversion => self
                .session
                .quote
                .clone()
                .or_else(|| self.indicative_quote(&self.session.state.fields)),
            _ => None,
        };

        let source_scale = inputs.source_currency.as_deref().map(minor_units).unwrap_or(2);
        let target_scale = inputs.target_currency.as_deref().map(minor_units).unwrap_or(2);

        WizardSnapshot {
            flow: self.kind(),
            session_id: self.session_id,
            current_step: step.id.to_string(),
            step_label: step.label.to_string(),
            step_number: index + 1,
            step_count: self.definition.len(),
            progress_percent: progress_percent(index, self.definition.len()),
            fields: self.session.state.fields.to_map(),
            derived: self.session.state.derived,
            source_currency: inputs.source_currency,
            target_currency: inputs.target_currency,
            source_scale,
            target_scale,
            quote,
            payment_method: method.as_ref().map(|m| m.name.clone()),
            expected_arrival: method.map(|m| m.arrival),
            timer_remaining_seconds: self.session.timer.as_ref().map(|t| t.remaining()),
            timer_state: self.session.timer.as_ref().map(|t| t.state()),
            reference_id: self.session.state.reference_id.clone(),
            is_complete: self.definition.is_terminal(index),
        }
    }

    /// Check the quote is still usable; if not, fall back to the quote step
    fn ensure_quote_valid(&mut self) -> PaystreetResult<()> {
        let now = self.now();
        let valid = self.session.quote.as_ref().map(|q| q.is_valid_at(now)).unwrap_or(false);
        if valid {
            return Ok(());
        }
        self.expire_quote();
        Err(PaystreetError::QuoteExpired)
    }

    fn expire_quote(&mut self) {
        let Some(quote_index) = self.definition.quote_index() else {
            return;
        };

        let mut next = self.session.clone();
        self.drop_quote(&mut next);
        next.state.derived = self.derive_quietly(&next);
        self.session = next;

        let step = self.definition.steps()[quote_index].id.to_string();
        info!(flow = %self.kind(), step = %step, "quote expired");
        self.emit(WizardEvent::QuoteExpired {
            flow: self.kind(),
            session_id: self.session_id,
            step,
        });
    }

    /// Forget the quote and its countdown, returning to the quote step
    fn drop_quote(&self, session: &mut Session<F>) {
        session.quote = None;
        session.timer = None;
        if let Some(quote_index) = self.definition.quote_index() {
            if session.state.step_index > quote_index
                && !self.definition.is_terminal(session.state.step_index)
            {
                session.state.step_index = quote_index;
            }
        }
    }

    fn issue_quote(&self, fields: &F) -> PaystreetResult<RateQuote> {
        let inputs = fields.pricing();
        let from = inputs
            .source_currency
            .ok_or_else(|| PaystreetError::validation("from", "Choose a currency to convert from"))?;
        let to = inputs
            .target_currency
            .ok_or_else(|| PaystreetError::validation("to", "Choose a currency to convert to"))?;

        let rate = self.rates.rate(&from, &to).map_err(|e| {
            error!(flow = %self.kind(), %from, %to, "no rate: {}", e);
            e
        })?;
        let fee = self.pricing.conversion_fee_in(minor_units(&to))?;

        Ok(RateQuote::new(
            from,
            to,
            rate,
            self.pricing.markup_percent,
            fee,
            self.now(),
            self.pricing.quote_ttl_seconds,
        ))
    }

    /// Quote shown on the quote step before one is issued
    fn indicative_quote(&self, fields: &F) -> Option<RateQuote> {
        self.issue_quote(fields).ok()
    }

    /// Quote the derivation runs against, if the fields can be priced
    fn pricing_quote(&self, session: &Session<F>) -> PaystreetResult<Option<RateQuote>> {
        let inputs = session.state.fields.pricing();
        match self.kind().composition() {
            Composition::None => Ok(None),
            Composition::Conversion => Ok(session
                .quote
                .clone()
                .or_else(|| self.indicative_quote(&session.state.fields))),
            Composition::Outbound => {
                let Some(currency) = inputs.source_currency else {
                    return Ok(None);
                };
                let fee = match inputs
                    .payment_method
                    .as_deref()
                    .and_then(|id| self.catalog.find_payment_method(id).ok())
                {
                    Some(method) => derive::rescale(method.fee, FEE_SCALE, minor_units(&currency))?,
                    None => Money::zero(),
                };
                Ok(Some(RateQuote::flat_fee(
                    currency,
                    fee,
                    self.now(),
                    self.pricing.quote_ttl_seconds,
                )))
            }
        }
    }

    /// Derived values for a candidate session
    ///
    /// An amount that does not parse or is not positive derives to zero;
    /// step validation reports it.
    fn derive_values(&self, session: &Session<F>) -> PaystreetResult<DerivedValues> {
        let inputs = session.state.fields.pricing();
        let Some(quote) = self.pricing_quote(session)? else {
            return Ok(DerivedValues::default());
        };

        let source_scale = minor_units(&quote.from);
        let amount = match Money::parse(&inputs.amount, source_scale) {
            Ok(amount) if amount.is_positive() => amount,
            _ => return Ok(DerivedValues::default()),
        };

        derive::derive(
            amount,
            source_scale,
            &quote,
            minor_units(&quote.to),
            self.kind().composition(),
        )
    }

    fn derive_quietly(&self, session: &Session<F>) -> DerivedValues {
        self.derive_values(session).unwrap_or_default()
    }

    fn emit(&self, event: WizardEvent) {
        if let Err(e) = self.events.emit(&event) {
            warn!(event = event.name(), "failed to record wizard event: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{seed, StaticCatalog, StaticRates};
    use crate::flows::{beneficiary, conversion, send_money};
    use crate::flows::{BeneficiaryFields, ConversionFields, SendMoneyFields};
    use crate::wizard::events::MemorySink;
    use crate::wizard::timer::TimerState;
    use chrono::TimeZone;
    use rust_decimal::Decimal;
    use std::cell::Cell;

    const START: i64 = 1_736_942_400; // 2025-01-15 12:00:00 UTC

    thread_local! {
        static NOW: Cell<i64> = Cell::new(START);
    }

    fn test_clock() -> DateTime<Utc> {
        Utc.timestamp_opt(NOW.with(|n| n.get()), 0).unwrap()
    }

    fn advance_clock(seconds: i64) {
        NOW.with(|n| n.set(n.get() + seconds));
    }

    fn conversion_engine() -> (WizardEngine<ConversionFields>, Arc<MemorySink>) {
        NOW.with(|n| n.set(START));
        let sink = Arc::new(MemorySink::new());
        let engine = conversion::engine(Arc::new(StaticCatalog::new()), Arc::new(StaticRates::new()))
            .unwrap()
            .with_events(sink.clone())
            .with_clock(test_clock);
        (engine, sink)
    }

    fn send_engine() -> (WizardEngine<SendMoneyFields>, Arc<MemorySink>) {
        NOW.with(|n| n.set(START));
        let sink = Arc::new(MemorySink::new());
        let engine = send_money::engine(Arc::new(StaticCatalog::new()), Arc::new(StaticRates::new()))
            .unwrap()
            .with_events(sink.clone())
            .with_clock(test_clock);
        (engine, sink)
    }

    fn at_conversion_review() -> (WizardEngine<ConversionFields>, Arc<MemorySink>) {
        let (mut engine, sink) = conversion_engine();
        engine.set_field("amount", "1000").unwrap();
        engine.advance().unwrap();
        (engine, sink)
    }

    fn send_to_review(engine: &mut WizardEngine<SendMoneyFields>) {
        engine.set_field("recipient_id", "Microsoft Corporation").unwrap();
        engine.advance().unwrap();
        engine.advance().unwrap();
        engine.set_field("amount", "500").unwrap();
        engine.set_field("purpose", "invoice").unwrap();
        engine.advance().unwrap();
        engine.advance().unwrap();
        engine.advance().unwrap();
        assert_eq!(engine.current_step().id, "review");
    }

    #[test]
    fn test_scenario_a_conversion_quote() {
        let (engine, _) = at_conversion_review();
        let snap = engine.snapshot();

        assert_eq!(snap.current_step, "review");
        let quote = snap.quote.unwrap();
        assert_eq!(quote.rate, Decimal::new(85, 2));
        assert_eq!(snap.derived.fee, Money::from_minor(500));
        // 1000 * 0.85 = 850.00, less the 5.00 fee
        assert_eq!(snap.derived.converted_amount, Money::from_minor(84_500));
        assert_eq!(snap.derived.total, snap.derived.converted_amount);
        assert_eq!(snap.timer_state, Some(TimerState::Active));
        assert_eq!(snap.timer_remaining_seconds, Some(300));
    }

    #[test]
    fn test_scenario_b_method_change_recomputes_total() {
        let (mut engine, _) = send_engine();
        engine.set_field("amount", "500").unwrap();

        let snap = engine.snapshot();
        assert_eq!(snap.derived.fee, Money::from_minor(2_500));
        assert_eq!(snap.derived.total, Money::from_minor(52_500));
        assert_eq!(snap.expected_arrival.as_deref(), Some("1-2 business days"));

        let snap = engine.set_field("payment_method", "faster").unwrap();
        assert_eq!(snap.derived.total, Money::from_minor(50_100));
        assert_eq!(snap.field("amount"), "500");
        assert_eq!(snap.payment_method.as_deref(), Some("Faster Payments"));
    }

    #[test]
    fn test_amount_too_large_for_total_is_rejected() {
        let (mut engine, _) = send_engine();
        engine.set_field("amount", "500").unwrap();
        let before = engine.state().clone();

        let err = engine.set_field("amount", "92233720368547758.07").unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.field(), Some("amount"));
        assert_eq!(*engine.state(), before);
    }

    #[test]
    fn test_double_negative_amount_blocks_quote() {
        let (mut engine, _) = conversion_engine();
        engine.set_field("amount", "--5").unwrap();

        let err = engine.advance().unwrap_err();
        assert_eq!(err.field(), Some("amount"));
        assert_eq!(engine.current_step().id, "quote");
        assert!(engine.quote().is_none());
    }

    #[test]
    fn test_scenario_c_expiry_reverts_to_quote_step() {
        let (mut engine, sink) = at_conversion_review();

        for _ in 0..301 {
            engine.tick();
        }

        let snap = engine.snapshot();
        assert_eq!(snap.current_step, "quote");
        assert!(snap.reference_id.is_none());
        assert!(engine.quote().is_none());
        assert!(engine.timer().is_none());
        assert_eq!(snap.field("amount"), "1000");
        assert_eq!(sink.last().unwrap().name(), "quote_expired");
    }

    #[test]
    fn test_expiry_happens_on_the_last_second() {
        let (mut engine, _) = at_conversion_review();
        for _ in 0..299 {
            assert!(matches!(engine.tick(), TickOutcome::Counting(_)));
        }
        assert_eq!(engine.snapshot().timer_remaining_seconds, Some(1));
        assert_eq!(engine.tick(), TickOutcome::Expired);
        assert_eq!(engine.tick(), TickOutcome::Idle);
    }

    #[test]
    fn test_scenario_d_blank_amount_blocks_advance() {
        let (mut engine, _) = send_engine();
        engine.set_field("recipient_name", "Acme Ltd").unwrap();
        engine.advance().unwrap();
        engine.set_field("bank_name", "Barclays").unwrap();
        engine.set_field("account_number", "20325341").unwrap();
        engine.advance().unwrap();
        engine.set_field("purpose", "goods").unwrap();
        engine.set_field("amount", "").unwrap();

        let before = engine.state().clone();
        let err = engine.advance().unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.field(), Some("amount"));
        assert_eq!(engine.current_step().id, "amount");
        assert_eq!(*engine.state(), before);
    }

    #[test]
    fn test_scenario_e_second_finalize_is_noop() {
        let (mut engine, sink) = send_engine();
        send_to_review(&mut engine);

        let first = engine.finalize().unwrap();
        let reference = first.reference_id.clone().unwrap();
        assert!(reference.starts_with("PAY"));
        assert_eq!(reference.len(), 11);
        assert_eq!(first.current_step, "complete");

        let second = engine.finalize().unwrap();
        assert_eq!(second.reference_id.as_deref(), Some(reference.as_str()));
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.last().unwrap().name(), "submitted");
    }

    #[test]
    fn test_retreat_then_advance_round_trip() {
        let (mut engine, _) = send_engine();
        send_to_review(&mut engine);
        let fields = engine.fields().clone();
        let index = engine.state().step_index();

        engine.retreat();
        assert_eq!(engine.state().step_index(), index - 1);
        engine.advance().unwrap();

        assert_eq!(engine.state().step_index(), index);
        assert_eq!(*engine.fields(), fields);
    }

    #[test]
    fn test_round_trip_through_quote_step() {
        let (mut engine, _) = at_conversion_review();
        engine.retreat();
        assert_eq!(engine.current_step().id, "quote");
        assert!(engine.timer().is_none());

        engine.advance().unwrap();
        assert_eq!(engine.current_step().id, "review");
        assert_eq!(engine.fields().amount, "1000");
        assert_eq!(engine.timer().unwrap().remaining(), 300);
    }

    #[test]
    fn test_advance_is_idempotent_at_terminal() {
        let (mut engine, _) = at_conversion_review();
        engine.advance().unwrap();
        assert!(engine.is_complete());
        let reference = engine.state().reference_id().map(String::from);

        for _ in 0..3 {
            let snap = engine.advance().unwrap();
            assert_eq!(snap.current_step, "complete");
            assert_eq!(snap.reference_id, reference);
        }
    }

    #[test]
    fn test_retreat_floors_at_first_step() {
        let (mut engine, _) = send_engine();
        let snap = engine.retreat();
        assert_eq!(snap.step_number, 1);
        assert_eq!(snap.progress_percent, 0);
    }

    #[test]
    fn test_cleared_field_is_revalidated() {
        let (mut engine, _) = send_engine();
        send_to_review(&mut engine);

        engine.retreat(); // schedule
        engine.retreat(); // method
        engine.retreat(); // amount
        engine.set_field("amount", "").unwrap();
        assert!(engine.advance().unwrap_err().is_validation());
        assert_eq!(engine.current_step().id, "amount");
    }

    #[test]
    fn test_finalize_only_from_review() {
        let (mut engine, _) = send_engine();
        let err = engine.finalize().unwrap_err();
        assert_eq!(err.field(), Some("step"));
        assert_eq!(engine.state().step_index(), 0);
    }

    #[test]
    fn test_lock_is_one_way() {
        let (mut engine, sink) = at_conversion_review();
        for _ in 0..100 {
            engine.tick();
        }

        let snap = engine.lock_rate().unwrap();
        assert_eq!(snap.timer_state, Some(TimerState::Locked));
        assert_eq!(snap.timer_remaining_seconds, Some(300));
        // 5.00 conversion fee + 2.50 lock surcharge
        assert_eq!(snap.derived.fee, Money::from_minor(750));
        assert_eq!(snap.derived.converted_amount, Money::from_minor(84_250));

        let again = engine.lock_rate().unwrap();
        assert_eq!(again.derived.fee, Money::from_minor(750));
        assert_eq!(sink.events().iter().filter(|e| e.name() == "rate_locked").count(), 1);
    }

    #[test]
    fn test_locked_quote_survives_ticks_and_clock() {
        let (mut engine, _) = at_conversion_review();
        engine.lock_rate().unwrap();

        for _ in 0..1_000 {
            assert_eq!(engine.tick(), TickOutcome::Idle);
        }
        advance_clock(3_600);

        let snap = engine.finalize().unwrap();
        assert!(snap.reference_id.unwrap().starts_with("CNV"));
        assert!(engine.timer().is_none());
    }

    #[test]
    fn test_stale_quote_on_wall_clock() {
        let (mut engine, sink) = at_conversion_review();
        advance_clock(301);

        let err = engine.finalize().unwrap_err();
        assert!(err.is_quote_expired());
        assert_eq!(engine.current_step().id, "quote");
        assert!(engine.state().reference_id().is_none());
        assert_eq!(sink.last().unwrap().name(), "quote_expired");
    }

    #[test]
    fn test_lock_without_quote() {
        let (mut engine, _) = conversion_engine();
        assert!(engine.lock_rate().unwrap_err().is_validation());

        let (mut send, _) = send_engine();
        assert!(send.lock_rate().unwrap_err().is_validation());
    }

    #[test]
    fn test_no_tick_after_finalize_or_cancel() {
        let (mut engine, _) = at_conversion_review();
        engine.finalize().unwrap();
        let reference = engine.state().reference_id().map(String::from);
        for _ in 0..400 {
            assert_eq!(engine.tick(), TickOutcome::Idle);
        }
        assert_eq!(engine.current_step().id, "complete");
        assert_eq!(engine.state().reference_id().map(String::from), reference);

        let (mut engine, _) = at_conversion_review();
        engine.cancel();
        assert_eq!(engine.tick(), TickOutcome::Idle);
        assert_eq!(engine.current_step().id, "quote");
    }

    #[test]
    fn test_cancel_resets_and_reports() {
        let (mut engine, sink) = at_conversion_review();
        let old_session = engine.session_id();

        let snap = engine.cancel();
        assert_eq!(snap.current_step, "quote");
        assert_eq!(snap.field("amount"), "");
        assert!(snap.quote.as_ref().map(|q| !q.locked).unwrap_or(true));
        assert!(engine.quote().is_none());
        assert_ne!(engine.session_id(), old_session);

        let event = sink.last().unwrap();
        assert_eq!(event.name(), "cancelled");
        assert_eq!(event.session_id(), old_session);
    }

    #[test]
    fn test_reset_after_completion_is_silent() {
        let (mut engine, sink) = at_conversion_review();
        engine.finalize().unwrap();
        let count = sink.len();

        let snap = engine.reset();
        assert_eq!(snap.current_step, "quote");
        assert!(snap.reference_id.is_none());
        assert_eq!(sink.len(), count);
    }

    #[test]
    fn test_unknown_field_leaves_state() {
        let (mut engine, _) = send_engine();
        engine.set_field("amount", "12").unwrap();
        let before = engine.state().clone();

        let err = engine.set_field("iban", "GB29").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(*engine.state(), before);
    }

    #[test]
    fn test_unknown_beneficiary_leaves_state() {
        let (mut engine, _) = send_engine();
        engine.set_field("recipient_name", "Typed Name").unwrap();
        let before = engine.state().clone();

        let err = engine.set_field("recipient_id", "ben-deadbeef").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(*engine.state(), before);

        let err = engine.select_beneficiary(BeneficiaryId::from_u128(0xffff)).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(*engine.state(), before);
    }

    #[test]
    fn test_select_beneficiary() {
        let (mut engine, _) = send_engine();
        let snap = engine.select_beneficiary(seed::SHOPIFY_ID).unwrap();
        assert_eq!(snap.field("recipient_name"), "Shopify Inc.");
        assert_eq!(snap.field("bank_name"), "Deutsche Bank");
        assert_eq!(snap.source_currency.as_deref(), Some("EUR"));
        assert_eq!(snap.current_step, "recipient");
    }

    #[test]
    fn test_jpy_send_fee_uses_zero_decimals() {
        let (mut engine, _) = send_engine();
        engine.set_field("currency", "JPY").unwrap();
        let snap = engine.set_field("amount", "10000").unwrap();
        assert_eq!(snap.derived.fee, Money::from_minor(25));
        assert_eq!(snap.derived.total, Money::from_minor(10_025));
    }

    #[test]
    fn test_swap_currencies_inverts_rate() {
        let (mut engine, _) = conversion_engine();
        engine.set_field("amount", "100").unwrap();

        let snap = engine.swap_currencies().unwrap();
        assert_eq!(snap.source_currency.as_deref(), Some("EUR"));
        assert_eq!(snap.quote.unwrap().rate, Decimal::new(1_176_471, 6));

        engine.advance().unwrap();
        let err = engine.swap_currencies().unwrap_err();
        assert!(err.is_validation());
        assert_eq!(engine.fields().from, "EUR");
    }

    #[test]
    fn test_pair_change_at_review_drops_quote() {
        let (mut engine, _) = at_conversion_review();
        let snap = engine.set_field("to", "GBP").unwrap();
        assert_eq!(snap.current_step, "quote");
        assert!(engine.quote().is_none());
        assert!(engine.timer().is_none());
    }

    #[test]
    fn test_amount_change_at_review_keeps_quote() {
        let (mut engine, _) = at_conversion_review();
        let snap = engine.set_field("amount", "2000").unwrap();
        assert_eq!(snap.current_step, "review");
        // 2000 * 0.85 - 5.00
        assert_eq!(snap.derived.converted_amount, Money::from_minor(169_500));
    }

    #[test]
    fn test_same_currency_rejected() {
        let (mut engine, _) = conversion_engine();
        engine.set_field("amount", "100").unwrap();
        engine.set_field("to", "USD").unwrap();
        let err = engine.advance().unwrap_err();
        assert_eq!(err.field(), Some("to"));
    }

    #[test]
    fn test_edit_after_completion_rejected() {
        let (mut engine, _) = at_conversion_review();
        engine.finalize().unwrap();
        assert!(engine.set_field("amount", "5").unwrap_err().is_validation());
        assert_eq!(engine.retreat().current_step, "complete");
    }

    #[test]
    fn test_beneficiary_flow_finalizes_from_confirm() {
        let sink = Arc::new(MemorySink::new());
        let mut engine: WizardEngine<BeneficiaryFields> =
            beneficiary::engine(Arc::new(StaticCatalog::new()), Arc::new(StaticRates::new()))
                .unwrap()
                .with_events(sink.clone());

        engine.set_field("legal_name", "Globex GmbH").unwrap();
        engine.set_field("country", "de").unwrap();
        engine.advance().unwrap();
        engine.set_field("bank_name", "Commerzbank").unwrap();
        engine.set_field("account_number", "DE89370400440532013000").unwrap();
        engine.advance().unwrap();
        engine.advance().unwrap();
        assert_eq!(engine.current_step().id, "confirm");

        let snap = engine.advance().unwrap();
        assert_eq!(snap.current_step, "manage");
        assert!(snap.reference_id.unwrap().starts_with("BEN"));
        assert_eq!(snap.derived, DerivedValues::default());
        assert_eq!(snap.step_count, 5);
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_snapshot_serializes() {
        let (engine, _) = at_conversion_review();
        let json = serde_json::to_string(&engine.snapshot()).unwrap();
        assert!(json.contains(r#""current_step":"review""#));
        assert!(json.contains(r#""timer_state":"active""#));
        let yaml = serde_yaml::to_string(&engine.snapshot()).unwrap();
        assert!(yaml.contains("flow: conversion"));
    }
}
