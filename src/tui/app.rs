//! Application state for the TUI
//!
//! The App struct holds the flow session plus everything needed for
//! rendering and handling events. The quote countdown thread runs only while
//! the active flow's timer is `Active`.

use std::sync::mpsc;
use std::time::Duration;

use tracing::debug;

use crate::error::PaystreetResult;
use crate::session::FlowSession;
use crate::ticker::TickerHandle;
use crate::wizard::{FlowKind, TickOutcome, TimerState, WizardSnapshot};

use super::event::Event;
use super::widgets::input::TextInput;

/// Flows offered on the dashboard, in menu order
pub const MENU: [FlowKind; 3] = [
    FlowKind::SendMoney,
    FlowKind::Conversion,
    FlowKind::Beneficiary,
];

/// Which view is currently active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Dashboard,
    Wizard,
}

/// Mode of input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Fields edited on a step
pub fn step_fields(kind: FlowKind, step: &str) -> &'static [&'static str] {
    match (kind, step) {
        (FlowKind::SendMoney, "recipient") => &["recipient_id", "recipient_name"],
        (FlowKind::SendMoney, "bank") => &["bank_name", "account_number"],
        (FlowKind::SendMoney, "amount") => &["amount", "currency", "purpose", "note"],
        (FlowKind::SendMoney, "method") => &["payment_method"],
        (FlowKind::SendMoney, "schedule") => &["scheduled_date", "recurring", "frequency"],
        (FlowKind::Beneficiary, "legal-name") => &["legal_name", "country", "address"],
        (FlowKind::Beneficiary, "bank-details") => &[
            "bank_name",
            "account_number",
            "swift_code",
            "routing_number",
            "currency",
        ],
        (FlowKind::Beneficiary, "review") => &["favorite", "default"],
        (FlowKind::Conversion, "quote") => &["amount", "from", "to"],
        _ => &[],
    }
}

/// Main application state
pub struct App {
    /// The wizard the user is working through
    pub session: FlowSession,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Currently active view
    pub active_view: ActiveView,

    /// Current input mode
    pub input_mode: InputMode,

    /// Selected entry in the dashboard menu
    pub menu_index: usize,

    /// Focused field on the current step
    pub field_index: usize,

    /// Field being edited
    pub input: TextInput,

    /// Status message to display
    pub status_message: Option<String>,

    /// Last snapshot, refreshed after every change
    pub snapshot: Option<WizardSnapshot>,

    quote_tick: Duration,
    events: mpsc::Sender<Event>,
    ticker: Option<TickerHandle>,
}

impl App {
    /// Create a new App instance
    ///
    /// Countdown ticks are sent to `events` every `quote_tick`.
    pub fn new(session: FlowSession, quote_tick: Duration, events: mpsc::Sender<Event>) -> Self {
        Self {
            session,
            should_quit: false,
            active_view: ActiveView::default(),
            input_mode: InputMode::default(),
            menu_index: 0,
            field_index: 0,
            input: TextInput::new(),
            status_message: None,
            snapshot: None,
            quote_tick,
            events,
            ticker: None,
        }
    }

    /// Request to quit the application
    pub fn quit(&mut self) {
        self.leave_flow();
        self.should_quit = true;
    }

    /// Set a status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Clear the status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Whether a countdown thread is running
    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(TickerHandle::is_running)
    }

    /// Fields on the current step
    pub fn visible_fields(&self) -> &'static [&'static str] {
        match &self.snapshot {
            Some(s) => step_fields(s.flow, &s.current_step),
            None => &[],
        }
    }

    /// Key of the focused field
    pub fn focused_field(&self) -> Option<&'static str> {
        self.visible_fields().get(self.field_index).copied()
    }

    pub fn move_up(&mut self) {
        match self.active_view {
            ActiveView::Dashboard => self.menu_index = self.menu_index.saturating_sub(1),
            ActiveView::Wizard => self.field_index = self.field_index.saturating_sub(1),
        }
    }

    pub fn move_down(&mut self) {
        let max = match self.active_view {
            ActiveView::Dashboard => MENU.len(),
            ActiveView::Wizard => self.visible_fields().len(),
        };
        let index = match self.active_view {
            ActiveView::Dashboard => &mut self.menu_index,
            ActiveView::Wizard => &mut self.field_index,
        };
        if *index < max.saturating_sub(1) {
            *index += 1;
        }
    }

    /// Start a flow, cancelling whatever was running
    pub fn start_flow(&mut self, kind: FlowKind) {
        let result = self.session.start(kind);
        self.active_view = ActiveView::Wizard;
        self.apply(result);
        self.clear_status();
    }

    /// Go back to the dashboard, discarding the active flow
    pub fn leave_flow(&mut self) {
        if self.session.leave() {
            debug!("left flow");
        }
        self.snapshot = None;
        self.active_view = ActiveView::Dashboard;
        self.input_mode = InputMode::Normal;
        self.sync_ticker();
    }

    /// Start editing the focused field
    pub fn begin_edit(&mut self) {
        if let Some(key) = self.focused_field() {
            let current = self
                .snapshot
                .as_ref()
                .map(|s| s.field(key).to_string())
                .unwrap_or_default();
            self.input = TextInput::new().label(key).content(current);
            self.input_mode = InputMode::Editing;
        }
    }

    /// Discard the edit in progress
    pub fn cancel_edit(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input.clear();
    }

    /// Write the edited value into the focused field
    pub fn commit_edit(&mut self) {
        self.input_mode = InputMode::Normal;
        if let Some(key) = self.focused_field() {
            let value = self.input.value().to_string();
            let result = self.session.set_field(key, &value);
            if self.apply(result) {
                self.clear_status();
            }
        }
    }

    pub fn advance(&mut self) {
        let was_complete = self.snapshot.as_ref().is_some_and(|s| s.is_complete);
        let result = self.session.advance();
        if self.apply(result) {
            self.field_index = 0;
            match &self.snapshot {
                Some(s) if s.is_complete && !was_complete => {
                    let reference = s.reference_id.clone().unwrap_or_default();
                    self.set_status(format!("Submitted {}", reference));
                }
                _ => self.clear_status(),
            }
        }
    }

    pub fn retreat(&mut self) {
        let result = self.session.retreat();
        if self.apply(result) {
            self.field_index = 0;
            self.clear_status();
        }
    }

    pub fn lock_rate(&mut self) {
        let result = self.session.lock_rate();
        if self.apply(result) {
            self.set_status("Rate locked");
        }
    }

    pub fn swap_currencies(&mut self) {
        let result = self.session.swap_currencies();
        if self.apply(result) {
            self.clear_status();
        }
    }

    /// Start the active flow over
    pub fn reset(&mut self) {
        let result = self.session.cancel();
        if self.apply(result) {
            self.field_index = 0;
            self.set_status("Started over");
        }
    }

    /// Apply one countdown tick
    pub fn on_quote_tick(&mut self) {
        match self.session.tick() {
            TickOutcome::Expired => {
                self.snapshot = self.session.snapshot();
                self.field_index = 0;
                self.set_status("Quote expired. Review the amount and continue for a new quote.");
            }
            TickOutcome::Counting(_) => self.snapshot = self.session.snapshot(),
            TickOutcome::Idle => {}
        }
        self.sync_ticker();
    }

    /// Store the outcome of a session call
    ///
    /// Returns whether the call succeeded. Errors go to the status line.
    fn apply(&mut self, result: PaystreetResult<WizardSnapshot>) -> bool {
        let ok = match result {
            Ok(snapshot) => {
                self.snapshot = Some(snapshot);
                true
            }
            Err(e) => {
                if e.is_quote_expired() {
                    self.field_index = 0;
                }
                self.snapshot = self.session.snapshot();
                self.set_status(e.to_string());
                false
            }
        };
        self.sync_ticker();
        ok
    }

    /// Run the countdown thread exactly while the timer is counting
    fn sync_ticker(&mut self) {
        let counting = self
            .snapshot
            .as_ref()
            .is_some_and(|s| s.timer_state == Some(TimerState::Active));

        match (counting, self.ticker.is_some()) {
            (true, false) => {
                self.ticker = Some(TickerHandle::spawn(
                    self.quote_tick,
                    self.events.clone(),
                    Event::QuoteTick,
                ));
            }
            (false, true) => {
                if let Some(mut ticker) = self.ticker.take() {
                    ticker.cancel();
                }
            }
            _ => {}
        }
    }
}
