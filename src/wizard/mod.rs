//! Multi-step wizard engine
//!
//! A wizard is a fixed list of steps (`definition`), a field record
//! (`fields`), values derived from it (`derive`), and for flows that quote a
//! rate, a countdown (`timer`). `WizardEngine` ties them together and is the
//! only way to change a wizard's state.

pub mod definition;
pub mod derive;
pub mod engine;
pub mod events;
pub mod fields;
pub mod reference;
pub mod state;
pub mod timer;

pub use definition::{FieldError, FlowKind, Step, WizardDefinition};
pub use derive::{derive, Composition, DerivedValues};
pub use engine::{Clock, WizardEngine};
pub use events::{EventSink, MemorySink, NullSink, WizardEvent};
pub use fields::{FieldSet, PricingInputs};
pub use reference::ReferenceGenerator;
pub use state::{WizardSnapshot, WizardState};
pub use timer::{QuoteTimer, TickOutcome, TimerState};
