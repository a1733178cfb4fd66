//! PayStreet - multi-step payment wizards for the terminal
//!
//! This library implements the wizards behind PayStreet's send-money,
//! beneficiary onboarding and currency conversion screens: step
//! validation, fee and conversion arithmetic, rate quotes with a countdown,
//! and the events each flow emits when it completes.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `wizard`: The generic engine (steps, transitions, derived values, timer)
//! - `flows`: The three concrete wizards
//! - `session`: The single active flow a user works through
//! - `catalog`: Reference data (beneficiaries, payment methods, currencies, rates)
//! - `models`: Core data models (money, beneficiaries, quotes)
//! - `audit`: JSONL audit log of wizard events
//! - `config`: Configuration and path management
//! - `ticker`: Background tick source for quote countdowns
//! - `cli`, `display`, `tui`: Command line and terminal front ends
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use paystreet_cli::catalog::{StaticCatalog, StaticRates};
//! use paystreet_cli::flows::conversion;
//!
//! let mut wizard = conversion::engine(
//!     Arc::new(StaticCatalog::new()),
//!     Arc::new(StaticRates::new()),
//! )?;
//! wizard.set_field("amount", "1000")?;
//! wizard.advance()?;
//! let done = wizard.finalize()?;
//! assert_eq!(done.derived.converted_amount.minor(), 84_500);
//! # Ok::<(), paystreet_cli::PaystreetError>(())
//! ```

pub mod audit;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod flows;
pub mod logging;
pub mod models;
pub mod session;
pub mod ticker;
pub mod tui;
pub mod wizard;

pub use error::{PaystreetError, PaystreetResult};
