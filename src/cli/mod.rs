//! CLI command handlers
//!
//! This module contains the implementation of CLI commands, bridging the
//! clap argument parsing with the wizard session. Each wizard command drives
//! one flow from its first step to completion.

pub mod audit;
pub mod beneficiary;
pub mod catalog;
pub mod convert;
pub mod send;

pub use audit::handle_audit_command;
pub use beneficiary::{handle_beneficiary_command, BeneficiaryCommands};
pub use catalog::{handle_catalog_command, CatalogCommands};
pub use convert::{handle_convert_command, ConvertArgs};
pub use send::{handle_send_command, SendArgs};

use clap::ValueEnum;
use serde::Serialize;
use tracing::debug;

use crate::display::format_snapshot;
use crate::error::PaystreetResult;
use crate::session::FlowSession;
use crate::wizard::WizardSnapshot;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl OutputFormat {
    /// Serialize `value` for the machine-readable formats
    ///
    /// Returns `None` for `Text`; the caller formats that itself.
    pub fn serialize<T: Serialize>(&self, value: &T) -> PaystreetResult<Option<String>> {
        match self {
            Self::Text => Ok(None),
            Self::Json => Ok(Some(serde_json::to_string_pretty(value)?)),
            Self::Yaml => Ok(Some(serde_yaml::to_string(value)?)),
        }
    }
}

/// Render a snapshot in the requested format
pub fn render_snapshot(snapshot: &WizardSnapshot, format: OutputFormat) -> PaystreetResult<String> {
    Ok(match format.serialize(snapshot)? {
        Some(serialized) => serialized,
        None => format_snapshot(snapshot),
    })
}

/// Advance the active flow until it completes
///
/// The first step that fails its check stops the run with that step's
/// validation error.
pub(crate) fn run_to_completion(session: &mut FlowSession) -> PaystreetResult<WizardSnapshot> {
    loop {
        let snapshot = session.advance()?;
        debug!(step = %snapshot.current_step, "advanced");
        if snapshot.is_complete {
            return Ok(snapshot);
        }
    }
}

/// Set a field when the option was given on the command line
pub(crate) fn set_optional(
    session: &mut FlowSession,
    key: &str,
    value: Option<&str>,
) -> PaystreetResult<()> {
    if let Some(value) = value {
        session.set_field(key, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{StaticCatalog, StaticRates};
    use crate::wizard::FlowKind;
    use std::sync::Arc;

    #[test]
    fn test_render_formats() {
        let mut session =
            FlowSession::new(Arc::new(StaticCatalog::new()), Arc::new(StaticRates::new()));
        let snapshot = session.start(FlowKind::Conversion).unwrap();

        let text = render_snapshot(&snapshot, OutputFormat::Text).unwrap();
        assert!(text.starts_with("Currency Conversion"));

        let json = render_snapshot(&snapshot, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["flow"], "conversion");
        assert_eq!(value["current_step"], "quote");

        let yaml = render_snapshot(&snapshot, OutputFormat::Yaml).unwrap();
        assert!(yaml.contains("flow: conversion"));
    }

    #[test]
    fn test_run_to_completion_stops_on_invalid_step() {
        let mut session =
            FlowSession::new(Arc::new(StaticCatalog::new()), Arc::new(StaticRates::new()));
        session.start(FlowKind::Conversion).unwrap();

        let err = run_to_completion(&mut session).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(session.snapshot().unwrap().current_step, "quote");
    }
}
