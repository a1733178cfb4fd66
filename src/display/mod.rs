//! Display formatting for terminal output
//!
//! Plain-text renderings of wizard snapshots, reference data and the audit
//! trail for the one-shot commands.

pub mod catalog;
pub mod wizard;

pub use catalog::{
    format_beneficiary_details, format_beneficiary_list, format_currencies,
    format_payment_methods, format_rates,
};
pub use wizard::{format_pricing, format_progress, format_snapshot, format_timer};

use crate::audit::AuditEntry;

/// Format audit entries one per line, oldest first
pub fn format_audit_entries(entries: &[AuditEntry]) -> String {
    if entries.is_empty() {
        return "No audit entries found.".to_string();
    }

    let mut output = String::new();
    for entry in entries {
        output.push_str(&entry.format_human_readable());
        output.push('\n');
    }
    output
}
