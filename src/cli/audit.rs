//! Audit trail CLI command

use crate::audit::AuditLogger;
use crate::display::format_audit_entries;
use crate::error::{PaystreetError, PaystreetResult};
use crate::wizard::FlowKind;

use super::OutputFormat;

/// Print the most recent audit entries, optionally for one flow
pub fn handle_audit_command(
    logger: &AuditLogger,
    format: OutputFormat,
    count: usize,
    flow: Option<&str>,
) -> PaystreetResult<()> {
    let entries = match flow {
        Some(name) => {
            let kind = FlowKind::parse(name).ok_or_else(|| {
                PaystreetError::validation(
                    "flow",
                    format!("Unknown flow '{}'. Use send, convert or beneficiary", name),
                )
            })?;
            logger.read_recent_for(kind, count)?
        }
        None => logger.read_recent(count)?,
    };

    match format.serialize(&entries)? {
        Some(out) => print!("{}", out),
        None => println!("{}", format_audit_entries(&entries)),
    }
    Ok(())
}
