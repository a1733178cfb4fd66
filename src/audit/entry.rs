//! Audit entry data structures
//!
//! One line of the audit log: a wizard event and when it was recorded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::wizard::WizardEvent;

/// A single audit log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the event was recorded (UTC)
    pub timestamp: DateTime<Utc>,

    pub event: WizardEvent,
}

impl AuditEntry {
    /// Stamp an event with the current time
    pub fn new(event: WizardEvent) -> Self {
        Self::at(Utc::now(), event)
    }

    pub fn at(timestamp: DateTime<Utc>, event: WizardEvent) -> Self {
        Self { timestamp, event }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.event.name().to_uppercase(),
            self.event.session_id(),
            self.event.summary()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionId;
    use crate::wizard::FlowKind;
    use chrono::TimeZone;

    fn expired() -> WizardEvent {
        WizardEvent::QuoteExpired {
            flow: FlowKind::Conversion,
            session_id: SessionId::from_u128(0xbeef),
            step: "quote".into(),
        }
    }

    #[test]
    fn test_serialization() {
        let entry = AuditEntry::new(expired());

        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains(r#""event":"quote_expired""#));

        let deserialized: AuditEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, entry);
    }

    #[test]
    fn test_human_readable_format() {
        let at = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
        let formatted = AuditEntry::at(at, expired()).format_human_readable();
        assert!(formatted.starts_with("[2025-01-15 12:00:00 UTC] QUOTE_EXPIRED wiz-0000beef"));
        assert!(formatted.contains("back to 'quote'"));
    }
}
