//! JSONL audit log writer and reader
//!
//! Every wizard event becomes one JSON line. Writes are serialized through a
//! mutex so events from the countdown path and the UI never interleave, and
//! each line is flushed before `emit` returns.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{PaystreetError, PaystreetResult};
use crate::wizard::{EventSink, FlowKind, WizardEvent};

use super::entry::AuditEntry;

/// Append-only audit log at a fixed path
pub struct AuditLogger {
    log_path: PathBuf,
    write_lock: Mutex<()>,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self {
            log_path,
            write_lock: Mutex::new(()),
        }
    }

    /// Append one entry
    pub fn log(&self, entry: &AuditEntry) -> PaystreetResult<()> {
        let line = serde_json::to_string(entry)
            .map_err(|e| PaystreetError::Json(format!("Cannot encode audit entry: {}", e)))?;

        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| PaystreetError::Io(format!("Audit log lock poisoned: {}", e)))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| PaystreetError::Io(format!("Cannot open audit log: {}", e)))?;
        writeln!(file, "{}", line)
            .and_then(|_| file.flush())
            .map_err(|e| PaystreetError::Io(format!("Cannot write audit log: {}", e)))
    }

    /// Every entry, oldest first
    ///
    /// A missing file is an empty log. A line that does not parse is an
    /// error naming the line.
    pub fn read_all(&self) -> PaystreetResult<Vec<AuditEntry>> {
        if !self.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| PaystreetError::Io(format!("Cannot open audit log: {}", e)))?;

        BufReader::new(file)
            .lines()
            .enumerate()
            .filter_map(|(n, line)| match line {
                Ok(line) if line.trim().is_empty() => None,
                Ok(line) => Some(parse_line(n + 1, &line)),
                Err(e) => Some(Err(PaystreetError::Io(format!(
                    "Cannot read audit log line {}: {}",
                    n + 1,
                    e
                )))),
            })
            .collect()
    }

    /// The last `count` entries, oldest first
    pub fn read_recent(&self, count: usize) -> PaystreetResult<Vec<AuditEntry>> {
        let mut entries = self.read_all()?;
        let skip = entries.len().saturating_sub(count);
        entries.drain(..skip);
        Ok(entries)
    }

    /// The last `count` entries for one flow, oldest first
    pub fn read_recent_for(&self, flow: FlowKind, count: usize) -> PaystreetResult<Vec<AuditEntry>> {
        let mut entries: Vec<_> = self
            .read_all()?
            .into_iter()
            .filter(|e| e.event.flow() == flow)
            .collect();
        let skip = entries.len().saturating_sub(count);
        entries.drain(..skip);
        Ok(entries)
    }

    pub fn exists(&self) -> bool {
        self.log_path.exists()
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }
}

fn parse_line(line_number: usize, line: &str) -> PaystreetResult<AuditEntry> {
    serde_json::from_str(line).map_err(|e| {
        PaystreetError::Json(format!("Bad audit entry on line {}: {}", line_number, e))
    })
}

impl EventSink for AuditLogger {
    fn emit(&self, event: &WizardEvent) -> PaystreetResult<()> {
        self.log(&AuditEntry::new(event.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionId;
    use crate::wizard::{DerivedValues, FlowKind};
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn create_test_logger() -> (AuditLogger, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("audit.log");
        let logger = AuditLogger::new(log_path);
        (logger, temp_dir)
    }

    fn submitted(reference: &str) -> WizardEvent {
        WizardEvent::Submitted {
            flow: FlowKind::SendMoney,
            session_id: SessionId::new(),
            reference_id: reference.to_string(),
            fields: BTreeMap::from([("amount".to_string(), "500".to_string())]),
            derived: DerivedValues::default(),
            quote: None,
        }
    }

    #[test]
    fn test_emit_and_read() {
        let (logger, _temp) = create_test_logger();

        logger.emit(&submitted("PAY00000001")).unwrap();

        let entries = logger.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].event.name(), "submitted");
        assert_eq!(entries[0].event.flow(), FlowKind::SendMoney);
    }

    #[test]
    fn test_read_recent() {
        let (logger, _temp) = create_test_logger();

        for i in 0..10 {
            logger.emit(&submitted(&format!("PAY{:08}", i))).unwrap();
        }

        let recent = logger.read_recent(3).unwrap();
        assert_eq!(recent.len(), 3);
        let references: Vec<_> = recent
            .iter()
            .map(|e| match &e.event {
                WizardEvent::Submitted { reference_id, .. } => reference_id.clone(),
                _ => String::new(),
            })
            .collect();
        assert_eq!(references, ["PAY00000007", "PAY00000008", "PAY00000009"]);
    }

    #[test]
    fn test_read_recent_for_flow() {
        let (logger, _temp) = create_test_logger();
        logger.emit(&submitted("PAY00000001")).unwrap();
        logger
            .emit(&WizardEvent::Cancelled {
                flow: FlowKind::Conversion,
                session_id: SessionId::new(),
                step: "review".into(),
            })
            .unwrap();

        let conversions = logger.read_recent_for(FlowKind::Conversion, 10).unwrap();
        assert_eq!(conversions.len(), 1);
        assert_eq!(conversions[0].event.name(), "cancelled");
        assert!(logger.read_recent_for(FlowKind::Beneficiary, 10).unwrap().is_empty());
    }

    #[test]
    fn test_empty_log() {
        let (logger, _temp) = create_test_logger();

        assert!(!logger.exists());
        assert!(logger.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_survives_restart() {
        let (logger, temp) = create_test_logger();
        logger.emit(&submitted("PAY00000001")).unwrap();

        let logger2 = AuditLogger::new(temp.path().join("audit.log"));
        assert_eq!(logger2.read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_corrupt_line_reported() {
        let (logger, _temp) = create_test_logger();
        std::fs::write(logger.path(), "{not json}\n").unwrap();

        let err = logger.read_all().unwrap_err();
        assert!(matches!(err, PaystreetError::Json(_)));
    }

    #[test]
    fn test_unwritable_path_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp_dir.path().join("missing").join("audit.log"));
        let err = logger.emit(&submitted("PAY00000001")).unwrap_err();
        assert!(matches!(err, PaystreetError::Io(_)));
    }
}
