//! Audit log of wizard events
//!
//! Submissions, rate locks, quote expiries and cancellations are appended
//! to a line-delimited JSON file (JSONL), one `AuditEntry` per line.
//! `AuditLogger` is an `EventSink`, so an engine can write to it directly.
//!
//! # Example
//!
//! ```rust,ignore
//! use paystreet_cli::audit::AuditLogger;
//!
//! let logger = Arc::new(AuditLogger::new(paths.audit_log()));
//! let engine = conversion::engine(catalog, rates)?.with_events(logger.clone());
//! // ...
//! for entry in logger.read_recent(10)? {
//!     println!("{}", entry.format_human_readable());
//! }
//! ```

mod entry;
mod logger;

pub use entry::AuditEntry;
pub use logger::AuditLogger;
