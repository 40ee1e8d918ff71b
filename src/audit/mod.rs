//! Audit trail for vault mutations.
//!
//! The CLI records one event after each successful operation.  Sinks
//! are fire-and-forget: a failing sink never affects the vault.

#[cfg(feature = "audit-log")]
mod sqlite;

use std::path::Path;

use chrono::{DateTime, Utc};
use serde_json::Value;

#[cfg(feature = "audit-log")]
pub use sqlite::AuditLog;

/// Event names written by the CLI.
pub mod events {
    pub const ADD_ENTRY: &str = "add_entry";
    pub const VIEW_ENTRY: &str = "view_entry";
    pub const UPDATE_TAGS: &str = "update_tags";
    pub const UPDATE_ENTRY: &str = "update_entry";
    pub const DELETE_ENTRY: &str = "delete_entry";
    pub const TRASH_LIST: &str = "trash_list";
    pub const TRASH_RESTORE: &str = "trash_restore";
    pub const TRASH_PURGE: &str = "trash_purge";
    pub const EXPORT_VAULT: &str = "export_vault";
    pub const VERIFY_FIX: &str = "verify_fix";
}

/// Destination for audit events.
pub trait AuditSink {
    /// Record `event` with a structured payload.  Must not fail.
    fn record(&self, event: &str, payload: Value);

    /// Human-readable description of where events go.
    fn target(&self) -> String;
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudit;

impl AuditSink for NullAudit {
    fn record(&self, event: &str, _payload: Value) {
        tracing::trace!(event, "audit disabled; event dropped");
    }

    fn target(&self) -> String {
        "disabled".into()
    }
}

/// A stored audit event.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub event: String,
    pub payload: Value,
}

/// Open the audit database at `path`, falling back to `NullAudit` when
/// it cannot be opened or audit support is compiled out.
pub fn open_sink(path: &Path) -> Box<dyn AuditSink> {
    #[cfg(feature = "audit-log")]
    {
        if let Some(log) = AuditLog::open(path) {
            return Box::new(log);
        }
        tracing::warn!(path = %path.display(), "audit log unavailable; continuing without it");
    }
    #[cfg(not(feature = "audit-log"))]
    tracing::debug!(path = %path.display(), "built without audit-log support");

    Box::new(NullAudit)
}
