//! SQLite-backed audit log.
//!
//! Each row holds a timestamp, an event name and the event payload as
//! JSON text.  Timestamps use the vault's fixed-width RFC 3339 form so
//! `since` filters can compare them as strings.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde_json::Value;

use super::{AuditEntry, AuditSink};
use crate::errors::{LocalSafeError, Result};
use crate::vault::timestamp;

pub struct AuditLog {
    conn: Connection,
    path: PathBuf,
}

impl AuditLog {
    /// Open (or create) the database at `db_path`.
    ///
    /// Returns `None` if the database can't be opened; callers treat
    /// that as "audit logging unavailable" and continue normally.
    pub fn open(db_path: &Path) -> Option<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).ok()?;
        }
        let conn = Connection::open(db_path).ok()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = fs::set_permissions(db_path, fs::Permissions::from_mode(0o600));
        }

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS audit_log (
                id        INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                event     TEXT NOT NULL,
                payload   TEXT NOT NULL
            );",
        )
        .ok()?;

        Some(Self {
            conn,
            path: db_path.to_path_buf(),
        })
    }

    /// Most recent events first, at most `limit`, optionally only those
    /// at or after `since`.
    pub fn query(&self, limit: usize, since: Option<DateTime<Utc>>) -> Result<Vec<AuditEntry>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let since = since.map(|ts| timestamp::format(&ts));

        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, timestamp, event, payload
                 FROM audit_log
                 WHERE ?1 IS NULL OR timestamp >= ?1
                 ORDER BY id DESC
                 LIMIT ?2",
            )
            .map_err(|e| LocalSafeError::AuditError(format!("query prepare: {e}")))?;

        let rows = stmt
            .query_map(rusqlite::params![since, limit], |row| {
                let ts: String = row.get(1)?;
                let payload: String = row.get(3)?;
                Ok(AuditEntry {
                    id: row.get(0)?,
                    timestamp: DateTime::parse_from_rfc3339(&ts)
                        .map_or_else(|_| DateTime::<Utc>::UNIX_EPOCH, |dt| dt.with_timezone(&Utc)),
                    event: row.get(2)?,
                    payload: serde_json::from_str(&payload).unwrap_or(Value::Null),
                })
            })
            .map_err(|e| LocalSafeError::AuditError(format!("query exec: {e}")))?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| LocalSafeError::AuditError(format!("row parse: {e}")))
    }
}

impl AuditSink for AuditLog {
    fn record(&self, event: &str, payload: Value) {
        let now = timestamp::format(&Utc::now());
        if let Err(e) = self.conn.execute(
            "INSERT INTO audit_log (timestamp, event, payload) VALUES (?1, ?2, ?3)",
            rusqlite::params![now, event, payload.to_string()],
        ) {
            tracing::warn!(event, error = %e, "audit event not recorded");
        }
    }

    fn target(&self) -> String {
        self.path.display().to_string()
    }
}
