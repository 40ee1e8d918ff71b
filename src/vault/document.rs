//! The persisted vault document: live entries plus the trash archive.
//!
//! Operations treat a `VaultDocument` as a value: they take the current
//! document, build the next one, and hand it to the store as a unit.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entry::Entry;
use super::selector::EntryLookup;
use super::timestamp;
use crate::errors::{LocalSafeError, Result};

/// Current document format version.
pub const CURRENT_VERSION: u32 = 1;

fn default_version() -> u32 {
    CURRENT_VERSION
}

/// The full persisted state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultDocument {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(with = "timestamp", default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "timestamp", default = "Utc::now")]
    pub updated_at: DateTime<Utc>,

    /// Live entries in insertion order.
    #[serde(default)]
    pub entries: Vec<Entry>,

    /// Append-only snapshots, oldest first.
    #[serde(default)]
    pub trash: Vec<TrashRecord>,
}

impl VaultDocument {
    /// An empty document created at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            version: CURRENT_VERSION,
            created_at: now,
            updated_at: now,
            entries: Vec::new(),
            trash: Vec::new(),
        }
    }

    /// Index of the first live entry matching `lookup`.
    pub fn find_index(&self, lookup: &EntryLookup) -> Option<usize> {
        self.entries.iter().position(|e| lookup.matches(e))
    }

    /// Whether a live entry already uses `id`.
    pub fn contains_id(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Replace the entry at `index` and archive the previous version.
    pub fn replace_entry(&mut self, index: usize, next: Entry, now: DateTime<Utc>) {
        let previous = std::mem::replace(&mut self.entries[index], next);
        self.trash
            .push(TrashRecord::new(TrashAction::Update, now, previous));
        self.updated_at = now;
    }
}

/// Why an entry snapshot landed in the trash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrashAction {
    SoftDelete,
    Delete,
    Update,
}

impl TrashAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrashAction::SoftDelete => "soft-delete",
            TrashAction::Delete => "delete",
            TrashAction::Update => "update",
        }
    }
}

impl fmt::Display for TrashAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrashAction {
    type Err = LocalSafeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "soft-delete" => Ok(TrashAction::SoftDelete),
            "delete" => Ok(TrashAction::Delete),
            "update" => Ok(TrashAction::Update),
            other => Err(LocalSafeError::Validation(format!(
                "unknown trash action '{other}' (expected soft-delete, delete or update)"
            ))),
        }
    }
}

/// An immutable point-in-time copy of an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrashRecord {
    pub action: TrashAction,

    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,

    pub entry: Entry,
}

impl TrashRecord {
    pub fn new(action: TrashAction, timestamp: DateTime<Utc>, entry: Entry) -> Self {
        Self {
            action,
            timestamp,
            entry,
        }
    }
}
