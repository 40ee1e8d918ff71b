//! Per-entry integrity digests.
//!
//! The digest is SHA-256 over the compact JSON of
//! `{id, name, username, url, tags, secret}` in that field order.
//! Timestamps and `meta` are excluded, so touching `updatedAt` never
//! invalidates a stamp.

use serde::Serialize;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::crypto::EncryptedPayload;
use crate::vault::Entry;

/// Canonical view of the digested fields.
#[derive(Serialize)]
struct DigestView<'a> {
    id: &'a str,
    name: &'a str,
    username: &'a str,
    url: &'a str,
    tags: &'a [String],
    secret: &'a EncryptedPayload,
}

/// Hex SHA-256 digest of an entry's identity fields.
pub fn compute_digest(entry: &Entry) -> String {
    let view = DigestView {
        id: &entry.id,
        name: &entry.name,
        username: &entry.username,
        url: &entry.url,
        tags: &entry.tags,
        secret: &entry.secret,
    };
    // Serializing plain strings and a derived struct cannot fail.
    let canonical = serde_json::to_vec(&view).unwrap_or_default();
    hex::encode(Sha256::digest(&canonical))
}

/// Return `entry` with `meta.integrity` set to its current digest.
pub fn stamp(mut entry: Entry) -> Entry {
    entry.meta.integrity = Some(compute_digest(&entry));
    entry
}

/// Why an entry failed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MismatchReason {
    /// No stored digest.
    Missing,
    /// Stored digest differs from the recomputed one.
    Mismatch,
}

impl std::fmt::Display for MismatchReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MismatchReason::Missing => f.write_str("missing"),
            MismatchReason::Mismatch => f.write_str("mismatch"),
        }
    }
}

/// One entry that failed verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    pub id: String,
    pub name: String,
    pub reason: MismatchReason,
}

/// Classify a single entry; `None` means verified.
pub fn check(entry: &Entry) -> Option<MismatchReason> {
    let Some(stored) = entry.meta.integrity.as_deref() else {
        return Some(MismatchReason::Missing);
    };
    let expected = compute_digest(entry);
    if bool::from(stored.as_bytes().ct_eq(expected.as_bytes())) {
        None
    } else {
        Some(MismatchReason::Mismatch)
    }
}

/// Result of scanning every entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    pub ok: bool,
    pub checked: usize,
    pub mismatches: Vec<Mismatch>,
    /// Entries re-stamped (fix mode only).
    pub fixed: usize,
}

/// Scan all entries.  When `fix` is set, every failing entry in the
/// returned list is re-stamped; otherwise the list is returned as-is.
///
/// Never stops early: every entry is evaluated.
pub fn scan(entries: Vec<Entry>, fix: bool) -> (VerifyReport, Vec<Entry>) {
    let mut mismatches = Vec::new();
    let checked = entries.len();

    let entries: Vec<Entry> = entries
        .into_iter()
        .map(|entry| match check(&entry) {
            Some(reason) => {
                mismatches.push(Mismatch {
                    id: entry.id.clone(),
                    name: entry.name.clone(),
                    reason,
                });
                if fix {
                    stamp(entry)
                } else {
                    entry
                }
            }
            None => entry,
        })
        .collect();

    let fixed = if fix { mismatches.len() } else { 0 };
    let report = VerifyReport {
        ok: mismatches.is_empty(),
        checked,
        mismatches,
        fixed,
    };
    (report, entries)
}
