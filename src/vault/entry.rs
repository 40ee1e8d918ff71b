//! Entry types stored inside a vault document.
//!
//! An `Entry` carries plaintext metadata (name, username, url, tags) and
//! an `EncryptedPayload` wrapping a `SecretPayload`.  Listing and
//! filtering only ever touch the metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::timestamp;
use crate::crypto::EncryptedPayload;
use crate::errors::{LocalSafeError, Result};

/// Name given to entries created without one.
pub const UNTITLED: &str = "Untitled entry";

/// A single stored credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Stable identifier (UUID for entries created here).
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub url: String,

    /// Lower-cased tags; duplicates are allowed.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Encrypted `{secret, note}` blob.
    pub secret: EncryptedPayload,

    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,

    #[serde(default)]
    pub meta: EntryMeta,
}

/// Bookkeeping that lives outside the integrity digest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMeta {
    /// Hex SHA-256 digest of the identity fields, if stamped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integrity: Option<String>,

    #[serde(default)]
    pub uses: u64,
}

/// The plaintext wrapped by an entry's `EncryptedPayload`.
///
/// Wiped from memory when dropped.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct SecretPayload {
    pub secret: String,
    #[serde(default)]
    pub note: String,
}

impl SecretPayload {
    pub fn new(secret: &str, note: &str) -> Self {
        Self {
            secret: secret.to_string(),
            note: note.to_string(),
        }
    }

    /// Serialize to the JSON bytes that get encrypted.
    pub fn to_plaintext(&self) -> Result<Zeroizing<Vec<u8>>> {
        serde_json::to_vec(self)
            .map(Zeroizing::new)
            .map_err(|e| LocalSafeError::SerializationError(format!("secret payload: {e}")))
    }

    /// Parse decrypted bytes.  Bytes that authenticate but do not parse
    /// are treated as a corrupt payload.
    pub fn from_plaintext(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|_| LocalSafeError::DecryptionFailed)
    }
}

impl std::fmt::Debug for SecretPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretPayload")
            .field("secret", &"<redacted>")
            .field("note", &"<redacted>")
            .finish()
    }
}

/// A decrypted entry, as returned by `view`.
#[derive(Debug, Clone)]
pub struct RevealedEntry {
    pub id: String,
    pub name: String,
    pub username: String,
    pub url: String,
    pub tags: Vec<String>,
    pub payload: SecretPayload,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RevealedEntry {
    pub fn new(entry: &Entry, payload: SecretPayload) -> Self {
        Self {
            id: entry.id.clone(),
            name: entry.name.clone(),
            username: entry.username.clone(),
            url: entry.url.clone(),
            tags: entry.tags.clone(),
            payload,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }

    /// JSON rendering used by `view --json`.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "name": self.name,
            "username": self.username,
            "url": self.url,
            "tags": self.tags,
            "secret": self.payload.secret,
            "note": self.payload.note,
            "createdAt": timestamp::format(&self.created_at),
            "updatedAt": timestamp::format(&self.updated_at),
        })
    }
}
