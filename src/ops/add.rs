//! Create a new entry.

use uuid::Uuid;

use super::{require_passphrase, Vault};
use crate::errors::{LocalSafeError, Result};
use crate::integrity;
use crate::vault::{normalize_tags, Entry, EntryMeta, SecretPayload, UNTITLED};

/// Input for `Vault::add`.  Blank strings count as "not given".
#[derive(Debug, Clone, Default)]
pub struct AddRequest<'a> {
    pub name: &'a str,
    pub username: &'a str,
    pub url: &'a str,
    pub secret: &'a str,
    pub note: &'a str,
    /// Trimmed and lower-cased on insert.
    pub tags: Vec<String>,
    pub passphrase: &'a str,
}

impl Vault {
    /// Encrypt and append a new entry.  Returns the stored entry.
    pub fn add(&self, request: &AddRequest<'_>) -> Result<Entry> {
        let (mut document, revision) = self.load()?;
        require_passphrase(request.passphrase)?;
        if request.secret.is_empty() {
            return Err(LocalSafeError::Validation("Secret is required.".into()));
        }

        let name = match request.name.trim() {
            "" => UNTITLED.to_string(),
            name => name.to_string(),
        };
        let payload = SecretPayload::new(request.secret, request.note);
        let now = self.now();

        let entry = integrity::stamp(Entry {
            id: Uuid::new_v4().to_string(),
            name,
            username: request.username.trim().to_string(),
            url: request.url.trim().to_string(),
            tags: normalize_tags(&request.tags),
            secret: self.seal(request.passphrase, &payload)?,
            created_at: now,
            updated_at: now,
            meta: EntryMeta::default(),
        });

        document.entries.push(entry.clone());
        document.updated_at = now;
        self.commit(&document, &revision)?;

        tracing::info!(id = %entry.id, name = %entry.name, "entry added");
        Ok(entry)
    }
}
