//! Decrypt a single entry.

use super::{require_passphrase, Vault};
use crate::errors::{LocalSafeError, Result};
use crate::vault::{EntryLookup, RevealedEntry};

impl Vault {
    /// Locate an entry and decrypt its payload.  Never writes.
    pub fn view(&self, lookup: &EntryLookup, passphrase: &str) -> Result<RevealedEntry> {
        let (document, _) = self.load()?;
        require_passphrase(passphrase)?;
        lookup.require()?;

        let entry = document
            .entries
            .iter()
            .find(|e| lookup.matches(e))
            .ok_or_else(|| LocalSafeError::EntryNotFound(lookup.to_string()))?;

        let payload = self.open(passphrase, entry)?;
        tracing::debug!(id = %entry.id, "entry viewed");
        Ok(RevealedEntry::new(entry, payload))
    }
}
