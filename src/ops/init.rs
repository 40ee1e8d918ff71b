//! Vault creation and status.

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use super::Vault;
use crate::errors::Result;
use crate::vault::VaultDocument;

/// What `init` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    Created(PathBuf),
    /// A document was already present; nothing was written.
    AlreadyExists(PathBuf),
}

/// Summary shown by `localsafe status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultStatus {
    pub location: PathBuf,
    pub initialized: bool,
    pub entries: usize,
    pub trash: usize,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Vault {
    /// Create an empty document if none exists.
    pub fn init(&self) -> Result<InitOutcome> {
        let snapshot = self.store.read()?;
        if snapshot.document.is_some() {
            return Ok(InitOutcome::AlreadyExists(self.location().to_path_buf()));
        }

        let document = VaultDocument::new(self.now());
        let path = self.commit(&document, &snapshot.revision)?;
        tracing::info!(path = %path.display(), "vault created");
        Ok(InitOutcome::Created(path))
    }

    pub fn status(&self) -> Result<VaultStatus> {
        let document = self.store.read()?.document;
        Ok(VaultStatus {
            location: self.location().to_path_buf(),
            initialized: document.is_some(),
            entries: document.as_ref().map_or(0, |d| d.entries.len()),
            trash: document.as_ref().map_or(0, |d| d.trash.len()),
            created_at: document.as_ref().map(|d| d.created_at),
            updated_at: document.as_ref().map(|d| d.updated_at),
        })
    }
}
