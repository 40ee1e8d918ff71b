//! Lifecycle operations over a vault document.
//!
//! `Vault` bundles the three collaborators every operation needs (a
//! `DocumentStore`, a `CipherSuite` and a `Clock`).  Each operation
//! lives in its own module as an `impl Vault` block and follows the
//! same shape: read the document, validate, build the next document,
//! write it back in one step.  Nothing is persisted on failure.
//!
//! Audit recording is left to the caller so a failing audit sink can
//! never undo a mutation.

pub mod add;
pub mod delete;
pub mod export;
pub mod init;
pub mod list;
pub mod purge;
pub mod restore;
pub mod tag;
pub mod trash;
pub mod update;
pub mod verify;
pub mod view;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::crypto::{CipherSuite, EncryptedPayload};
use crate::errors::{LocalSafeError, Result};
use crate::retention::{Clock, SystemClock};
use crate::vault::{DocumentStore, Entry, Revision, SecretPayload, VaultDocument};

pub use add::AddRequest;
pub use delete::{DeleteRequest, DeletedEntries};
pub use export::{ExportDestination, ExportRequest, Exported};
pub use init::{InitOutcome, VaultStatus};
pub use list::{EntrySummary, ListFilter};
pub use purge::PurgeRequest;
pub use tag::TagRequest;
pub use trash::TrashFilter;
pub use update::{UpdateOutcome, UpdateRequest};

/// Result of an operation that needs an explicit confirmation token.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The operation ran and was persisted.
    Done(T),
    /// No token (or the wrong one) was supplied; nothing changed.
    /// `count` is how many items the operation would have touched.
    Pending { count: usize },
}

impl<T> Outcome<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Outcome::Pending { .. })
    }

    pub fn done(self) -> Option<T> {
        match self {
            Outcome::Done(value) => Some(value),
            Outcome::Pending { .. } => None,
        }
    }
}

/// Confirmation literals for destructive operations.
pub mod confirm {
    pub const DELETE: &str = "delete";
    pub const RESTORE: &str = "restore";
    pub const PURGE: &str = "purge";
    pub const EXPORT: &str = "export";

    /// Exact, case-sensitive comparison.
    pub fn is_confirmed(token: Option<&str>, expected: &str) -> bool {
        token == Some(expected)
    }
}

/// Handle used by every lifecycle operation.
pub struct Vault {
    store: Box<dyn DocumentStore>,
    suite: Box<dyn CipherSuite>,
    clock: Box<dyn Clock>,
}

impl Vault {
    /// A vault backed by `store`, encrypting with `suite`, on wall-clock time.
    pub fn new(store: impl DocumentStore + 'static, suite: impl CipherSuite + 'static) -> Self {
        Self {
            store: Box::new(store),
            suite: Box::new(suite),
            clock: Box::new(SystemClock),
        }
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Where the document lives.
    pub fn location(&self) -> &Path {
        self.store.location()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn is_initialized(&self) -> Result<bool> {
        Ok(self.store.read()?.document.is_some())
    }

    // ------------------------------------------------------------------
    // Shared helpers
    // ------------------------------------------------------------------

    /// Read the document, failing when the vault was never initialized.
    fn load(&self) -> Result<(VaultDocument, Revision)> {
        let snapshot = self.store.read()?;
        match snapshot.document {
            Some(document) => Ok((document, snapshot.revision)),
            None => Err(LocalSafeError::VaultNotInitialized(
                self.location().to_path_buf(),
            )),
        }
    }

    fn commit(&self, document: &VaultDocument, base: &Revision) -> Result<PathBuf> {
        self.store.write(document, base)
    }

    fn seal(&self, passphrase: &str, payload: &SecretPayload) -> Result<EncryptedPayload> {
        let plaintext = payload.to_plaintext()?;
        self.suite.encrypt(passphrase, &plaintext)
    }

    /// Decrypt an entry's payload.  Every failure surfaces as
    /// `DecryptionFailed`.
    fn open(&self, passphrase: &str, entry: &Entry) -> Result<SecretPayload> {
        let plaintext = self
            .suite
            .decrypt(passphrase, &entry.secret)
            .map_err(|_| LocalSafeError::DecryptionFailed)?;
        SecretPayload::from_plaintext(&plaintext)
    }
}

fn require_passphrase(passphrase: &str) -> Result<()> {
    if passphrase.is_empty() {
        return Err(LocalSafeError::Validation("Passphrase is required.".into()));
    }
    Ok(())
}
