//! Persistence for the vault document.
//!
//! `DocumentStore` is the only stateful collaborator the operations
//! touch: `read` returns the current document plus a `Revision`, and
//! `write` replaces the whole document in one step.
//!
//! `FileStore` writes pretty-printed JSON via temp-file + rename so a
//! reader never sees a half-written file.  In `Optimistic` mode it also
//! refuses to overwrite a file whose bytes changed since they were read.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::document::VaultDocument;
use crate::errors::{LocalSafeError, Result};

/// Fingerprint of the bytes a document was read from.
///
/// `Revision::absent()` stands for "no document existed".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Revision(Option<String>);

impl Revision {
    pub fn absent() -> Self {
        Self(None)
    }

    pub fn of(bytes: &[u8]) -> Self {
        Self(Some(hex::encode(Sha256::digest(bytes))))
    }

    pub fn is_absent(&self) -> bool {
        self.0.is_none()
    }
}

/// A document as read from the store.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// `None` when the vault has not been initialized.
    pub document: Option<VaultDocument>,
    pub revision: Revision,
}

/// How `write` treats changes made by someone else since `read`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConcurrencyMode {
    /// Reject the write if the stored bytes moved.
    #[default]
    Optimistic,
    /// Overwrite unconditionally; the later writer wins.
    LastWriterWins,
}

/// Whole-document persistence.
pub trait DocumentStore {
    /// Where the document lives (a path, or a pseudo-path for memory).
    fn location(&self) -> &Path;

    /// Read the current document.
    fn read(&self) -> Result<Snapshot>;

    /// Replace the document.  `base` is the revision the caller read.
    fn write(&self, document: &VaultDocument, base: &Revision) -> Result<PathBuf>;
}

/// Parse stored bytes.  Empty or whitespace-only content means "absent".
fn decode(bytes: &[u8]) -> Result<Snapshot> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| LocalSafeError::InvalidVaultFormat("vault is not valid UTF-8".into()))?;

    if text.trim().is_empty() {
        return Ok(Snapshot {
            document: None,
            revision: Revision::of(bytes),
        });
    }

    let document: VaultDocument = serde_json::from_str(text)
        .map_err(|e| LocalSafeError::InvalidVaultFormat(format!("vault JSON: {e}")))?;

    Ok(Snapshot {
        document: Some(document),
        revision: Revision::of(bytes),
    })
}

fn encode(document: &VaultDocument) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(document)
        .map_err(|e| LocalSafeError::SerializationError(format!("vault: {e}")))
}

// ---------------------------------------------------------------------------
// FileStore
// ---------------------------------------------------------------------------

/// JSON file on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    mode: ConcurrencyMode,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            mode: ConcurrencyMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: ConcurrencyMode) -> Self {
        self.mode = mode;
        self
    }

    fn current_revision(&self) -> Result<Revision> {
        if !self.path.exists() {
            return Ok(Revision::absent());
        }
        Ok(Revision::of(&fs::read(&self.path)?))
    }
}

impl DocumentStore for FileStore {
    fn location(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Snapshot> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "vault file absent");
            return Ok(Snapshot {
                document: None,
                revision: Revision::absent(),
            });
        }

        let bytes = fs::read(&self.path)?;
        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "vault read");
        decode(&bytes)
    }

    fn write(&self, document: &VaultDocument, base: &Revision) -> Result<PathBuf> {
        let bytes = encode(document)?;

        if self.mode == ConcurrencyMode::Optimistic && self.current_revision()? != *base {
            tracing::warn!(path = %self.path.display(), "vault changed since read; refusing write");
            return Err(LocalSafeError::ConcurrentModification(self.path.clone()));
        }

        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        fs::create_dir_all(parent)?;

        // Temp file in the same directory so the rename stays on one filesystem.
        let tmp_path = parent.join(format!(
            ".{}.tmp",
            self.path.file_name().unwrap_or_default().to_string_lossy()
        ));
        fs::write(&tmp_path, &bytes)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp_path, fs::Permissions::from_mode(0o600))?;
        }

        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "vault written");
        Ok(self.path.clone())
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct MemoryInner {
    bytes: Option<Vec<u8>>,
    writes: usize,
}

/// In-memory store with the same contract as `FileStore`.
///
/// Clones share state, so a test can keep a handle after giving one
/// to a `Vault`.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    location: PathBuf,
    inner: Rc<RefCell<MemoryInner>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            location: PathBuf::from("memory://vault.json"),
            inner: Rc::default(),
        }
    }

    /// A store that already holds `document`.
    pub fn with_document(document: &VaultDocument) -> Result<Self> {
        let store = Self::new();
        store.inner.borrow_mut().bytes = Some(encode(document)?);
        Ok(store)
    }

    /// A store holding raw text, for malformed-input cases.
    pub fn with_raw(text: &str) -> Self {
        let store = Self::new();
        store.inner.borrow_mut().bytes = Some(text.as_bytes().to_vec());
        store
    }

    /// The stored document, if any.
    pub fn document(&self) -> Result<Option<VaultDocument>> {
        self.read().map(|s| s.document)
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.inner.borrow().writes
    }
}

impl DocumentStore for MemoryStore {
    fn location(&self) -> &Path {
        &self.location
    }

    fn read(&self) -> Result<Snapshot> {
        match &self.inner.borrow().bytes {
            Some(bytes) => decode(bytes),
            None => Ok(Snapshot {
                document: None,
                revision: Revision::absent(),
            }),
        }
    }

    fn write(&self, document: &VaultDocument, base: &Revision) -> Result<PathBuf> {
        let bytes = encode(document)?;
        let mut inner = self.inner.borrow_mut();

        let current = inner
            .bytes
            .as_deref()
            .map_or_else(Revision::absent, Revision::of);
        if current != *base {
            return Err(LocalSafeError::ConcurrentModification(self.location.clone()));
        }

        inner.bytes = Some(bytes);
        inner.writes += 1;
        Ok(self.location.clone())
    }
}
