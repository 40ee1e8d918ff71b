//! Vault module: the persisted document and its storage.
//!
//! This module provides:
//! - `Entry`, `SecretPayload`, and `RevealedEntry` (`entry`)
//! - `VaultDocument` and trash records (`document`)
//! - Entry lookups, bulk selectors, and tag normalization (`selector`)
//! - The `DocumentStore` contract with file and memory backends (`store`)

pub mod document;
pub mod entry;
pub mod selector;
pub mod store;
pub mod timestamp;

// Re-export the most commonly used items.
pub use document::{TrashAction, TrashRecord, VaultDocument, CURRENT_VERSION};
pub use entry::{Entry, EntryMeta, RevealedEntry, SecretPayload, UNTITLED};
pub use selector::{domain_of, normalize_tags, parse_tags, EntryLookup, Selector};
pub use store::{ConcurrencyMode, DocumentStore, FileStore, MemoryStore, Revision, Snapshot};
