use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in LocalSafe.
#[derive(Debug, Error)]
pub enum LocalSafeError {
    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Unable to decrypt entry — wrong passphrase or corrupted payload")]
    DecryptionFailed,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Unsupported cipher '{0}' — only aes-256-gcm is available")]
    UnsupportedAlgorithm(String),

    // --- Vault errors ---
    #[error("Vault not initialized at {0}. Run `localsafe init` first.")]
    VaultNotInitialized(PathBuf),

    #[error("Invalid vault format: {0}")]
    InvalidVaultFormat(String),

    #[error("Vault at {0} changed on disk since it was read — re-run the command")]
    ConcurrentModification(PathBuf),

    #[error("{0}")]
    Validation(String),

    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    // --- Lifecycle errors ---
    #[error("Confirmation required — type '{expected}' to proceed")]
    ConfirmationRequired { expected: String },

    #[error("Invalid date '{0}'. Use ISO format (e.g., 2024-01-01).")]
    InvalidDateFormat(String),

    #[error("Invalid duration '{0}'. Use formats like 7d or 12h.")]
    InvalidDurationFormat(String),

    #[error("Unsupported export format '{0}'. Only json is available.")]
    UnsupportedFormat(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- Audit errors ---
    #[error("Audit error: {0}")]
    AuditError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for LocalSafe results.
pub type Result<T> = std::result::Result<T, LocalSafeError>;
