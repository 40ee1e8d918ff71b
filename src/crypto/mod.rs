//! Cryptographic primitives for LocalSafe.
//!
//! This module provides:
//! - PBKDF2-HMAC-SHA512 passphrase key derivation (`kdf`)
//! - The `CipherSuite` contract and its AES-256-GCM implementation (`encryption`)

pub mod encryption;
pub mod kdf;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{CipherSuite, EncryptedPayload, Pbkdf2AesGcm};
pub use encryption::{CipherSuite, CryptoParams, EncryptedPayload, Pbkdf2AesGcm, ALGORITHM};
pub use kdf::{derive_key, generate_salt, KdfParams};
