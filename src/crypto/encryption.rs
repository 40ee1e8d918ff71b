//! AES-256-GCM authenticated encryption keyed from a passphrase.
//!
//! Each call to `encrypt` draws a fresh 16-byte salt and 12-byte nonce,
//! derives a key with PBKDF2, and returns every parameter needed for
//! decryption as an `EncryptedPayload`.  Binary fields are stored
//! base64-encoded so the payload drops straight into the JSON document.
//!
//! The GCM auth tag is kept apart from the ciphertext:
//!   ciphertext = AES-GCM(plaintext)      (same length as plaintext)
//!   authTag    = 16-byte GCM tag

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::kdf::{derive_key, generate_salt, KdfParams, SALT_LEN};
use crate::errors::{LocalSafeError, Result};

/// Algorithm tag written into every payload.
pub const ALGORITHM: &str = "aes-256-gcm";

/// Size of the AES-256-GCM nonce in bytes.
const NONCE_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes.
const TAG_LEN: usize = 16;

/// An encrypted blob plus everything needed to decrypt it.
///
/// Opaque to the rest of the crate; only a `CipherSuite` reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedPayload {
    pub algorithm: String,
    pub salt: String,
    pub iv: String,
    pub auth_tag: String,
    pub ciphertext: String,
}

/// Passphrase-based authenticated encryption.
///
/// Injected into the vault so alternate KDF parameters (or test doubles)
/// can be swapped in.
pub trait CipherSuite {
    /// Encrypt `plaintext` under `passphrase` with a fresh salt and nonce.
    fn encrypt(&self, passphrase: &str, plaintext: &[u8]) -> Result<EncryptedPayload>;

    /// Decrypt and authenticate a payload.
    ///
    /// Fails with `DecryptionFailed` on a wrong passphrase or any
    /// tampered field; never returns partial output.
    fn decrypt(&self, passphrase: &str, payload: &EncryptedPayload)
        -> Result<Zeroizing<Vec<u8>>>;

    /// The algorithm tag this suite writes and accepts.
    fn algorithm(&self) -> &str;
}

/// Cipher configuration: algorithm name plus KDF parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CryptoParams {
    pub algorithm: String,
    pub kdf: KdfParams,
}

impl Default for CryptoParams {
    fn default() -> Self {
        Self {
            algorithm: ALGORITHM.to_string(),
            kdf: KdfParams::default(),
        }
    }
}

/// PBKDF2-HMAC-SHA512 key derivation feeding AES-256-GCM.
#[derive(Debug, Clone, Default)]
pub struct Pbkdf2AesGcm {
    kdf: KdfParams,
}

impl Pbkdf2AesGcm {
    /// Build a suite, rejecting any algorithm other than AES-256-GCM.
    pub fn new(params: &CryptoParams) -> Result<Self> {
        if !params.algorithm.eq_ignore_ascii_case(ALGORITHM) {
            return Err(LocalSafeError::UnsupportedAlgorithm(
                params.algorithm.clone(),
            ));
        }
        params.kdf.validate()?;
        Ok(Self { kdf: params.kdf })
    }

    /// The KDF parameters in use.
    pub fn kdf_params(&self) -> KdfParams {
        self.kdf
    }
}

impl CipherSuite for Pbkdf2AesGcm {
    fn encrypt(&self, passphrase: &str, plaintext: &[u8]) -> Result<EncryptedPayload> {
        let salt = generate_salt();
        let key = derive_key(passphrase.as_bytes(), &salt, &self.kdf)?;

        let cipher = Aes256Gcm::new_from_slice(&key)
            .map_err(|e| LocalSafeError::EncryptionFailed(format!("invalid key length: {e}")))?;
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

        // aes-gcm appends the tag to the ciphertext; split it back out.
        let mut sealed = cipher
            .encrypt(&nonce, plaintext)
            .map_err(|e| LocalSafeError::EncryptionFailed(format!("encryption error: {e}")))?;
        let tag = sealed.split_off(sealed.len() - TAG_LEN);

        Ok(EncryptedPayload {
            algorithm: ALGORITHM.to_string(),
            salt: BASE64.encode(salt),
            iv: BASE64.encode(nonce),
            auth_tag: BASE64.encode(tag),
            ciphertext: BASE64.encode(sealed),
        })
    }

    fn decrypt(
        &self,
        passphrase: &str,
        payload: &EncryptedPayload,
    ) -> Result<Zeroizing<Vec<u8>>> {
        if !payload.algorithm.eq_ignore_ascii_case(ALGORITHM) {
            return Err(LocalSafeError::DecryptionFailed);
        }

        let salt = decode_field(&payload.salt, Some(SALT_LEN))?;
        let iv = decode_field(&payload.iv, Some(NONCE_LEN))?;
        let tag = decode_field(&payload.auth_tag, Some(TAG_LEN))?;
        let mut sealed = decode_field(&payload.ciphertext, None)?;
        sealed.extend_from_slice(&tag);

        let key = derive_key(passphrase.as_bytes(), &salt, &self.kdf)?;
        let cipher = Aes256Gcm::new_from_slice(&key).map_err(|_| LocalSafeError::DecryptionFailed)?;

        let plaintext = cipher
            .decrypt(Nonce::from_slice(&iv), sealed.as_slice())
            .map_err(|_| LocalSafeError::DecryptionFailed)?;

        Ok(Zeroizing::new(plaintext))
    }

    fn algorithm(&self) -> &str {
        ALGORITHM
    }
}

/// Decode one base64 field, enforcing its length when it is fixed.
fn decode_field(value: &str, expected_len: Option<usize>) -> Result<Vec<u8>> {
    let bytes = BASE64
        .decode(value)
        .map_err(|_| LocalSafeError::DecryptionFailed)?;
    match expected_len {
        Some(len) if bytes.len() != len => Err(LocalSafeError::DecryptionFailed),
        _ => Ok(bytes),
    }
}
