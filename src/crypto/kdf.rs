//! Password-based key derivation using PBKDF2-HMAC-SHA512.
//!
//! Every encrypted payload carries its own random salt, so the same
//! passphrase never produces the same key twice.  Parameters are
//! configurable via `KdfParams` (loaded from `localsafe.toml` or the
//! defaults below).

use hmac::Hmac;
use rand::RngCore;
use sha2::Sha512;
use zeroize::Zeroizing;

use crate::errors::{LocalSafeError, Result};

/// Length of the per-payload salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// Default PBKDF2 iteration count.
pub const DEFAULT_ITERATIONS: u32 = 210_000;

/// Configurable PBKDF2 parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Number of PBKDF2 rounds (default: 210 000).
    pub iterations: u32,
    /// Derived key length in bytes (default: 32).
    pub key_size: usize,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            key_size: KEY_LEN,
        }
    }
}

impl KdfParams {
    /// Reject parameter sets that cannot feed AES-256.
    pub fn validate(&self) -> Result<()> {
        if self.iterations < 1 {
            return Err(LocalSafeError::KeyDerivationFailed(
                "PBKDF2 iterations must be at least 1".into(),
            ));
        }
        if self.key_size != KEY_LEN {
            return Err(LocalSafeError::KeyDerivationFailed(format!(
                "key size must be {KEY_LEN} bytes for AES-256 (got {})",
                self.key_size
            )));
        }
        Ok(())
    }
}

/// Derive a key from a passphrase and salt.
///
/// The same passphrase + salt + params always produce the same key.
/// The returned buffer is wiped when dropped.
pub fn derive_key(
    passphrase: &[u8],
    salt: &[u8],
    params: &KdfParams,
) -> Result<Zeroizing<Vec<u8>>> {
    params.validate()?;

    let mut key = Zeroizing::new(vec![0u8; params.key_size]);
    pbkdf2::pbkdf2::<Hmac<Sha512>>(passphrase, salt, params.iterations, key.as_mut_slice())
        .map_err(|e| {
            LocalSafeError::KeyDerivationFailed(format!("PBKDF2-HMAC-SHA512 failed: {e}"))
        })?;

    Ok(key)
}

/// Generate a cryptographically random salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}
