use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::{CryptoParams, KdfParams, ALGORITHM};
use crate::errors::{LocalSafeError, Result};
use crate::retention::RetentionPolicy;
use crate::vault::ConcurrencyMode;

/// LocalSafe configuration, loaded from `localsafe.toml`.
///
/// Every field has a default so LocalSafe works without a config file.
/// Relative paths are resolved against the working directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub paths: PathSettings,

    #[serde(default)]
    pub crypto: CryptoSettings,

    #[serde(default)]
    pub retention: RetentionSettings,

    #[serde(default)]
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSettings {
    /// Vault document location.
    #[serde(default = "default_vault")]
    pub vault: PathBuf,

    /// SQLite audit database location.
    #[serde(default = "default_audit_log")]
    pub audit_log: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoSettings {
    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    /// PBKDF2 iteration count.
    #[serde(default = "default_iterations")]
    pub iterations: u32,

    /// Derived key size in bytes.
    #[serde(default = "default_key_size")]
    pub key_size: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionSettings {
    /// Purge trash records older than this (`7d`, `12h`) at startup.
    #[serde(default)]
    pub trash_older_than: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub concurrency: ConcurrencyMode,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault() -> PathBuf {
    PathBuf::from("assets").join("vault.json")
}

fn default_audit_log() -> PathBuf {
    PathBuf::from("logs").join("audit.db")
}

fn default_algorithm() -> String {
    ALGORITHM.to_string()
}

fn default_iterations() -> u32 {
    KdfParams::default().iterations
}

fn default_key_size() -> usize {
    KdfParams::default().key_size
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            vault: default_vault(),
            audit_log: default_audit_log(),
        }
    }
}

impl Default for CryptoSettings {
    fn default() -> Self {
        Self {
            algorithm: default_algorithm(),
            iterations: default_iterations(),
            key_size: default_key_size(),
        }
    }
}

// ── Implementation ───────────────────────────────────────────────────

impl Settings {
    /// Name of the config file looked up in the working directory.
    pub const FILE_NAME: &'static str = "localsafe.toml";

    /// Load from `explicit` if given, else `<base_dir>/localsafe.toml`.
    ///
    /// A missing file yields defaults; an unparsable one is an error.
    pub fn load(base_dir: &Path, explicit: Option<&Path>) -> Result<Self> {
        let config_path = match explicit {
            Some(path) => base_dir.join(path),
            None => base_dir.join(Self::FILE_NAME),
        };

        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file; using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&config_path)
    }

    /// Parse a specific TOML file.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(config_path)?;
        toml::from_str(&contents).map_err(|e| {
            LocalSafeError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })
    }

    /// Replace the vault path (the `--vault` flag).
    pub fn with_vault(mut self, vault: Option<&Path>) -> Self {
        if let Some(path) = vault {
            self.paths.vault = path.to_path_buf();
        }
        self
    }

    pub fn vault_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.paths.vault)
    }

    pub fn audit_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.paths.audit_log)
    }

    /// Cipher configuration for `Pbkdf2AesGcm::new`.
    pub fn crypto_params(&self) -> CryptoParams {
        CryptoParams {
            algorithm: self.crypto.algorithm.clone(),
            kdf: KdfParams {
                iterations: self.crypto.iterations,
                key_size: self.crypto.key_size,
            },
        }
    }

    pub fn retention_policy(&self) -> RetentionPolicy {
        RetentionPolicy::new(self.retention.trash_older_than.clone())
    }

    pub fn concurrency(&self) -> ConcurrencyMode {
        self.storage.concurrency
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_sensible() {
        let s = Settings::default();
        assert_eq!(s.paths.vault, Path::new("assets/vault.json"));
        assert_eq!(s.paths.audit_log, Path::new("logs/audit.db"));
        assert_eq!(s.crypto.algorithm, "aes-256-gcm");
        assert_eq!(s.crypto.iterations, 210_000);
        assert_eq!(s.crypto.key_size, 32);
        assert_eq!(s.retention.trash_older_than, None);
        assert_eq!(s.concurrency(), ConcurrencyMode::Optimistic);
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(Settings::load(tmp.path(), None).unwrap(), Settings::default());
        assert_eq!(
            Settings::load(tmp.path(), Some(Path::new("missing.toml"))).unwrap(),
            Settings::default()
        );
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
[paths]
vault = "data/secrets.json"
audit_log = "data/audit.db"

[crypto]
iterations = 500000

[retention]
trash_older_than = "30d"

[storage]
concurrency = "last-writer-wins"
"#;
        fs::write(tmp.path().join("localsafe.toml"), config).unwrap();

        let s = Settings::load(tmp.path(), None).unwrap();
        assert_eq!(s.vault_path(tmp.path()), tmp.path().join("data/secrets.json"));
        assert_eq!(s.audit_path(tmp.path()), tmp.path().join("data/audit.db"));
        assert_eq!(s.crypto.iterations, 500_000);
        assert_eq!(s.crypto.key_size, 32);
        assert_eq!(s.retention_policy().trash_older_than.as_deref(), Some("30d"));
        assert_eq!(s.concurrency(), ConcurrencyMode::LastWriterWins);
    }

    #[test]
    fn explicit_config_path_is_used() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("alt.toml"), "[crypto]\niterations = 7\n").unwrap();
        let s = Settings::load(tmp.path(), Some(Path::new("alt.toml"))).unwrap();
        assert_eq!(s.crypto_params().kdf.iterations, 7);
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("localsafe.toml"), "not valid {{toml").unwrap();
        assert!(matches!(
            Settings::load(tmp.path(), None),
            Err(LocalSafeError::ConfigError(_))
        ));
    }

    #[test]
    fn vault_override_and_absolute_paths() {
        let s = Settings::default().with_vault(Some(Path::new("/srv/vault.json")));
        assert_eq!(s.vault_path(Path::new("/home/me")), Path::new("/srv/vault.json"));
        let s = Settings::default().with_vault(None);
        assert_eq!(
            s.vault_path(Path::new("/home/me")),
            Path::new("/home/me/assets/vault.json")
        );
    }
}
