//! CLI module: Clap argument parser, shared helpers, and command implementations.

pub mod commands;
pub mod output;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::audit::{self, AuditSink};
use crate::config::Settings;
use crate::crypto::Pbkdf2AesGcm;
use crate::errors::{LocalSafeError, Result};
use crate::ops::{Outcome, Vault};
use crate::vault::FileStore;

/// Environment variable consulted for the passphrase before prompting.
pub const PASSPHRASE_ENV: &str = "LOCALSAFE_PASSPHRASE";

/// LocalSafe CLI: local encrypted credential vault.
#[derive(Parser)]
#[command(
    name = "localsafe",
    about = "Local, file-backed credential vault",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ./localsafe.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Vault file, overriding `paths.vault` from the config
    #[arg(long, global = true)]
    pub vault: Option<PathBuf>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create an empty vault
    Init,

    /// Show vault location and counts
    Status,

    /// Add a credential
    Add {
        /// Display name (default: "Untitled entry")
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        url: Option<String>,
        /// Secret value (omit for interactive prompt)
        #[arg(long)]
        secret: Option<String>,
        /// Free-form note, encrypted with the secret
        #[arg(long)]
        note: Option<String>,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
        /// Passphrase (or set LOCALSAFE_PASSPHRASE)
        #[arg(long)]
        passphrase: Option<String>,
    },

    /// List entries without decrypting them
    List {
        /// Only entries carrying this tag
        #[arg(long)]
        tag: Option<String>,
        /// Only entries whose url has this hostname
        #[arg(long)]
        domain: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Decrypt and show one entry
    View {
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        passphrase: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Replace an entry's tags
    Tag {
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        name: Option<String>,
        /// Comma-separated tags
        #[arg(long)]
        tags: String,
    },

    /// Change an entry's fields, secret, or passphrase
    Update {
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        new_name: Option<String>,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        url: Option<String>,
        /// Comma-separated tags (replaces the current list)
        #[arg(long)]
        tags: Option<String>,
        #[arg(long)]
        secret: Option<String>,
        #[arg(long)]
        note: Option<String>,
        /// Current passphrase (needed for secret, note, or rotation)
        #[arg(long)]
        passphrase: Option<String>,
        /// Re-encrypt under this passphrase
        #[arg(long)]
        new_passphrase: Option<String>,
    },

    /// Move entries to the trash
    Delete {
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        tag: Option<String>,
        #[arg(long)]
        domain: Option<String>,
        /// Soft delete (no confirmation needed)
        #[arg(long)]
        soft: bool,
        /// Confirmation token for hard delete: "delete"
        #[arg(long)]
        confirm: Option<String>,
    },

    /// Check integrity digests of every entry
    Verify {
        /// Re-stamp missing or mismatched digests
        #[arg(long)]
        fix: bool,
    },

    /// Inspect, restore, or purge archived entries
    Trash {
        #[command(subcommand)]
        action: TrashCommand,
    },

    /// Export the encrypted vault document
    Export {
        /// Output format (only json)
        #[arg(short, long, default_value = "json")]
        format: String,
        /// Indent the JSON
        #[arg(long)]
        pretty: bool,
        /// Output file path (prints to stdout if omitted)
        #[arg(long)]
        dest: Option<PathBuf>,
        /// Confirmation token for stdout export: "export"
        #[arg(long)]
        confirm: Option<String>,
    },

    /// View the audit log of vault operations
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h)
        #[arg(long)]
        since: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Trash subcommands.
#[derive(clap::Subcommand)]
pub enum TrashCommand {
    /// List archived snapshots
    List {
        /// soft-delete, delete, or update
        #[arg(long)]
        action: Option<String>,
        #[arg(long)]
        name: Option<String>,
    },

    /// Put an archived entry back
    Restore {
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        name: Option<String>,
        /// Confirmation token: "restore"
        #[arg(long)]
        confirm: Option<String>,
    },

    /// Permanently drop archived entries
    Purge {
        /// Only records archived on or before this date (e.g. 2024-01-01)
        #[arg(long)]
        before: Option<String>,
        /// Only records older than this (e.g. 7d, 12h)
        #[arg(long)]
        older_than: Option<String>,
        /// Confirmation token: "purge"
        #[arg(long)]
        confirm: Option<String>,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Resolved settings plus the directory relative paths hang off.
pub struct Context {
    pub base_dir: PathBuf,
    pub settings: Settings,
}

impl Context {
    /// Load settings for `cli`, applying the `--vault` override.
    pub fn load(cli: &Cli) -> Result<Self> {
        let base_dir = std::env::current_dir()?;
        let settings =
            Settings::load(&base_dir, cli.config.as_deref())?.with_vault(cli.vault.as_deref());
        Ok(Self { base_dir, settings })
    }

    pub fn vault_path(&self) -> PathBuf {
        self.settings.vault_path(&self.base_dir)
    }

    /// Build a `Vault` over the configured file and cipher.
    pub fn vault(&self) -> Result<Vault> {
        let store = FileStore::new(self.vault_path()).with_mode(self.settings.concurrency());
        let suite = Pbkdf2AesGcm::new(&self.settings.crypto_params())?;
        Ok(Vault::new(store, suite))
    }

    /// Like `vault`, but fails early when no document exists so the
    /// user is not prompted for a passphrase first.
    pub fn initialized_vault(&self) -> Result<Vault> {
        let vault = self.vault()?;
        if !vault.is_initialized()? {
            return Err(LocalSafeError::VaultNotInitialized(
                vault.location().to_path_buf(),
            ));
        }
        Ok(vault)
    }

    /// The configured audit sink; never fails.
    pub fn audit(&self) -> Box<dyn AuditSink> {
        audit::open_sink(&self.settings.audit_path(&self.base_dir))
    }
}

/// Get the passphrase, trying in order:
/// 1. the `--passphrase` flag
/// 2. the `LOCALSAFE_PASSPHRASE` env var
/// 3. an interactive prompt (terminals only)
///
/// Returns `Zeroizing<String>` so the passphrase is wiped from memory on drop.
pub fn resolve_passphrase(flag: Option<&str>, prompt: &str) -> Result<Zeroizing<String>> {
    if let Some(pw) = passphrase_from_flag_or_env(flag) {
        return Ok(pw);
    }

    if !std::io::stdin().is_terminal() {
        return Err(LocalSafeError::Validation(format!(
            "Passphrase is required. Pass --passphrase or set {PASSPHRASE_ENV}."
        )));
    }

    let pw = dialoguer::Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| LocalSafeError::CommandFailed(format!("passphrase prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Non-interactive half of `resolve_passphrase`: flag, then env var.
pub fn passphrase_from_flag_or_env(flag: Option<&str>) -> Option<Zeroizing<String>> {
    if let Some(pw) = flag.filter(|pw| !pw.is_empty()) {
        return Some(Zeroizing::new(pw.to_string()));
    }
    std::env::var(PASSPHRASE_ENV)
        .ok()
        .filter(|pw| !pw.is_empty())
        .map(Zeroizing::new)
}

/// Run a confirmation-gated operation.
///
/// `run` is first called with the token from the command line.  If it
/// comes back pending and no token was given, a terminal user is asked
/// to type `expected`; anything else cancels with `ConfirmationRequired`.
/// Without a terminal the pending outcome is returned as-is.
pub fn with_confirmation<T>(
    token: Option<&str>,
    expected: &str,
    mut run: impl FnMut(Option<&str>) -> Result<Outcome<T>>,
) -> Result<Outcome<T>> {
    let count = match run(token)? {
        Outcome::Pending { count } => count,
        done => return Ok(done),
    };
    if token.is_some() || !std::io::stdin().is_terminal() {
        return Ok(Outcome::Pending { count });
    }

    let typed: String = dialoguer::Input::new()
        .with_prompt(format!(
            "{count} item(s) affected. Type '{expected}' to proceed"
        ))
        .allow_empty(true)
        .interact_text()
        .map_err(|e| LocalSafeError::CommandFailed(format!("confirm prompt: {e}")))?;

    if typed.trim() != expected {
        return Err(LocalSafeError::ConfirmationRequired {
            expected: expected.to_string(),
        });
    }
    run(Some(expected))
}

/// "1 entry" / "3 entries".
pub fn count_label(count: usize) -> String {
    if count == 1 {
        "1 entry".to_string()
    } else {
        format!("{count} entries")
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "localsafe",
            "list",
            "--tag",
            "work",
            "--vault",
            "/tmp/v.json",
        ])
        .unwrap();
        assert_eq!(cli.vault.as_deref(), Some(std::path::Path::new("/tmp/v.json")));
        assert!(matches!(cli.command, Commands::List { tag: Some(ref t), .. } if t == "work"));
    }

    #[test]
    fn parses_trash_purge() {
        let cli = Cli::try_parse_from([
            "localsafe",
            "trash",
            "purge",
            "--older-than",
            "7d",
            "--confirm",
            "purge",
        ])
        .unwrap();
        let Commands::Trash {
            action:
                TrashCommand::Purge {
                    older_than,
                    confirm,
                    before,
                },
        } = cli.command
        else {
            panic!("expected trash purge");
        };
        assert_eq!(older_than.as_deref(), Some("7d"));
        assert_eq!(confirm.as_deref(), Some("purge"));
        assert!(before.is_none());
    }

    #[test]
    fn flag_passphrase_wins() {
        let pw = passphrase_from_flag_or_env(Some("flag-pw")).unwrap();
        assert_eq!(pw.as_str(), "flag-pw");
    }

    #[test]
    fn confirmed_outcomes_pass_through() {
        let outcome = with_confirmation(Some("delete"), "delete", |token| {
            assert_eq!(token, Some("delete"));
            Ok(Outcome::Done(3))
        })
        .unwrap();
        assert_eq!(outcome, Outcome::Done(3));
    }

    #[test]
    fn wrong_token_stays_pending() {
        let mut calls = 0;
        let outcome = with_confirmation(Some("nope"), "delete", |_| {
            calls += 1;
            Ok(Outcome::<()>::Pending { count: 2 })
        })
        .unwrap();
        assert_eq!(outcome, Outcome::Pending { count: 2 });
        assert_eq!(calls, 1);
    }

    #[test]
    fn count_labels() {
        assert_eq!(count_label(1), "1 entry");
        assert_eq!(count_label(0), "0 entries");
    }
}
