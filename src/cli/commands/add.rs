//! `localsafe add`: encrypt and store a new credential.

use std::io::IsTerminal;

use serde_json::json;
use zeroize::Zeroizing;

use crate::audit::events;
use crate::cli::output;
use crate::cli::{resolve_passphrase, Context};
use crate::errors::{LocalSafeError, Result};
use crate::ops::AddRequest;
use crate::vault::parse_tags;

/// Arguments for `add`, borrowed from the parsed CLI.
pub struct AddArgs<'a> {
    pub name: Option<&'a str>,
    pub username: Option<&'a str>,
    pub url: Option<&'a str>,
    pub secret: Option<&'a str>,
    pub note: Option<&'a str>,
    pub tags: Option<&'a str>,
    pub passphrase: Option<&'a str>,
}

/// Execute the `add` command.
pub fn execute(ctx: &Context, args: &AddArgs<'_>) -> Result<()> {
    let vault = ctx.initialized_vault()?;

    let secret = match args.secret.filter(|s| !s.is_empty()) {
        Some(secret) => Zeroizing::new(secret.to_string()),
        None => prompt_secret()?,
    };
    let passphrase = resolve_passphrase(args.passphrase, "Vault passphrase")?;

    let entry = vault.add(&AddRequest {
        name: args.name.unwrap_or_default(),
        username: args.username.unwrap_or_default(),
        url: args.url.unwrap_or_default(),
        secret: &secret,
        note: args.note.unwrap_or_default(),
        tags: args.tags.map(parse_tags).unwrap_or_default(),
        passphrase: &passphrase,
    })?;

    ctx.audit().record(
        events::ADD_ENTRY,
        json!({ "id": entry.id, "name": entry.name, "tags": entry.tags }),
    );
    output::success(&format!("Stored credential '{}' ({})", entry.name, entry.id));
    Ok(())
}

/// Ask for the secret on a terminal; elsewhere an empty secret is
/// passed through and rejected by validation.
fn prompt_secret() -> Result<Zeroizing<String>> {
    if !std::io::stdin().is_terminal() {
        return Ok(Zeroizing::new(String::new()));
    }
    dialoguer::Password::new()
        .with_prompt("Secret")
        .interact()
        .map(Zeroizing::new)
        .map_err(|e| LocalSafeError::CommandFailed(format!("secret prompt: {e}")))
}
