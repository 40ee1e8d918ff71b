//! `localsafe update`: change metadata, secret, note, or passphrase.

use serde_json::json;
use zeroize::Zeroizing;

use crate::audit::events;
use crate::cli::output;
use crate::cli::{passphrase_from_flag_or_env, resolve_passphrase, Context};
use crate::errors::Result;
use crate::ops::{UpdateOutcome, UpdateRequest};
use crate::vault::{parse_tags, EntryLookup};

/// Arguments for `update`, borrowed from the parsed CLI.
pub struct UpdateArgs<'a> {
    pub id: Option<&'a str>,
    pub name: Option<&'a str>,
    pub new_name: Option<&'a str>,
    pub username: Option<&'a str>,
    pub url: Option<&'a str>,
    pub tags: Option<&'a str>,
    pub secret: Option<&'a str>,
    pub note: Option<&'a str>,
    pub passphrase: Option<&'a str>,
    pub new_passphrase: Option<&'a str>,
}

/// Execute the `update` command.
pub fn execute(ctx: &Context, args: &UpdateArgs<'_>) -> Result<()> {
    let vault = ctx.initialized_vault()?;

    // Only ask for a passphrase when the payload has to be opened.
    let needs_passphrase =
        args.secret.is_some() || args.note.is_some() || args.new_passphrase.is_some();
    let passphrase: Option<Zeroizing<String>> = if needs_passphrase {
        Some(resolve_passphrase(args.passphrase, "Current passphrase")?)
    } else {
        passphrase_from_flag_or_env(args.passphrase)
    };

    let outcome = vault.update(&UpdateRequest {
        lookup: EntryLookup::from_parts(args.id, args.name),
        name: args.new_name,
        username: args.username,
        url: args.url,
        tags: args.tags.map(parse_tags),
        secret: args.secret,
        note: args.note,
        passphrase: passphrase.as_deref().map(String::as_str),
        new_passphrase: args.new_passphrase,
    })?;

    match outcome {
        UpdateOutcome::Updated(entry) => {
            ctx.audit().record(
                events::UPDATE_ENTRY,
                json!({ "id": entry.id, "name": entry.name, "tags": entry.tags }),
            );
            output::success(&format!("Updated credential '{}' ({})", entry.name, entry.id));
        }
        UpdateOutcome::Unchanged => {
            output::info("No changes supplied.");
            output::tip(
                "Provide fields like --new-name, --username, --url, --tags, --secret, or --note.",
            );
        }
    }
    Ok(())
}
