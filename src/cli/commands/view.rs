//! `localsafe view`: decrypt and print one entry.

use serde_json::json;

use crate::audit::events;
use crate::cli::output;
use crate::cli::{resolve_passphrase, Context};
use crate::errors::{LocalSafeError, Result};
use crate::vault::EntryLookup;

/// Execute the `view` command.
pub fn execute(
    ctx: &Context,
    id: Option<&str>,
    name: Option<&str>,
    passphrase: Option<&str>,
    as_json: bool,
) -> Result<()> {
    let vault = ctx.initialized_vault()?;
    let lookup = EntryLookup::from_parts(id, name);
    lookup.require()?;
    let passphrase = resolve_passphrase(passphrase, "Vault passphrase")?;

    let entry = vault.view(&lookup, &passphrase)?;

    ctx.audit().record(
        events::VIEW_ENTRY,
        json!({ "id": entry.id, "name": entry.name, "tags": entry.tags }),
    );

    if as_json {
        let text = serde_json::to_string_pretty(&entry.to_json())
            .map_err(|e| LocalSafeError::SerializationError(format!("view: {e}")))?;
        println!("{text}");
    } else {
        output::print_revealed(&entry);
    }
    Ok(())
}
