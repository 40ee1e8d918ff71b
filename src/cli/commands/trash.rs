//! `localsafe trash`: list, restore, and purge archived entries.
//!
//! Usage:
//!   localsafe trash list --action soft-delete
//!   localsafe trash restore --id <ID> --confirm restore
//!   localsafe trash purge --older-than 30d --confirm purge

use serde_json::json;

use crate::audit::events;
use crate::cli::output;
use crate::cli::{count_label, with_confirmation, Context};
use crate::errors::Result;
use crate::ops::{confirm, Outcome, PurgeRequest, TrashFilter};
use crate::retention::PurgeCutoff;
use crate::vault::{EntryLookup, TrashAction};

/// Execute `trash list`.
pub fn list(ctx: &Context, action: Option<&str>, name: Option<&str>) -> Result<()> {
    let filter = TrashFilter {
        action: action.map(str::parse::<TrashAction>).transpose()?,
        name: name.map(str::to_string),
    };
    let records = ctx.vault()?.list_trash(&filter)?;

    ctx.audit()
        .record(events::TRASH_LIST, json!({ "count": records.len() }));

    if records.is_empty() {
        output::info("No trash entries matched.");
        return Ok(());
    }
    output::print_trash_table(&records);
    Ok(())
}

/// Execute `trash restore`.
pub fn restore(
    ctx: &Context,
    id: Option<&str>,
    name: Option<&str>,
    token: Option<&str>,
) -> Result<()> {
    let vault = ctx.vault()?;
    let lookup = EntryLookup::from_parts(id, name);

    let outcome = with_confirmation(token, confirm::RESTORE, |token| {
        vault.restore(&lookup, token)
    })?;

    match outcome {
        Outcome::Done(entry) => {
            ctx.audit().record(
                events::TRASH_RESTORE,
                json!({ "id": entry.id, "name": entry.name }),
            );
            output::success(&format!(
                "Restored '{}' ({}) from trash.",
                entry.name, entry.id
            ));
        }
        Outcome::Pending { .. } => {
            output::warning(&format!(
                "Pending restore of {lookup}. Re-run with --confirm restore to proceed."
            ));
        }
    }
    Ok(())
}

/// Execute `trash purge`.
pub fn purge(
    ctx: &Context,
    before: Option<&str>,
    older_than: Option<&str>,
    token: Option<&str>,
) -> Result<()> {
    let vault = ctx.vault()?;
    let cutoff = PurgeCutoff::from_parts(before, older_than);

    let outcome = with_confirmation(token, confirm::PURGE, |token| {
        vault.purge(&PurgeRequest {
            cutoff: cutoff.clone(),
            confirm: token.map(str::to_string),
        })
    })?;

    match outcome {
        Outcome::Done(removed) if removed.is_empty() => {
            output::info("No trash entries matched the purge filters.");
        }
        Outcome::Done(removed) => {
            ctx.audit()
                .record(events::TRASH_PURGE, json!({ "count": removed.len() }));
            output::success(&format!("Purged {} from trash.", count_label(removed.len())));
        }
        Outcome::Pending { count } => {
            output::warning(&format!(
                "Pending purge for {}. Re-run with --confirm purge to proceed.",
                count_label(count)
            ));
        }
    }
    Ok(())
}
