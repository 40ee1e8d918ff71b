//! `localsafe delete`: move entries to the trash.

use serde_json::json;

use crate::audit::events;
use crate::cli::output;
use crate::cli::{count_label, with_confirmation, Context};
use crate::errors::Result;
use crate::ops::{confirm, DeleteRequest, Outcome};
use crate::vault::Selector;

/// Execute the `delete` command.
pub fn execute(
    ctx: &Context,
    selector: Selector,
    soft: bool,
    token: Option<&str>,
) -> Result<()> {
    let vault = ctx.vault()?;

    let outcome = with_confirmation(token, confirm::DELETE, |token| {
        vault.delete(&DeleteRequest {
            selector: selector.clone(),
            soft,
            confirm: token.map(str::to_string),
        })
    })?;

    let deleted = match outcome {
        Outcome::Done(deleted) => deleted,
        Outcome::Pending { count } => {
            output::warning(&format!(
                "Pending deletion for {}. Re-run with --confirm delete to proceed.",
                count_label(count)
            ));
            return Ok(());
        }
    };

    let audit = ctx.audit();
    for entry in &deleted.entries {
        audit.record(
            events::DELETE_ENTRY,
            json!({
                "id": entry.id,
                "name": entry.name,
                "tags": entry.tags,
                "softDelete": deleted.soft,
            }),
        );
    }

    if deleted.soft {
        output::success(&format!("Soft-deleted {}.", count_label(deleted.entries.len())));
        output::tip("Restore with `localsafe trash restore --id <ID> --confirm restore`.");
    } else {
        output::success(&format!("Removed {}.", count_label(deleted.entries.len())));
    }
    Ok(())
}
