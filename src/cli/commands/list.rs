//! `localsafe list`: display entry metadata in a table.

use crate::cli::output;
use crate::cli::{count_label, Context};
use crate::errors::{LocalSafeError, Result};
use crate::ops::ListFilter;

/// Execute the `list` command.
pub fn execute(ctx: &Context, tag: Option<&str>, domain: Option<&str>, json: bool) -> Result<()> {
    let filter = ListFilter {
        tag: tag.map(str::to_string),
        domain: domain.map(str::to_string),
    };
    let filtered = filter.tag.is_some() || filter.domain.is_some();
    let rows = ctx.vault()?.list(&filter)?;

    if json {
        let text = serde_json::to_string_pretty(&rows)
            .map_err(|e| LocalSafeError::SerializationError(format!("list: {e}")))?;
        println!("{text}");
        return Ok(());
    }

    if rows.is_empty() {
        if filtered {
            output::info("No entries matched the provided filters.");
        } else {
            output::info("Vault empty.");
            output::tip("Add credentials with `localsafe add`.");
        }
        return Ok(());
    }

    output::info(&count_label(rows.len()));
    output::print_entries_table(&rows);
    Ok(())
}
