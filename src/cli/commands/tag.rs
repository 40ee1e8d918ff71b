//! `localsafe tag`: replace an entry's tags.

use serde_json::json;

use crate::audit::events;
use crate::cli::output;
use crate::cli::Context;
use crate::errors::Result;
use crate::ops::TagRequest;
use crate::vault::{parse_tags, EntryLookup};

/// Execute the `tag` command.
pub fn execute(ctx: &Context, id: Option<&str>, name: Option<&str>, tags: &str) -> Result<()> {
    let entry = ctx.vault()?.tag(&TagRequest {
        lookup: EntryLookup::from_parts(id, name),
        tags: parse_tags(tags),
    })?;

    ctx.audit().record(
        events::UPDATE_TAGS,
        json!({ "id": entry.id, "name": entry.name, "tags": entry.tags }),
    );
    output::success(&format!(
        "Tags for '{}' set to {}",
        entry.name,
        entry.tags.join(", ")
    ));
    Ok(())
}
