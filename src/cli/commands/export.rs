//! `localsafe export`: write the encrypted vault document as JSON.

use std::path::Path;

use serde_json::json;

use crate::audit::events;
use crate::cli::output;
use crate::cli::{count_label, with_confirmation, Context};
use crate::errors::Result;
use crate::ops::{confirm, ExportDestination, ExportRequest, Exported, Outcome};

/// Execute the `export` command.
pub fn execute(
    ctx: &Context,
    format: &str,
    pretty: bool,
    dest: Option<&Path>,
    token: Option<&str>,
) -> Result<()> {
    let vault = ctx.vault()?;
    let destination = match dest {
        Some(path) => ExportDestination::File(ctx.base_dir.join(path)),
        None => ExportDestination::Stdout,
    };

    let outcome = with_confirmation(token, confirm::EXPORT, |token| {
        vault.export(&ExportRequest {
            format: format.to_string(),
            pretty,
            destination: destination.clone(),
            confirm: token.map(str::to_string),
        })
    })?;

    let target = match outcome {
        Outcome::Done(Exported::Stdout(text)) => {
            println!("{text}");
            "stdout".to_string()
        }
        Outcome::Done(Exported::File(path)) => {
            output::success(&format!("Vault written to {}", path.display()));
            path.display().to_string()
        }
        Outcome::Pending { count } => {
            output::warning(&format!(
                "Export would print {} to stdout. Re-run with --confirm export to proceed.",
                count_label(count)
            ));
            return Ok(());
        }
    };

    ctx.audit().record(
        events::EXPORT_VAULT,
        json!({ "destination": target, "format": format.to_lowercase() }),
    );
    Ok(())
}
