//! `localsafe status`: where the vault lives and what it holds.

use console::style;

use crate::cli::output;
use crate::cli::Context;
use crate::errors::Result;
use crate::vault::timestamp;

/// Execute the `status` command.
pub fn execute(ctx: &Context) -> Result<()> {
    let status = ctx.vault()?.status()?;
    let audit = ctx.audit();

    println!("{} {}", style("Vault:").bold(), status.location.display());
    if !status.initialized {
        output::warning("Vault not initialized.");
        output::tip("Run `localsafe init` first.");
        return Ok(());
    }

    println!("{} {}", style("Entries:").bold(), status.entries);
    println!("{} {}", style("Trash:").bold(), status.trash);
    if let Some(updated) = status.updated_at {
        println!("{} {}", style("Updated:").bold(), timestamp::format(&updated));
    }
    println!("{} {}", style("Audit:").bold(), audit.target());
    Ok(())
}
