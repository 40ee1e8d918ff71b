//! `localsafe init`: create an empty vault document.

use crate::cli::output;
use crate::cli::Context;
use crate::errors::Result;
use crate::ops::InitOutcome;

/// Execute the `init` command.
pub fn execute(ctx: &Context) -> Result<()> {
    match ctx.vault()?.init()? {
        InitOutcome::Created(path) => {
            output::success(&format!("Created new vault at {}", path.display()));
            output::tip("Add your first credential with `localsafe add --name <NAME>`.");
        }
        InitOutcome::AlreadyExists(path) => {
            output::info(&format!("Vault already exists at {}", path.display()));
        }
    }
    Ok(())
}
