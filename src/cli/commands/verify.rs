//! `localsafe verify`: check (and optionally repair) integrity digests.

use serde_json::json;

use crate::audit::events;
use crate::cli::output;
use crate::cli::Context;
use crate::errors::Result;

/// Execute the `verify` command.
pub fn execute(ctx: &Context, fix: bool) -> Result<()> {
    let report = ctx.vault()?.verify(fix)?;

    if report.fixed > 0 {
        ctx.audit().record(
            events::VERIFY_FIX,
            json!({ "checked": report.checked, "fixed": report.fixed }),
        );
    }
    output::print_verify_report(&report);
    Ok(())
}
