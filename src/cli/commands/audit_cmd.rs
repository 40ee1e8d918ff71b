//! `localsafe audit`: display the audit log.
//!
//! Usage:
//!   localsafe audit               # show last 50 events
//!   localsafe audit --last 20     # show last 20
//!   localsafe audit --since 7d    # events from the last 7 days

use crate::cli::Context;
use crate::errors::Result;

#[cfg(feature = "audit-log")]
use crate::audit::{AuditEntry, AuditLog};
#[cfg(feature = "audit-log")]
use crate::cli::output;
#[cfg(feature = "audit-log")]
use crate::errors::LocalSafeError;

/// Execute the `audit` command.
#[cfg(feature = "audit-log")]
pub fn execute(ctx: &Context, last: usize, since: Option<&str>) -> Result<()> {
    let path = ctx.settings.audit_path(&ctx.base_dir);
    let audit = AuditLog::open(&path)
        .ok_or_else(|| LocalSafeError::AuditError("failed to open audit database".into()))?;

    let since = since
        .map(|age| crate::retention::PurgeCutoff::OlderThan(age.to_string()))
        .map(|cutoff| cutoff.resolve(chrono::Utc::now()))
        .transpose()?
        .flatten();

    let entries = audit.query(last, since)?;
    if entries.is_empty() {
        output::info("No audit entries found.");
        return Ok(());
    }

    print_audit_table(&entries);
    Ok(())
}

#[cfg(not(feature = "audit-log"))]
pub fn execute(_ctx: &Context, _last: usize, _since: Option<&str>) -> Result<()> {
    Err(crate::errors::LocalSafeError::AuditError(
        "this build has no audit log support (enable the `audit-log` feature)".into(),
    ))
}

/// Print audit events in a formatted table.
#[cfg(feature = "audit-log")]
pub fn print_audit_table(entries: &[AuditEntry]) {
    use comfy_table::{ContentArrangement, Table};
    use console::style;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Event", "Details"]);

    for entry in entries {
        table.add_row(vec![
            entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            colorize_event(&entry.event),
            entry.payload.to_string(),
        ]);
    }

    println!(
        "{}",
        style(format!("{} audit entries:", entries.len())).bold()
    );
    println!("{table}");
}

#[cfg(feature = "audit-log")]
fn colorize_event(event: &str) -> String {
    use crate::audit::events::*;
    use console::style;

    match event {
        ADD_ENTRY | TRASH_RESTORE => style(event).green().to_string(),
        UPDATE_ENTRY | UPDATE_TAGS | VERIFY_FIX => style(event).blue().to_string(),
        DELETE_ENTRY | TRASH_PURGE => style(event).red().to_string(),
        EXPORT_VAULT => style(event).cyan().to_string(),
        _ => event.to_string(),
    }
}
