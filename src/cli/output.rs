//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use super::count_label;
use crate::integrity::VerifyReport;
use crate::ops::EntrySummary;
use crate::vault::{RevealedEntry, TrashRecord};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

/// Print entry metadata (#, Name, Username, URL, Domain, Tags, Updated).
pub fn print_entries_table(rows: &[EntrySummary]) {
    let mut t = table(vec![
        "#", "Name", "Username", "URL", "Domain", "Tags", "Updated",
    ]);
    for row in rows {
        t.add_row(vec![
            row.index.to_string(),
            row.name.clone(),
            row.username.clone(),
            row.url.clone(),
            row.domain.clone(),
            row.tags.join(","),
            row.updated_at.format(TIME_FORMAT).to_string(),
        ]);
    }
    println!("{t}");
}

/// Print trash records (#, Action, Name, ID, Archived).
pub fn print_trash_table(records: &[TrashRecord]) {
    let mut t = table(vec!["#", "Action", "Name", "ID", "Archived"]);
    for (i, record) in records.iter().enumerate() {
        t.add_row(vec![
            (i + 1).to_string(),
            record.action.to_string(),
            record.entry.name.clone(),
            record.entry.id.clone(),
            record.timestamp.format(TIME_FORMAT).to_string(),
        ]);
    }
    println!("{t}");
}

/// Print one decrypted entry as a two-column table.
pub fn print_revealed(entry: &RevealedEntry) {
    let mut t = table(vec!["Field", "Value"]);
    for (field, value) in [
        ("ID", entry.id.clone()),
        ("Name", entry.name.clone()),
        ("Username", entry.username.clone()),
        ("URL", entry.url.clone()),
        ("Tags", entry.tags.join(",")),
        ("Secret", entry.payload.secret.clone()),
        ("Note", entry.payload.note.clone()),
        ("Created", entry.created_at.format(TIME_FORMAT).to_string()),
        ("Updated", entry.updated_at.format(TIME_FORMAT).to_string()),
    ] {
        t.add_row(vec![field.to_string(), value]);
    }
    println!("{t}");
}

/// Print the outcome of `verify`.
pub fn print_verify_report(report: &VerifyReport) {
    if report.ok {
        success(&format!("Verified {}.", count_label(report.checked)));
        return;
    }

    let mut t = table(vec!["ID", "Name", "Problem"]);
    for m in &report.mismatches {
        let reason = style(m.reason.to_string()).red().to_string();
        t.add_row(vec![m.id.clone(), m.name.clone(), reason]);
    }
    warning(&format!(
        "{} of {} entries failed integrity checks:",
        report.mismatches.len(),
        report.checked
    ));
    println!("{t}");

    if report.fixed > 0 {
        success(&format!("Re-stamped {}.", count_label(report.fixed)));
    } else {
        tip("Run `localsafe verify --fix` to re-stamp them.");
    }
}
