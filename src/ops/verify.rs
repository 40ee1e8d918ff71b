//! Integrity scan over every live entry.

use super::Vault;
use crate::errors::Result;
use crate::integrity::{self, VerifyReport};

impl Vault {
    /// Check every entry's digest.  With `fix`, failing entries are
    /// re-stamped and the document is written (only if something failed).
    pub fn verify(&self, fix: bool) -> Result<VerifyReport> {
        let (mut document, revision) = self.load()?;
        let (report, entries) = integrity::scan(std::mem::take(&mut document.entries), fix);
        document.entries = entries;

        if fix && report.fixed > 0 {
            document.updated_at = self.now();
            self.commit(&document, &revision)?;
            tracing::info!(fixed = report.fixed, "integrity digests re-stamped");
        } else if !report.ok {
            tracing::warn!(mismatches = report.mismatches.len(), "integrity check failed");
        }
        Ok(report)
    }
}
