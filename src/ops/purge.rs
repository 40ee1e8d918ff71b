//! Permanently drop trash records.

use super::{confirm, Outcome, Vault};
use crate::errors::Result;
use crate::retention::PurgeCutoff;
use crate::vault::TrashRecord;

#[derive(Debug, Clone, Default)]
pub struct PurgeRequest {
    pub cutoff: PurgeCutoff,
    pub confirm: Option<String>,
}

impl Vault {
    /// Remove every trash record archived at or before the cutoff.
    ///
    /// Returns the removed records.  Finding nothing to purge is a
    /// successful no-op and does not need the `purge` token.
    pub fn purge(&self, request: &PurgeRequest) -> Result<Outcome<Vec<TrashRecord>>> {
        let (mut document, revision) = self.load()?;
        let cutoff = request.cutoff.resolve(self.now())?;

        let is_candidate =
            |record: &TrashRecord| cutoff.map_or(true, |limit| record.timestamp <= limit);
        let count = document.trash.iter().filter(|r| is_candidate(r)).count();
        if count == 0 {
            return Ok(Outcome::Done(Vec::new()));
        }

        if !confirm::is_confirmed(request.confirm.as_deref(), confirm::PURGE) {
            return Ok(Outcome::Pending { count });
        }

        let (removed, kept): (Vec<TrashRecord>, Vec<TrashRecord>) =
            std::mem::take(&mut document.trash)
                .into_iter()
                .partition(|r| is_candidate(r));
        document.trash = kept;
        document.updated_at = self.now();
        self.commit(&document, &revision)?;

        tracing::info!(removed = removed.len(), "trash purged");
        Ok(Outcome::Done(removed))
    }
}
