//! Soft and hard delete.
//!
//! Both modes move every matched entry out of `entries` and archive a
//! snapshot in the trash; they differ only in the recorded action and
//! in hard delete needing the `delete` confirmation token.

use super::{confirm, Outcome, Vault};
use crate::errors::{LocalSafeError, Result};
use crate::vault::{Entry, Selector, TrashAction, TrashRecord};

#[derive(Debug, Clone, Default)]
pub struct DeleteRequest {
    pub selector: Selector,
    pub soft: bool,
    pub confirm: Option<String>,
}

/// Entries removed by a delete.
#[derive(Debug, Clone, PartialEq)]
pub struct DeletedEntries {
    pub entries: Vec<Entry>,
    pub soft: bool,
}

impl Vault {
    pub fn delete(&self, request: &DeleteRequest) -> Result<Outcome<DeletedEntries>> {
        let (mut document, revision) = self.load()?;
        if request.selector.is_empty() {
            return Err(LocalSafeError::Validation(
                "Provide --id, --name, --tag or --domain to choose entries.".into(),
            ));
        }

        let (targets, survivors): (Vec<Entry>, Vec<Entry>) = std::mem::take(&mut document.entries)
            .into_iter()
            .partition(|e| request.selector.matches(e));
        if targets.is_empty() {
            return Err(LocalSafeError::EntryNotFound(request.selector.to_string()));
        }

        if !request.soft && !confirm::is_confirmed(request.confirm.as_deref(), confirm::DELETE) {
            tracing::debug!(count = targets.len(), "hard delete awaiting confirmation");
            return Ok(Outcome::Pending {
                count: targets.len(),
            });
        }

        let now = self.now();
        let action = if request.soft {
            TrashAction::SoftDelete
        } else {
            TrashAction::Delete
        };
        document.entries = survivors;
        document.trash.extend(
            targets
                .iter()
                .cloned()
                .map(|entry| TrashRecord::new(action, now, entry)),
        );
        document.updated_at = now;
        self.commit(&document, &revision)?;

        tracing::info!(count = targets.len(), %action, "entries deleted");
        Ok(Outcome::Done(DeletedEntries {
            entries: targets,
            soft: request.soft,
        }))
    }
}
