//! Read-only view of the trash archive.

use super::Vault;
use crate::errors::Result;
use crate::vault::{TrashAction, TrashRecord};

/// Optional filters for `trash list`; both must match when both are set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrashFilter {
    pub action: Option<TrashAction>,
    /// Case-insensitive exact match on the archived entry's name.
    pub name: Option<String>,
}

impl TrashFilter {
    pub fn matches(&self, record: &TrashRecord) -> bool {
        self.action.map_or(true, |a| record.action == a)
            && self
                .name
                .as_deref()
                .map_or(true, |n| record.entry.name.to_lowercase() == n.to_lowercase())
    }
}

impl Vault {
    /// Trash records oldest first.
    pub fn list_trash(&self, filter: &TrashFilter) -> Result<Vec<TrashRecord>> {
        let (document, _) = self.load()?;
        Ok(document
            .trash
            .into_iter()
            .filter(|r| filter.matches(r))
            .collect())
    }
}
