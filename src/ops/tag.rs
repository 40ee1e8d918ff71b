//! Replace an entry's tags.

use super::Vault;
use crate::errors::{LocalSafeError, Result};
use crate::integrity;
use crate::vault::{normalize_tags, Entry, EntryLookup};

#[derive(Debug, Clone, Default)]
pub struct TagRequest {
    pub lookup: EntryLookup,
    /// Raw tags; trimmed and lower-cased before storing.
    pub tags: Vec<String>,
}

impl Vault {
    /// Replace (never merge) the tag list of one entry.
    ///
    /// The previous version is archived to the trash as an `update`.
    pub fn tag(&self, request: &TagRequest) -> Result<Entry> {
        let (mut document, revision) = self.load()?;
        request.lookup.require()?;

        let tags = normalize_tags(&request.tags);
        if tags.is_empty() {
            return Err(LocalSafeError::Validation(
                "Provide at least one tag with --tags.".into(),
            ));
        }

        let index = document
            .find_index(&request.lookup)
            .ok_or_else(|| LocalSafeError::EntryNotFound(request.lookup.to_string()))?;

        let now = self.now();
        let mut next = document.entries[index].clone();
        next.tags = tags;
        next.updated_at = now;
        let next = integrity::stamp(next);

        document.replace_entry(index, next.clone(), now);
        self.commit(&document, &revision)?;

        tracing::info!(id = %next.id, tags = ?next.tags, "entry tags replaced");
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use crate::ops::testing::{self, PASS};
    use crate::ops::AddRequest;
    use crate::vault::TrashAction;

    use super::*;

    fn tag(vault: &Vault, tags: &[&str]) -> Result<Entry> {
        vault.tag(&TagRequest {
            lookup: EntryLookup::by_name("Email"),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        })
    }

    #[test]
    fn tags_are_replaced_not_merged() {
        let (vault, store, _clock) = testing::vault();
        vault
            .add(&AddRequest {
                name: "Email",
                secret: "s",
                tags: vec!["old".into()],
                passphrase: PASS,
                ..Default::default()
            })
            .unwrap();

        tag(&vault, &["a"]).unwrap();
        let entry = tag(&vault, &[" B "]).unwrap();
        assert_eq!(entry.tags, vec!["b"]);
        assert_eq!(integrity::check(&entry), None);

        let doc = store.document().unwrap().unwrap();
        assert_eq!(doc.entries[0].tags, vec!["b"]);
        assert_eq!(doc.trash.len(), 2);
        assert!(doc.trash.iter().all(|r| r.action == TrashAction::Update));
        assert_eq!(doc.trash[0].entry.tags, vec!["old"]);
        assert_eq!(doc.trash[1].entry.tags, vec!["a"]);
    }

    #[test]
    fn tag_validates_input() {
        let (vault, _store, _clock) = testing::vault();
        assert!(matches!(
            tag(&vault, &["x"]),
            Err(LocalSafeError::EntryNotFound(_))
        ));
        assert!(matches!(
            tag(&vault, &[" ", ""]),
            Err(LocalSafeError::Validation(_))
        ));
        assert!(matches!(
            vault.tag(&TagRequest {
                lookup: EntryLookup::default(),
                tags: vec!["x".into()],
            }),
            Err(LocalSafeError::Validation(_))
        ));
    }
}
