//! Bring an archived snapshot back into the live entries.

use super::{confirm, Outcome, Vault};
use crate::errors::{LocalSafeError, Result};
use crate::vault::{Entry, EntryLookup};

impl Vault {
    /// Restore the most recent trash record matching `lookup` whose
    /// entry is not live.
    ///
    /// Requires the `restore` token.  The record leaves the trash and
    /// the entry is appended with a fresh `updatedAt`.  When every
    /// matching record shadows a live entry the restore is refused.
    pub fn restore(&self, lookup: &EntryLookup, token: Option<&str>) -> Result<Outcome<Entry>> {
        let (mut document, revision) = self.load()?;
        if document.trash.is_empty() {
            return Err(LocalSafeError::EntryNotFound("trash is empty".into()));
        }
        lookup.require()?;

        let matches: Vec<usize> = document
            .trash
            .iter()
            .enumerate()
            .filter(|(_, r)| lookup.matches(&r.entry))
            .map(|(i, _)| i)
            .collect();
        let Some(&newest) = matches.last() else {
            return Err(LocalSafeError::EntryNotFound(format!("{lookup} in trash")));
        };

        // Snapshots of entries that are still live cannot be restored.
        let index = matches
            .iter()
            .rev()
            .copied()
            .find(|&i| !document.contains_id(&document.trash[i].entry.id))
            .ok_or_else(|| {
                let id = &document.trash[newest].entry.id;
                LocalSafeError::Validation(format!(
                    "An entry with id {id} is already live; delete it before restoring."
                ))
            })?;

        if !confirm::is_confirmed(token, confirm::RESTORE) {
            return Ok(Outcome::Pending { count: 1 });
        }

        let now = self.now();
        let mut entry = document.trash.remove(index).entry;
        entry.updated_at = now;
        document.entries.push(entry.clone());
        document.updated_at = now;
        self.commit(&document, &revision)?;

        tracing::info!(id = %entry.id, name = %entry.name, "entry restored from trash");
        Ok(Outcome::Done(entry))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use crate::integrity;
    use crate::ops::testing::{self, PASS};
    use crate::ops::{AddRequest, DeleteRequest, TagRequest, UpdateRequest};
    use crate::retention::Clock;
    use crate::vault::Selector;

    use super::*;

    fn add_and_delete(vault: &Vault, soft: bool) -> Entry {
        let entry = vault
            .add(&AddRequest {
                name: "Email",
                secret: "hunter2",
                passphrase: PASS,
                ..Default::default()
            })
            .unwrap();
        vault
            .delete(&DeleteRequest {
                selector: Selector::from_parts(Some(&entry.id), None, None, None),
                soft,
                confirm: Some(confirm::DELETE.into()),
            })
            .unwrap();
        entry
    }

    #[test]
    fn restore_round_trip() {
        for soft in [true, false] {
            let (vault, store, clock) = testing::vault();
            let original = add_and_delete(&vault, soft);
            clock.advance(Duration::hours(1));

            let restored = vault
                .restore(&EntryLookup::by_id(&original.id), Some(confirm::RESTORE))
                .unwrap()
                .done()
                .unwrap();
            assert_eq!(restored.id, original.id);
            assert_eq!(restored.name, original.name);
            assert_eq!(restored.secret, original.secret);
            assert_eq!(restored.updated_at, clock.now());
            assert_eq!(integrity::check(&restored), None);

            let shown = vault.view(&EntryLookup::by_id(&original.id), PASS).unwrap();
            assert_eq!(shown.payload.secret, "hunter2");

            let doc = store.document().unwrap().unwrap();
            assert!(doc.trash.is_empty());
            assert_eq!(doc.entries.len(), 1);
        }
    }

    #[test]
    fn restore_without_token_is_pending() {
        let (vault, store, _clock) = testing::vault();
        let original = add_and_delete(&vault, true);
        let writes = store.write_count();

        let outcome = vault.restore(&EntryLookup::by_name("email"), None).unwrap();
        assert_eq!(outcome, Outcome::Pending { count: 1 });
        assert_eq!(store.write_count(), writes);
        assert!(!store.document().unwrap().unwrap().contains_id(&original.id));
    }

    #[test]
    fn restore_picks_latest_snapshot() {
        let (vault, _store, _clock) = testing::vault();
        let original = vault
            .add(&AddRequest {
                name: "Email",
                username: "v1",
                secret: "s",
                passphrase: PASS,
                ..Default::default()
            })
            .unwrap();
        vault
            .update(&UpdateRequest {
                lookup: EntryLookup::by_id(&original.id),
                username: Some("v2"),
                ..Default::default()
            })
            .unwrap();
        vault
            .delete(&DeleteRequest {
                selector: Selector::from_parts(Some(&original.id), None, None, None),
                soft: true,
                confirm: None,
            })
            .unwrap();

        let restored = vault
            .restore(&EntryLookup::by_id(&original.id), Some(confirm::RESTORE))
            .unwrap()
            .done()
            .unwrap();
        assert_eq!(restored.username, "v2");
    }

    #[test]
    fn restore_refuses_duplicate_live_id() {
        let (vault, _store, _clock) = testing::vault();
        let original = vault
            .add(&AddRequest {
                name: "Email",
                secret: "s",
                passphrase: PASS,
                ..Default::default()
            })
            .unwrap();
        vault
            .update(&UpdateRequest {
                lookup: EntryLookup::by_id(&original.id),
                username: Some("bob"),
                ..Default::default()
            })
            .unwrap();

        assert!(matches!(
            vault.restore(&EntryLookup::by_id(&original.id), Some(confirm::RESTORE)),
            Err(LocalSafeError::Validation(_))
        ));
    }

    #[test]
    fn restore_by_name_skips_snapshots_of_live_entries() {
        let (vault, _store, _clock) = testing::vault();
        let deleted = add_and_delete(&vault, true);
        let live = vault
            .add(&AddRequest {
                name: "Email",
                secret: "other",
                passphrase: PASS,
                ..Default::default()
            })
            .unwrap();
        vault
            .tag(&TagRequest {
                lookup: EntryLookup::by_id(&live.id),
                tags: vec!["work".into()],
            })
            .unwrap();

        let restored = vault
            .restore(&EntryLookup::by_name("Email"), Some(confirm::RESTORE))
            .unwrap()
            .done()
            .unwrap();
        assert_eq!(restored.id, deleted.id);

        assert!(matches!(
            vault.restore(&EntryLookup::by_name("Email"), Some(confirm::RESTORE)),
            Err(LocalSafeError::Validation(_))
        ));
    }

    #[test]
    fn restore_reports_missing_records() {
        let (vault, _store, _clock) = testing::vault();
        assert!(matches!(
            vault.restore(&EntryLookup::by_name("Email"), Some(confirm::RESTORE)),
            Err(LocalSafeError::EntryNotFound(_))
        ));

        add_and_delete(&vault, true);
        assert!(matches!(
            vault.restore(&EntryLookup::by_name("Bank"), Some(confirm::RESTORE)),
            Err(LocalSafeError::EntryNotFound(_))
        ));
        assert!(matches!(
            vault.restore(&EntryLookup::default(), Some(confirm::RESTORE)),
            Err(LocalSafeError::Validation(_))
        ));
    }
}
