//! Edit an entry's metadata, payload, or passphrase.
//!
//! Metadata (name, username, url, tags) changes without a passphrase.
//! Touching the secret or note needs the current passphrase so the
//! payload can be decrypted and sealed again; rotation needs both the
//! current and the new one.  The payload is only re-encrypted when its
//! content changes or a rotation is requested, so a metadata-only
//! update leaves the ciphertext byte-identical.

use super::Vault;
use crate::errors::{LocalSafeError, Result};
use crate::integrity;
use crate::vault::{normalize_tags, Entry, EntryLookup, SecretPayload};

/// Fields to change.  `None` leaves a field alone.
///
/// Blank `name`, `secret` and passphrases count as not given; blank
/// `username`, `url` and `note` clear the field.
#[derive(Debug, Clone, Default)]
pub struct UpdateRequest<'a> {
    pub lookup: EntryLookup,
    pub name: Option<&'a str>,
    pub username: Option<&'a str>,
    pub url: Option<&'a str>,
    pub tags: Option<Vec<String>>,
    pub secret: Option<&'a str>,
    pub note: Option<&'a str>,
    pub passphrase: Option<&'a str>,
    pub new_passphrase: Option<&'a str>,
}

/// Whether anything was written.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    Updated(Entry),
    /// The request changed nothing; the document was not written.
    Unchanged,
}

fn given(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

impl Vault {
    pub fn update(&self, request: &UpdateRequest<'_>) -> Result<UpdateOutcome> {
        let (mut document, revision) = self.load()?;
        request.lookup.require()?;

        let index = document
            .find_index(&request.lookup)
            .ok_or_else(|| LocalSafeError::EntryNotFound(request.lookup.to_string()))?;
        let current = &document.entries[index];
        let mut next = current.clone();
        let mut changed = false;

        // 1. Plaintext metadata.
        if let Some(name) = given(request.name.map(str::trim)) {
            changed |= replace(&mut next.name, name.to_string());
        }
        if let Some(username) = request.username {
            changed |= replace(&mut next.username, username.trim().to_string());
        }
        if let Some(url) = request.url {
            changed |= replace(&mut next.url, url.trim().to_string());
        }
        if let Some(tags) = &request.tags {
            changed |= replace(&mut next.tags, normalize_tags(tags));
        }

        // 2. Encrypted payload.
        let passphrase = given(request.passphrase);
        let new_passphrase = given(request.new_passphrase);
        let new_secret = given(request.secret);
        let wants_payload_change = new_secret.is_some() || request.note.is_some();

        if new_passphrase.is_some() && passphrase.is_none() {
            return Err(LocalSafeError::Validation(
                "Passphrase rotation requires --passphrase and --new-passphrase.".into(),
            ));
        }

        if wants_payload_change || new_passphrase.is_some() {
            let Some(passphrase) = passphrase else {
                return Err(LocalSafeError::Validation(
                    "Passphrase required to update secret or note.".into(),
                ));
            };

            let existing = self.open(passphrase, current)?;
            let payload = SecretPayload::new(
                new_secret.unwrap_or(existing.secret.as_str()),
                request.note.unwrap_or(existing.note.as_str()),
            );

            if payload != existing || new_passphrase.is_some() {
                let target = new_passphrase.unwrap_or(passphrase);
                next.secret = self.seal(target, &payload)?;
                changed = true;
            }
        }

        if !changed {
            tracing::debug!(id = %current.id, "update requested no effective change");
            return Ok(UpdateOutcome::Unchanged);
        }

        // 3. Archive the previous version and persist.
        let now = self.now();
        next.updated_at = now;
        let next = integrity::stamp(next);
        document.replace_entry(index, next.clone(), now);
        self.commit(&document, &revision)?;

        tracing::info!(
            id = %next.id,
            rotated = new_passphrase.is_some(),
            "entry updated"
        );
        Ok(UpdateOutcome::Updated(next))
    }
}

/// Assign `value` to `slot`, reporting whether it differed.
fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use crate::ops::testing::{self, PASS};
    use crate::ops::AddRequest;
    use crate::vault::{MemoryStore, TrashAction};

    use super::*;

    fn seeded() -> (Vault, MemoryStore, crate::retention::FixedClock, Entry) {
        let (vault, store, clock) = testing::vault();
        let entry = vault
            .add(&AddRequest {
                name: "Email",
                username: "alice",
                secret: "hunter2",
                note: "old note",
                passphrase: PASS,
                ..Default::default()
            })
            .unwrap();
        clock.advance(Duration::minutes(5));
        (vault, store, clock, entry)
    }

    fn by_id(entry: &Entry) -> EntryLookup {
        EntryLookup::by_id(&entry.id)
    }

    #[test]
    fn username_only_update_keeps_ciphertext() {
        let (vault, store, _clock, original) = seeded();
        let outcome = vault
            .update(&UpdateRequest {
                lookup: by_id(&original),
                username: Some("bob"),
                ..Default::default()
            })
            .unwrap();

        let UpdateOutcome::Updated(updated) = outcome else {
            panic!("expected an update");
        };
        assert_eq!(updated.username, "bob");
        assert_eq!(updated.secret, original.secret);
        assert!(updated.updated_at > original.updated_at);
        assert_eq!(integrity::check(&updated), None);

        let doc = store.document().unwrap().unwrap();
        assert_eq!(doc.trash.len(), 1);
        assert_eq!(doc.trash[0].action, TrashAction::Update);
        assert_eq!(doc.trash[0].entry, original);
    }

    #[test]
    fn identical_values_are_a_no_op() {
        let (vault, store, _clock, original) = seeded();
        let writes = store.write_count();
        let outcome = vault
            .update(&UpdateRequest {
                lookup: by_id(&original),
                name: Some("Email"),
                username: Some("alice"),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::Unchanged);

        let outcome = vault
            .update(&UpdateRequest {
                lookup: by_id(&original),
                secret: Some("hunter2"),
                passphrase: Some(PASS),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::Unchanged);
        assert_eq!(store.write_count(), writes);
    }

    #[test]
    fn secret_change_needs_passphrase() {
        let (vault, _store, _clock, original) = seeded();
        let err = vault
            .update(&UpdateRequest {
                lookup: by_id(&original),
                note: Some("new"),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, LocalSafeError::Validation(_)));

        let err = vault
            .update(&UpdateRequest {
                lookup: by_id(&original),
                secret: Some("x"),
                passphrase: Some("wrong"),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, LocalSafeError::DecryptionFailed));
    }

    #[test]
    fn secret_change_keeps_other_payload_fields() {
        let (vault, _store, _clock, original) = seeded();
        vault
            .update(&UpdateRequest {
                lookup: by_id(&original),
                secret: Some("correct horse"),
                passphrase: Some(PASS),
                ..Default::default()
            })
            .unwrap();
        let shown = vault.view(&by_id(&original), PASS).unwrap();
        assert_eq!(shown.payload.secret, "correct horse");
        assert_eq!(shown.payload.note, "old note");
    }

    #[test]
    fn rotation_composes_with_note_change() {
        let (vault, _store, _clock, original) = seeded();
        vault
            .update(&UpdateRequest {
                lookup: by_id(&original),
                note: Some("rotated"),
                passphrase: Some(PASS),
                new_passphrase: Some("pw2"),
                ..Default::default()
            })
            .unwrap();

        assert!(matches!(
            vault.view(&by_id(&original), PASS),
            Err(LocalSafeError::DecryptionFailed)
        ));
        let shown = vault.view(&by_id(&original), "pw2").unwrap();
        assert_eq!(shown.payload.secret, "hunter2");
        assert_eq!(shown.payload.note, "rotated");
    }

    #[test]
    fn rotation_needs_both_passphrases() {
        let (vault, store, _clock, original) = seeded();
        let writes = store.write_count();
        let err = vault
            .update(&UpdateRequest {
                lookup: by_id(&original),
                new_passphrase: Some("pw2"),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, LocalSafeError::Validation(_)));
        assert_eq!(store.write_count(), writes);
    }

    #[test]
    fn rotation_alone_re_encrypts() {
        let (vault, _store, _clock, original) = seeded();
        let UpdateOutcome::Updated(updated) = vault
            .update(&UpdateRequest {
                lookup: by_id(&original),
                passphrase: Some(PASS),
                new_passphrase: Some("pw2"),
                ..Default::default()
            })
            .unwrap()
        else {
            panic!("expected an update");
        };
        assert_ne!(updated.secret, original.secret);
        assert_eq!(vault.view(&by_id(&original), "pw2").unwrap().payload.secret, "hunter2");
    }

    #[test]
    fn unknown_entry_is_reported() {
        let (vault, _store, _clock, _original) = seeded();
        assert!(matches!(
            vault.update(&UpdateRequest {
                lookup: EntryLookup::by_name("Bank"),
                username: Some("x"),
                ..Default::default()
            }),
            Err(LocalSafeError::EntryNotFound(_))
        ));
    }
}
