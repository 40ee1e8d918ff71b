//! End-to-end lifecycle tests against a vault file on disk.

use chrono::{Duration, TimeZone, Utc};
use tempfile::TempDir;

use localsafe::crypto::{CryptoParams, KdfParams, Pbkdf2AesGcm};
use localsafe::errors::LocalSafeError;
use localsafe::integrity::MismatchReason;
use localsafe::ops::{
    AddRequest, DeleteRequest, ExportRequest, InitOutcome, ListFilter, Outcome, TagRequest,
    UpdateOutcome, UpdateRequest, Vault,
};
use localsafe::retention::FixedClock;
use localsafe::vault::{
    ConcurrencyMode, DocumentStore, EntryLookup, FileStore, Selector, TrashAction,
};

const PASS: &str = "pw";

fn suite() -> Pbkdf2AesGcm {
    Pbkdf2AesGcm::new(&CryptoParams {
        kdf: KdfParams {
            iterations: 1_000,
            ..KdfParams::default()
        },
        ..CryptoParams::default()
    })
    .unwrap()
}

struct Fixture {
    _dir: TempDir,
    store: FileStore,
    clock: FixedClock,
    vault: Vault,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path().join("vault.json"));
    let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap());
    let vault = Vault::new(store.clone(), suite()).with_clock(clock.clone());
    assert!(matches!(vault.init().unwrap(), InitOutcome::Created(_)));
    Fixture {
        _dir: dir,
        store,
        clock,
        vault,
    }
}

fn add(vault: &Vault, name: &str, secret: &str, tags: &[&str]) -> String {
    vault
        .add(&AddRequest {
            name,
            username: "alice",
            url: "https://mail.example.com/login",
            secret,
            note: "n",
            tags: tags.iter().map(|t| t.to_string()).collect(),
            passphrase: PASS,
        })
        .unwrap()
        .id
}

#[test]
fn add_then_view_with_right_and_wrong_passphrase() {
    let f = fixture();
    let id = add(&f.vault, "Email", "hunter2", &["Work"]);

    let revealed = f.vault.view(&EntryLookup::by_id(&id), PASS).unwrap();
    assert_eq!(revealed.payload.secret, "hunter2");
    assert_eq!(revealed.payload.note, "n");
    assert_eq!(revealed.tags, vec!["work"]);

    let by_name = f.vault.view(&EntryLookup::by_name("email"), PASS).unwrap();
    assert_eq!(by_name.id, id);

    assert!(matches!(
        f.vault.view(&EntryLookup::by_id(&id), "wrong"),
        Err(LocalSafeError::DecryptionFailed)
    ));
}

#[test]
fn secret_never_appears_in_the_file() {
    let f = fixture();
    add(&f.vault, "Email", "correct-horse-battery", &[]);
    let text = std::fs::read_to_string(f.store.location()).unwrap();
    assert!(!text.contains("correct-horse-battery"));
    assert!(text.contains("\"Email\""));
}

#[test]
fn init_twice_reports_existing_vault() {
    let f = fixture();
    add(&f.vault, "Email", "x", &[]);
    assert!(matches!(
        f.vault.init().unwrap(),
        InitOutcome::AlreadyExists(_)
    ));
    assert_eq!(f.vault.list(&ListFilter::default()).unwrap().len(), 1);
}

#[test]
fn operations_on_missing_vault_fail() {
    let dir = TempDir::new().unwrap();
    let vault = Vault::new(FileStore::new(dir.path().join("none.json")), suite());
    assert!(matches!(
        vault.list(&ListFilter::default()),
        Err(LocalSafeError::VaultNotInitialized(_))
    ));
    assert!(!dir.path().join("none.json").exists());
}

#[test]
fn username_only_update_keeps_ciphertext() {
    let f = fixture();
    let id = add(&f.vault, "Email", "hunter2", &[]);
    let before = f.store.read().unwrap().document.unwrap().entries[0].clone();

    f.clock.advance(Duration::minutes(5));
    let outcome = f
        .vault
        .update(&UpdateRequest {
            lookup: EntryLookup::by_id(&id),
            username: Some("bob"),
            ..UpdateRequest::default()
        })
        .unwrap();
    let UpdateOutcome::Updated(after) = outcome else {
        panic!("expected an update");
    };

    assert_eq!(after.username, "bob");
    assert_eq!(after.secret, before.secret);
    assert!(after.updated_at > before.updated_at);

    let doc = f.store.read().unwrap().document.unwrap();
    assert_eq!(doc.trash.len(), 1);
    assert_eq!(doc.trash[0].action, TrashAction::Update);
    assert_eq!(doc.trash[0].entry.username, "alice");
    assert!(f.vault.verify(false).unwrap().ok);
}

#[test]
fn passphrase_rotation() {
    let f = fixture();
    let id = add(&f.vault, "Email", "hunter2", &[]);
    f.vault
        .update(&UpdateRequest {
            lookup: EntryLookup::by_id(&id),
            passphrase: Some(PASS),
            new_passphrase: Some("pw2"),
            ..UpdateRequest::default()
        })
        .unwrap();

    let lookup = EntryLookup::by_id(&id);
    assert!(f.vault.view(&lookup, PASS).is_err());
    assert_eq!(f.vault.view(&lookup, "pw2").unwrap().payload.secret, "hunter2");
}

#[test]
fn tag_replaces_instead_of_merging() {
    let f = fixture();
    let id = add(&f.vault, "Email", "x", &["work", "mail"]);
    let entry = f
        .vault
        .tag(&TagRequest {
            lookup: EntryLookup::by_id(&id),
            tags: vec![" Personal ".into()],
        })
        .unwrap();
    assert_eq!(entry.tags, vec!["personal"]);

    let listed = f
        .vault
        .list(&ListFilter {
            tag: Some("work".into()),
            ..ListFilter::default()
        })
        .unwrap();
    assert!(listed.is_empty());
}

#[test]
fn list_filters_by_tag_and_domain() {
    let f = fixture();
    add(&f.vault, "Email", "x", &["work"]);
    add(&f.vault, "Bank", "y", &["money"]);

    let work = f
        .vault
        .list(&ListFilter {
            tag: Some("WORK".into()),
            domain: Some("mail.example.com".into()),
        })
        .unwrap();
    assert_eq!(work.len(), 1);
    assert_eq!(work[0].name, "Email");
    assert_eq!(work[0].domain, "mail.example.com");
    assert_eq!(work[0].index, 1);
}

#[test]
fn hard_delete_needs_confirmation() {
    let f = fixture();
    add(&f.vault, "Email", "x", &["work"]);
    add(&f.vault, "Chat", "y", &["work"]);

    let mut request = DeleteRequest {
        selector: Selector::from_parts(None, None, Some("work"), None),
        ..DeleteRequest::default()
    };
    assert_eq!(
        f.vault.delete(&request).unwrap(),
        Outcome::Pending { count: 2 }
    );
    assert_eq!(f.vault.list(&ListFilter::default()).unwrap().len(), 2);

    request.confirm = Some("DELETE".into());
    assert!(f.vault.delete(&request).unwrap().is_pending());

    request.confirm = Some("delete".into());
    let deleted = f.vault.delete(&request).unwrap().done().unwrap();
    assert_eq!(deleted.entries.len(), 2);
    assert!(f.vault.list(&ListFilter::default()).unwrap().is_empty());

    let doc = f.store.read().unwrap().document.unwrap();
    assert!(doc.trash.iter().all(|r| r.action == TrashAction::Delete));
}

#[test]
fn soft_delete_needs_no_token() {
    let f = fixture();
    add(&f.vault, "Email", "x", &[]);
    let outcome = f
        .vault
        .delete(&DeleteRequest {
            selector: Selector::from_parts(None, Some("email"), None, None),
            soft: true,
            confirm: None,
        })
        .unwrap();
    assert!(outcome.done().unwrap().soft);
    let doc = f.store.read().unwrap().document.unwrap();
    assert_eq!(doc.trash[0].action, TrashAction::SoftDelete);
}

#[test]
fn verify_detects_and_fixes_tampering() {
    let f = fixture();
    add(&f.vault, "Email", "x", &[]);
    add(&f.vault, "Bank", "y", &[]);

    let path = f.store.location().to_path_buf();
    let text = std::fs::read_to_string(&path).unwrap();
    std::fs::write(&path, text.replace("\"Bank\"", "\"Evil\"")).unwrap();

    let report = f.vault.verify(false).unwrap();
    assert!(!report.ok);
    assert_eq!(report.checked, 2);
    assert_eq!(report.mismatches.len(), 1);
    assert_eq!(report.mismatches[0].reason, MismatchReason::Mismatch);

    let fixed = f.vault.verify(true).unwrap();
    assert_eq!(fixed.fixed, 1);
    let again = f.vault.verify(false).unwrap();
    assert!(again.ok);
    assert_eq!(again.fixed, 0);
}

#[test]
fn optimistic_concurrency_rejects_stale_writer() {
    let f = fixture();
    add(&f.vault, "Email", "x", &[]);

    // A document read before another process writes cannot be committed.
    let stale = f.store.read().unwrap();
    add(&f.vault, "Bank", "y", &[]);
    let err = f
        .store
        .write(stale.document.as_ref().unwrap(), &stale.revision)
        .unwrap_err();
    assert!(matches!(err, LocalSafeError::ConcurrentModification(_)));
    assert_eq!(f.vault.list(&ListFilter::default()).unwrap().len(), 2);

    let lenient = f.store.clone().with_mode(ConcurrencyMode::LastWriterWins);
    lenient
        .write(stale.document.as_ref().unwrap(), &stale.revision)
        .unwrap();
    assert_eq!(f.vault.list(&ListFilter::default()).unwrap().len(), 1);
}

#[test]
fn export_to_file_keeps_ciphertext_only() {
    let f = fixture();
    add(&f.vault, "Email", "hunter2", &[]);
    let dest = f.store.location().with_file_name("backup").join("vault.json");

    let outcome = f
        .vault
        .export(&ExportRequest {
            destination: localsafe::ops::ExportDestination::File(dest.clone()),
            ..ExportRequest::default()
        })
        .unwrap();
    assert!(matches!(outcome, Outcome::Done(_)));

    let text = std::fs::read_to_string(&dest).unwrap();
    assert!(text.ends_with('\n'));
    assert!(!text.contains("hunter2"));
    let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(doc["entries"].as_array().unwrap().len(), 1);
}

#[test]
fn export_to_stdout_needs_token_and_json() {
    let f = fixture();
    add(&f.vault, "Email", "x", &[]);
    assert_eq!(
        f.vault.export(&ExportRequest::default()).unwrap(),
        Outcome::Pending { count: 1 }
    );

    let err = f
        .vault
        .export(&ExportRequest {
            format: "csv".into(),
            ..ExportRequest::default()
        })
        .unwrap_err();
    assert!(matches!(err, LocalSafeError::UnsupportedFormat(_)));

    let done = f
        .vault
        .export(&ExportRequest {
            confirm: Some("export".into()),
            ..ExportRequest::default()
        })
        .unwrap();
    let Outcome::Done(localsafe::ops::Exported::Stdout(text)) = done else {
        panic!("expected stdout export");
    };
    assert!(text.contains("\"entries\""));
}
