//! Metadata-only listing.  Payloads are never decrypted here.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Vault;
use crate::errors::Result;
use crate::vault::selector::{has_tag, matches_domain};
use crate::vault::{domain_of, Entry};

/// Optional filters; both must match when both are set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub tag: Option<String>,
    pub domain: Option<String>,
}

impl ListFilter {
    pub fn matches(&self, entry: &Entry) -> bool {
        self.tag.as_deref().map_or(true, |tag| has_tag(entry, tag))
            && self
                .domain
                .as_deref()
                .map_or(true, |domain| matches_domain(&entry.url, domain))
    }
}

/// One row of `localsafe list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrySummary {
    /// 1-based position within the filtered result.
    pub index: usize,
    pub id: String,
    pub name: String,
    pub username: String,
    pub url: String,
    pub domain: String,
    pub tags: Vec<String>,
    #[serde(with = "crate::vault::timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl EntrySummary {
    fn new(index: usize, entry: &Entry) -> Self {
        Self {
            index,
            id: entry.id.clone(),
            name: entry.name.clone(),
            username: entry.username.clone(),
            url: entry.url.clone(),
            domain: domain_of(&entry.url).unwrap_or_default(),
            tags: entry.tags.clone(),
            updated_at: entry.updated_at,
        }
    }
}

impl Vault {
    pub fn list(&self, filter: &ListFilter) -> Result<Vec<EntrySummary>> {
        let (document, _) = self.load()?;
        Ok(document
            .entries
            .iter()
            .filter(|e| filter.matches(e))
            .enumerate()
            .map(|(i, e)| EntrySummary::new(i + 1, e))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::LocalSafeError;
    use crate::ops::testing::{self, PASS};
    use crate::ops::AddRequest;

    use super::*;

    fn seed(vault: &Vault) {
        for (name, url, tag) in [
            ("Email", "https://mail.example.com", "work"),
            ("Bank", "https://bank.example.org/login", "finance"),
            ("Wiki", "not a url", "work"),
        ] {
            vault
                .add(&AddRequest {
                    name,
                    url,
                    secret: "s",
                    tags: vec![tag.into()],
                    passphrase: PASS,
                    ..Default::default()
                })
                .unwrap();
        }
    }

    #[test]
    fn list_all_in_insertion_order() {
        let (vault, _store, _clock) = testing::vault();
        seed(&vault);
        let rows = vault.list(&ListFilter::default()).unwrap();
        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Email", "Bank", "Wiki"]);
        assert_eq!(rows[1].domain, "bank.example.org");
        assert_eq!(rows[2].domain, "");
        assert_eq!(rows[2].index, 3);
    }

    #[test]
    fn list_filters_by_tag_and_domain() {
        let (vault, _store, _clock) = testing::vault();
        seed(&vault);

        let work = vault
            .list(&ListFilter {
                tag: Some("WORK".into()),
                domain: None,
            })
            .unwrap();
        assert_eq!(work.len(), 2);
        assert_eq!(work[1].index, 2);

        let both = vault
            .list(&ListFilter {
                tag: Some("work".into()),
                domain: Some("MAIL.example.com".into()),
            })
            .unwrap();
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].name, "Email");
    }

    #[test]
    fn list_requires_initialized_vault() {
        let (vault, _store) = testing::uninitialized();
        assert!(matches!(
            vault.list(&ListFilter::default()),
            Err(LocalSafeError::VaultNotInitialized(_))
        ));
    }
}
