//! Entry selectors and tag normalization.
//!
//! - `EntryLookup` picks one entry: by exact `id`, else by
//!   case-insensitive `name` (first hit wins).
//! - `Selector` picks many: `id` wins outright when present, otherwise
//!   every supplied criterion among name/tag/domain must match.

use std::fmt;

use super::entry::Entry;
use crate::errors::{LocalSafeError, Result};

/// Single-entry lookup by id or name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryLookup {
    pub id: Option<String>,
    pub name: Option<String>,
}

impl EntryLookup {
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: None,
        }
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
        }
    }

    /// Build from optional CLI values, ignoring blanks.
    pub fn from_parts(id: Option<&str>, name: Option<&str>) -> Self {
        Self {
            id: non_blank(id),
            name: non_blank(name),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.name.is_none()
    }

    /// Fail with a validation error when neither id nor name was given.
    pub fn require(&self) -> Result<()> {
        if self.is_empty() {
            return Err(LocalSafeError::Validation(
                "Provide --id or --name to choose an entry.".into(),
            ));
        }
        Ok(())
    }

    pub fn matches(&self, entry: &Entry) -> bool {
        match (&self.id, &self.name) {
            (Some(id), _) => entry.id == *id,
            (None, Some(name)) => eq_ignore_case(&entry.name, name),
            (None, None) => false,
        }
    }
}

impl fmt::Display for EntryLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.id, &self.name) {
            (Some(id), _) => write!(f, "id '{id}'"),
            (None, Some(name)) => write!(f, "name '{name}'"),
            (None, None) => f.write_str("no selector"),
        }
    }
}

/// Bulk selector used by delete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    pub id: Option<String>,
    pub name: Option<String>,
    pub tag: Option<String>,
    pub domain: Option<String>,
}

impl Selector {
    pub fn from_parts(
        id: Option<&str>,
        name: Option<&str>,
        tag: Option<&str>,
        domain: Option<&str>,
    ) -> Self {
        Self {
            id: non_blank(id),
            name: non_blank(name),
            tag: non_blank(tag),
            domain: non_blank(domain),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.name.is_none() && self.tag.is_none() && self.domain.is_none()
    }

    pub fn matches(&self, entry: &Entry) -> bool {
        if let Some(id) = &self.id {
            return entry.id == *id;
        }
        if self.is_empty() {
            return false;
        }
        if let Some(name) = &self.name {
            if !eq_ignore_case(&entry.name, name) {
                return false;
            }
        }
        if let Some(tag) = &self.tag {
            if !has_tag(entry, tag) {
                return false;
            }
        }
        if let Some(domain) = &self.domain {
            if !matches_domain(&entry.url, domain) {
                return false;
            }
        }
        true
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(v) = &self.id {
            parts.push(format!("id={v}"));
        }
        if let Some(v) = &self.name {
            parts.push(format!("name={v}"));
        }
        if let Some(v) = &self.tag {
            parts.push(format!("tag={v}"));
        }
        if let Some(v) = &self.domain {
            parts.push(format!("domain={v}"));
        }
        f.write_str(&parts.join(" "))
    }
}

/// Case-insensitive tag membership.
pub fn has_tag(entry: &Entry, tag: &str) -> bool {
    entry.tags.iter().any(|t| eq_ignore_case(t, tag))
}

/// Case-insensitive hostname comparison; malformed urls never match.
pub fn matches_domain(url: &str, domain: &str) -> bool {
    domain_of(url).is_some_and(|host| eq_ignore_case(&host, domain.trim()))
}

/// Extract the lower-cased hostname from an absolute url.
///
/// Requires a `scheme://` prefix; userinfo and port are stripped.
/// Returns `None` for anything that does not parse.
pub fn domain_of(url: &str) -> Option<String> {
    let (scheme, rest) = url.trim().split_once("://")?;

    let mut chars = scheme.chars();
    let valid_scheme = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !valid_scheme {
        return None;
    }

    let authority = rest
        .split(|c| matches!(c, '/' | '?' | '#'))
        .next()
        .unwrap_or_default();
    let host_port = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host)| host);

    let host = match host_port.strip_prefix('[') {
        Some(bracketed) => bracketed.split_once(']')?.0,
        None => host_port.split(':').next().unwrap_or_default(),
    };

    if host.is_empty() || host.chars().any(|c| c.is_whitespace()) {
        return None;
    }
    Some(host.to_ascii_lowercase())
}

/// Split a comma-separated tag string into normalized tags.
pub fn parse_tags(raw: &str) -> Vec<String> {
    normalize_tags(raw.split(','))
}

/// Trim and lower-case tags, dropping blanks.  Duplicates are kept.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|t| t.as_ref().trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
