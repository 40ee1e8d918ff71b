//! Retention policy: cutoff resolution for purge and the unattended
//! startup pass.

pub mod clock;

pub use clock::{Clock, FixedClock, SystemClock};

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

use crate::errors::{LocalSafeError, Result};
use crate::ops::confirm;
use crate::ops::purge::PurgeRequest;
use crate::ops::{Outcome, Vault};

/// Which trash records a purge considers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PurgeCutoff {
    /// Every record, regardless of age.
    #[default]
    All,
    /// Records archived at or before an absolute date.
    Before(String),
    /// Records older than a relative duration such as `7d` or `12h`.
    OlderThan(String),
}

impl PurgeCutoff {
    /// Build from optional CLI values.  `before` wins when both are set.
    pub fn from_parts(before: Option<&str>, older_than: Option<&str>) -> Self {
        fn non_blank(v: Option<&str>) -> Option<&str> {
            v.map(str::trim).filter(|v| !v.is_empty())
        }
        match (non_blank(before), non_blank(older_than)) {
            (Some(date), _) => PurgeCutoff::Before(date.to_string()),
            (None, Some(age)) => PurgeCutoff::OlderThan(age.to_string()),
            (None, None) => PurgeCutoff::All,
        }
    }

    /// Resolve against `now`.  `None` means "no cutoff".
    pub fn resolve(&self, now: DateTime<Utc>) -> Result<Option<DateTime<Utc>>> {
        match self {
            PurgeCutoff::All => Ok(None),
            PurgeCutoff::Before(date) => parse_date(date).map(Some),
            PurgeCutoff::OlderThan(age) => {
                let age_delta = parse_duration(age)?;
                now.checked_sub_signed(age_delta)
                    .map(Some)
                    .ok_or_else(|| LocalSafeError::InvalidDurationFormat(age.clone()))
            }
        }
    }
}

/// Parse `<n>d` or `<n>h` (case-insensitive).
pub fn parse_duration(input: &str) -> Result<Duration> {
    let invalid = || LocalSafeError::InvalidDurationFormat(input.to_string());
    let trimmed = input.trim();

    let Some(unit) = trimmed.chars().last() else {
        return Err(invalid());
    };
    let digits = &trimmed[..trimmed.len() - unit.len_utf8()];
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let amount: i64 = digits.parse().map_err(|_| invalid())?;

    match unit.to_ascii_lowercase() {
        'd' => Duration::try_days(amount).ok_or_else(invalid),
        'h' => Duration::try_hours(amount).ok_or_else(invalid),
        _ => Err(invalid()),
    }
}

/// Parse an absolute cutoff date.
///
/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS[.fff]` (UTC) and `YYYY-MM-DD`
/// (UTC midnight).
pub fn parse_date(input: &str) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Some(midnight) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight.and_utc());
    }

    Err(LocalSafeError::InvalidDateFormat(input.to_string()))
}

/// Automatic trash retention run before a command executes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Maximum trash age (`<n>d` / `<n>h`); `None` disables the pass.
    pub trash_older_than: Option<String>,
}

impl RetentionPolicy {
    pub fn new(trash_older_than: Option<String>) -> Self {
        Self {
            trash_older_than: trash_older_than.filter(|v| !v.trim().is_empty()),
        }
    }

    /// Purge expired trash records.  Never fails: problems are logged
    /// and the caller carries on.  Returns the number of records purged.
    pub fn run_at_startup(&self, vault: &Vault) -> usize {
        let Some(age) = &self.trash_older_than else {
            return 0;
        };

        match vault.is_initialized() {
            Ok(true) => {}
            Ok(false) => return 0,
            Err(e) => {
                tracing::warn!(error = %e, "retention skipped: vault unreadable");
                return 0;
            }
        }

        let request = PurgeRequest {
            cutoff: PurgeCutoff::OlderThan(age.clone()),
            confirm: Some(confirm::PURGE.to_string()),
        };
        match vault.purge(&request) {
            Ok(Outcome::Done(removed)) => {
                if !removed.is_empty() {
                    tracing::info!(removed = removed.len(), older_than = %age, "startup retention purge");
                }
                removed.len()
            }
            Ok(Outcome::Pending { .. }) => 0,
            Err(e) => {
                tracing::warn!(error = %e, older_than = %age, "startup retention failed");
                0
            }
        }
    }
}
