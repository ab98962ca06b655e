// ── Optimistic-lock version token ──
//
// A site's `last_modified` marker doubles as its optimistic-lock version.
// Tokens are opaque to callers: the only supported operations are exact
// equality and "mint a strictly newer one".

use std::fmt;

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Opaque, monotonically advancing marker on a Site record.
///
/// Clients echo the token they last saw via `If-Match` or `version`; the
/// version oracle compares by exact string equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionToken(String);

impl VersionToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A blank token means "no version recorded" and never matches a check.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Mint a token for the current instant (UTC, microsecond resolution).
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Mint a token strictly greater than `prev`.
    ///
    /// Normally the wall clock has advanced and `now()` suffices. When it
    /// has not (same-microsecond writes, or a stored token minted by a fast
    /// clock), the previous token itself is advanced by one microsecond so
    /// the result still compares fresh.
    pub fn next_after(prev: &Self) -> Self {
        let now = Self::now();
        if now.0 > prev.0 {
            return now;
        }
        match DateTime::parse_from_rfc3339(&prev.0) {
            Ok(t) => Self::from_datetime(t.with_timezone(&Utc) + TimeDelta::microseconds(1)),
            // Legacy or free-form token: extend it so it at least differs.
            Err(_) => Self(format!("{}.0", prev.0)),
        }
    }

    fn from_datetime(t: DateTime<Utc>) -> Self {
        Self(t.to_rfc3339_opts(SecondsFormat::Micros, true))
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for VersionToken {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for VersionToken {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}
