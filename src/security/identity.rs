use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Identifier a token claims to represent (the JWT `sub`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PrincipalId(String);

impl PrincipalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PrincipalId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PrincipalId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A resolved principal.
///
/// - `authorities` is a set: unordered for callers, unique per label
/// - `credentials_changed_at` lets the validator reject tokens issued before
///   the principal's last credential change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: PrincipalId,
    pub authorities: BTreeSet<String>,
    pub credentials_changed_at: Option<DateTime<Utc>>,
}

impl Identity {
    pub fn new(id: impl Into<PrincipalId>) -> Self {
        Self {
            id: id.into(),
            authorities: BTreeSet::new(),
            credentials_changed_at: None,
        }
    }

    pub fn with_authorities<I, A>(mut self, authorities: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.authorities
            .extend(authorities.into_iter().map(Into::into));
        self
    }

    pub fn with_credentials_changed_at(mut self, at: DateTime<Utc>) -> Self {
        self.credentials_changed_at = Some(at);
        self
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.contains(authority)
    }
}
