//! Strongly-typed migration identifier.

use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// The file name of a migration, e.g. `2024-01-01-add_users.xml`.
///
/// Used as the sole key for identity, ordering, and ledger lookups. The
/// date-prefixed naming convention makes lexicographic order chronological.
/// Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MigrationId(String);

const EMPTY: &str = "migration id must not be empty";

impl MigrationId {
    /// Wrap a file name. Panics on an empty string; use
    /// [`try_new`](Self::try_new) for names read from disk or the ledger.
    pub fn new(file_name: impl Into<String>) -> Self {
        let file_name = file_name.into();
        assert!(!file_name.is_empty(), "{EMPTY}");
        Self(file_name)
    }

    /// Wrap a file name, or `None` if it is empty
    pub fn try_new(file_name: impl Into<String>) -> Option<Self> {
        let file_name = file_name.into();
        (!file_name.is_empty()).then_some(Self(file_name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl<'de> Deserialize<'de> for MigrationId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Self::try_new(String::deserialize(deserializer)?)
            .ok_or_else(|| serde::de::Error::custom(EMPTY))
    }
}

impl fmt::Display for MigrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Lets BTreeSet<MigrationId> be probed with a plain &str
impl Borrow<str> for MigrationId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for MigrationId {
    type Error = &'static str;

    fn try_from(file_name: &str) -> Result<Self, Self::Error> {
        Self::try_new(file_name).ok_or(EMPTY)
    }
}

impl PartialEq<str> for MigrationId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for MigrationId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
