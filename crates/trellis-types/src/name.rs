use std::fmt;

use serde::{Deserialize, Serialize};

/// Case-insensitive, trimmed uniqueness key for a category name.
///
/// Two category names collide when their keys are equal: `" Go "`, `"go"`,
/// and `"GO"` all map to the key `go`. The key is derived, never persisted;
/// the display name keeps its original casing (trimmed).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameKey(String);

impl NameKey {
    /// Derive the key for a raw name. Returns `None` when the trimmed name
    /// is empty (an empty name has no key and cannot name a category).
    pub fn of(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_lowercase()))
    }

    /// The canonical key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if `raw` derives to this key.
    pub fn matches(&self, raw: &str) -> bool {
        NameKey::of(raw).as_ref() == Some(self)
    }
}

impl fmt::Debug for NameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NameKey({})", self.0)
    }
}

impl fmt::Display for NameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
