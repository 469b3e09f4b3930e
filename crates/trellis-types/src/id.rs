use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Opaque identifier for a category.
///
/// Freshly generated ids are time-ordered UUID v7 strings, but any non-empty
/// string supplied by an existing data file is accepted as-is: the id is a
/// stable, opaque key, never interpreted.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    /// Generate a fresh time-ordered id (UUID v7).
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    /// Adopt an existing id from a data file. Fails on empty strings.
    pub fn parse(raw: &str) -> Result<Self, TypeError> {
        if raw.trim().is_empty() {
            return Err(TypeError::InvalidId("category id must not be empty".into()));
        }
        Ok(Self(raw.to_string()))
    }

    /// The raw id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short representation (first 8 characters) for logs.
    pub fn short_id(&self) -> &str {
        let end = self.0.len().min(8);
        &self.0[..end]
    }
}

impl fmt::Debug for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CategoryId({})", self.short_id())
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier for a post.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    /// Generate a fresh time-ordered id (UUID v7).
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    /// The raw id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let end = self.0.len().min(8);
        write!(f, "PostId({})", &self.0[..end])
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
