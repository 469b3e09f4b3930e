//! Slug validation.
//!
//! Valid slugs:
//! - Must be non-empty and at most 128 characters
//! - May contain only ASCII lowercase letters, digits, `-`, and `_`
//! - Must not start or end with `-`
//!
//! Slugs double as shard filenames (`{slug}.json`), so the character set is
//! deliberately strict: no path separators, no dots, nothing the filesystem
//! could interpret.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Maximum slug length in characters.
const MAX_SLUG_LEN: usize = 128;

/// A validated, filename-safe post identifier.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Validate and construct a slug.
    ///
    /// # Examples
    ///
    /// ```
    /// use trellis_types::Slug;
    ///
    /// assert!(Slug::parse("hello-world").is_ok());
    /// assert!(Slug::parse("2024_retrospective").is_ok());
    /// assert!(Slug::parse("").is_err());
    /// assert!(Slug::parse("no/slashes").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, TypeError> {
        if raw.is_empty() {
            return Err(TypeError::InvalidSlug {
                slug: raw.to_string(),
                reason: "slug must not be empty".into(),
            });
        }

        if raw.len() > MAX_SLUG_LEN {
            return Err(TypeError::InvalidSlug {
                slug: raw.to_string(),
                reason: format!("slug must be at most {MAX_SLUG_LEN} characters"),
            });
        }

        for ch in raw.chars() {
            let ok = ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' || ch == '_';
            if !ok {
                return Err(TypeError::InvalidSlug {
                    slug: raw.to_string(),
                    reason: format!("contains forbidden character: {ch:?}"),
                });
            }
        }

        if raw.starts_with('-') || raw.ends_with('-') {
            return Err(TypeError::InvalidSlug {
                slug: raw.to_string(),
                reason: "must not start or end with '-'".into(),
            });
        }

        Ok(Self(raw.to_string()))
    }

    /// The raw slug string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The shard filename for this slug.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.0)
    }
}

impl fmt::Debug for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slug({})", self.0)
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
