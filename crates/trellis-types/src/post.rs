use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::PostId;
use crate::name::NameKey;
use crate::slug::Slug;

/// One content item.
///
/// The `category` field is a denormalized category *name*, not an id:
/// posts keep referencing a category through renames only because the
/// cascade rewrites them. Matching is case-insensitive via [`NameKey`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Stable opaque id.
    pub id: PostId,
    /// Unique, filename-safe identifier; doubles as the shard key.
    pub slug: Slug,
    /// Display title.
    pub title: String,
    /// Name of the owning category (denormalized reference).
    pub category: String,
    /// Body markup.
    #[serde(default)]
    pub body: String,
    /// Draft posts are stored but not published.
    #[serde(default)]
    pub draft: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last edit timestamp, if the post was ever edited.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Create a new post with a fresh id, stamped now.
    pub fn new(slug: Slug, title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: PostId::generate(),
            slug,
            title: title.into(),
            category: category.into(),
            body: String::new(),
            draft: false,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// The uniqueness key of the referenced category name.
    pub fn category_key(&self) -> Option<NameKey> {
        NameKey::of(&self.category)
    }

    /// Retag this post to a different category, stamping `updated_at`.
    pub fn retag(&mut self, category: impl Into<String>) {
        self.category = category.into();
        self.updated_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(slug: &str, category: &str) -> Post {
        Post::new(Slug::parse(slug).unwrap(), "Title", category)
    }

    #[test]
    fn new_post_is_unedited() {
        let p = post("first", "Go");
        assert!(p.updated_at.is_none());
        assert!(!p.draft);
    }

    #[test]
    fn category_key_matches_case_insensitively() {
        let p = post("first", "  GO ");
        assert_eq!(p.category_key(), NameKey::of("go"));
    }

    #[test]
    fn retag_stamps_updated_at() {
        let mut p = post("first", "Go");
        p.retag("Golang");
        assert_eq!(p.category, "Golang");
        assert!(p.updated_at.is_some());
    }

    #[test]
    fn serde_roundtrip() {
        let p = post("round-trip", "News");
        let json = serde_json::to_string(&p).unwrap();
        let back: Post = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
