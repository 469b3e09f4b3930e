use serde::{Deserialize, Serialize};

use crate::id::CategoryId;
use crate::name::NameKey;

/// One node of the category tree.
///
/// A raw `Category` read from disk may violate every tree invariant: empty
/// name, duplicate name key, dangling or cyclic parent, missing or gapped
/// order. The taxonomy normalizer is the only component that turns raw
/// records into the canonical, invariant-satisfying form; everything
/// downstream assumes canonical input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Stable opaque id.
    pub id: CategoryId,
    /// Display name, trimmed. Unique per [`NameKey`] after normalization.
    pub name: String,
    /// Parent category, `None` for roots. Never points at the default
    /// category after normalization.
    #[serde(default)]
    pub parent: Option<CategoryId>,
    /// Position within the sibling group. Contiguous `0..n-1` after
    /// normalization; `None` means "recompute on the next pass".
    #[serde(default)]
    pub order: Option<u32>,
}

impl Category {
    /// Create a root category with a fresh id and no order.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CategoryId::generate(),
            name: name.into(),
            parent: None,
            order: None,
        }
    }

    /// Create a child category with a fresh id.
    pub fn child_of(name: impl Into<String>, parent: CategoryId) -> Self {
        Self {
            id: CategoryId::generate(),
            name: name.into(),
            parent: Some(parent),
            order: None,
        }
    }

    /// The uniqueness key of this category's name, if the name is non-empty.
    pub fn name_key(&self) -> Option<NameKey> {
        NameKey::of(&self.name)
    }

    /// Returns `true` if this category sits at the root of the tree.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_category_is_root() {
        let cat = Category::new("Essays");
        assert!(cat.is_root());
        assert!(cat.order.is_none());
    }

    #[test]
    fn child_records_parent() {
        let parent = Category::new("Tech");
        let child = Category::child_of("Rust", parent.id.clone());
        assert_eq!(child.parent.as_ref(), Some(&parent.id));
    }

    #[test]
    fn name_key_is_derived() {
        let cat = Category::new("  Go ");
        assert_eq!(cat.name_key(), NameKey::of("go"));
        let empty = Category::new("   ");
        assert!(empty.name_key().is_none());
    }

    #[test]
    fn serde_defaults_for_missing_fields() {
        // Data files written before ordering existed carry only id + name.
        let cat: Category =
            serde_json::from_str(r#"{"id":"c1","name":"News"}"#).unwrap();
        assert!(cat.parent.is_none());
        assert!(cat.order.is_none());
    }
}
