//! Category mutations: create, update (rename/reparent), delete, reorder.
//!
//! Every operation reads the current canonical list, validates against it,
//! and persists a modified copy through [`CategoryStore::write`] — which
//! re-normalizes, so each operation is all-or-nothing with respect to the
//! category collection. Mutations are serialized through a collection lock:
//! two concurrent structural edits cannot both decide "next order" or
//! "is duplicate" from the same stale snapshot.
//!
//! The cascade into the post collection is *not* part of these operations.
//! Rename and delete return the names the caller needs to drive it; the
//! category write and the cascade write remain two separate persistence
//! steps (see `trellis-content`).

use std::sync::Mutex;

use tracing::info;

use trellis_types::{Category, CategoryId, NameKey};

use crate::error::{TaxonomyError, TaxonomyResult};
use crate::store::CategoryStore;

/// Partial patch for [`CategoryService::update`].
///
/// `parent` is doubly optional: `None` leaves the parent untouched,
/// `Some(None)` moves the category to the root, `Some(Some(id))` moves it
/// under `id`.
#[derive(Clone, Debug, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub parent: Option<Option<CategoryId>>,
}

/// Outcome of [`CategoryService::update`].
#[derive(Clone, Debug)]
pub struct CategoryUpdate {
    /// The category as persisted (post-normalization).
    pub category: Category,
    /// The display name before the update.
    pub previous_name: String,
}

impl CategoryUpdate {
    /// Returns `true` if the update changed the name key — the signal for
    /// the caller to cascade the rename into the post collection.
    pub fn renamed(&self) -> bool {
        NameKey::of(&self.previous_name) != NameKey::of(&self.category.name)
    }
}

/// Outcome of [`CategoryService::delete`].
#[derive(Clone, Debug)]
pub struct DeletedCategory {
    /// The display name of the deleted category.
    pub previous_name: String,
    /// The default category name posts should be retagged to.
    pub default_name: String,
}

/// Mutation service over the canonical category collection.
pub struct CategoryService {
    store: CategoryStore,
    write_lock: Mutex<()>,
}

impl CategoryService {
    /// Wrap a store.
    pub fn new(store: CategoryStore) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &CategoryStore {
        &self.store
    }

    /// Read-through: the current canonical list.
    pub fn list(&self) -> TaxonomyResult<Vec<Category>> {
        self.store.read()
    }

    /// Create a category under `parent` (`None` for a root category).
    ///
    /// The new category is placed after its siblings: `order` is one past
    /// the highest current sibling order, or `0` in an empty group.
    pub fn create(
        &self,
        name: &str,
        parent: Option<CategoryId>,
    ) -> TaxonomyResult<Category> {
        let _guard = self.write_lock.lock().expect("lock poisoned");
        let current = self.store.read()?;

        self.validate_name(name, &current, None)?;
        let parent = match parent {
            None => None,
            Some(id) => {
                self.resolve_parent(&id, &current)?;
                Some(id)
            }
        };

        let record = Category {
            id: CategoryId::generate(),
            name: name.trim().to_string(),
            order: Some(next_order(&current, parent.as_ref())),
            parent,
        };
        let id = record.id.clone();

        let mut next = current;
        next.push(record.clone());
        let persisted = self.store.write(next)?;

        info!(category = %id.short_id(), name = %record.name, "category created");
        Ok(persisted.into_iter().find(|c| c.id == id).unwrap_or(record))
    }

    /// Rename and/or reparent a category.
    pub fn update(&self, id: &CategoryId, patch: CategoryPatch) -> TaxonomyResult<CategoryUpdate> {
        let _guard = self.write_lock.lock().expect("lock poisoned");
        let current = self.store.read()?;

        let target_index = current
            .iter()
            .position(|c| c.id == *id)
            .ok_or_else(|| TaxonomyError::NotFound { id: id.clone() })?;
        let previous_name = current[target_index].name.clone();

        let mut next = current.clone();

        if let Some(raw_name) = &patch.name {
            self.validate_name(raw_name, &current, Some(target_index))?;
            next[target_index].name = raw_name.trim().to_string();
        }

        if let Some(new_parent) = &patch.parent {
            if let Some(parent_id) = new_parent {
                if parent_id == id {
                    return Err(TaxonomyError::SelfParent);
                }
                self.resolve_parent(parent_id, &current)?;
                self.check_cycle(id, parent_id, &current)?;
            }
            if next[target_index].parent != *new_parent {
                next[target_index].order = Some(next_order(&current, new_parent.as_ref()));
                next[target_index].parent = new_parent.clone();
            }
        }

        let persisted = self.store.write(next)?;
        let category = persisted
            .into_iter()
            .find(|c| c.id == *id)
            .ok_or_else(|| TaxonomyError::NotFound { id: id.clone() })?;

        info!(category = %id.short_id(), from = %previous_name, to = %category.name, "category updated");
        Ok(CategoryUpdate {
            category,
            previous_name,
        })
    }

    /// Delete a category. Its direct children are promoted to roots (parent
    /// and order cleared; normalization recomputes their order), never
    /// deleted. Returns the names the caller needs to retag posts.
    pub fn delete(&self, id: &CategoryId) -> TaxonomyResult<DeletedCategory> {
        let _guard = self.write_lock.lock().expect("lock poisoned");
        let current = self.store.read()?;

        let target = current
            .iter()
            .find(|c| c.id == *id)
            .ok_or_else(|| TaxonomyError::NotFound { id: id.clone() })?;
        if target.name_key().as_ref() == Some(self.store.settings().default_key()) {
            return Err(TaxonomyError::CannotDeleteDefault);
        }
        let previous_name = target.name.clone();

        let mut next = Vec::with_capacity(current.len() - 1);
        for mut cat in current {
            if cat.id == *id {
                continue;
            }
            if cat.parent.as_ref() == Some(id) {
                cat.parent = None;
                cat.order = None;
            }
            next.push(cat);
        }
        self.store.write(next)?;

        info!(category = %id.short_id(), name = %previous_name, "category deleted");
        Ok(DeletedCategory {
            previous_name,
            default_name: self.store.settings().default_name().to_string(),
        })
    }

    /// Reassign sibling order under `parent` to match `ordered` exactly.
    ///
    /// `ordered` must be a permutation of the current sibling set: missing,
    /// extra, or duplicate ids are all rejected as a mismatch.
    pub fn reorder(
        &self,
        parent: Option<&CategoryId>,
        ordered: &[CategoryId],
    ) -> TaxonomyResult<Vec<Category>> {
        let _guard = self.write_lock.lock().expect("lock poisoned");
        if ordered.is_empty() {
            return Err(TaxonomyError::EmptyReorder);
        }
        let current = self.store.read()?;

        if let Some(parent_id) = parent {
            if !current.iter().any(|c| c.id == *parent_id) {
                return Err(TaxonomyError::ParentNotFound {
                    id: parent_id.clone(),
                });
            }
        }

        let mut siblings: Vec<&CategoryId> = current
            .iter()
            .filter(|c| c.parent.as_ref() == parent)
            .map(|c| &c.id)
            .collect();
        let mut requested: Vec<&CategoryId> = ordered.iter().collect();
        siblings.sort();
        requested.sort();
        if siblings != requested {
            return Err(TaxonomyError::SiblingMismatch {
                reason: format!(
                    "expected exactly the {} current siblings, got {} ids",
                    siblings.len(),
                    ordered.len()
                ),
            });
        }

        let mut next = current;
        for cat in next.iter_mut() {
            if let Some(position) = ordered.iter().position(|oid| *oid == cat.id) {
                cat.order = Some(position as u32);
            }
        }
        let persisted = self.store.write(next)?;

        info!(siblings = ordered.len(), "siblings reordered");
        Ok(persisted)
    }

    // ---------------------------------------------------------------
    // Validation helpers
    // ---------------------------------------------------------------

    /// Empty / reserved / duplicate name checks shared by create and update.
    /// `exclude` omits one index from the duplicate scan (the update target).
    fn validate_name(
        &self,
        raw: &str,
        current: &[Category],
        exclude: Option<usize>,
    ) -> TaxonomyResult<NameKey> {
        let key = NameKey::of(raw).ok_or(TaxonomyError::EmptyName)?;
        if key == *self.store.settings().default_key() {
            return Err(TaxonomyError::ReservedName {
                name: raw.trim().to_string(),
            });
        }
        let duplicate = current
            .iter()
            .enumerate()
            .any(|(i, c)| Some(i) != exclude && c.name_key().as_ref() == Some(&key));
        if duplicate {
            return Err(TaxonomyError::Duplicate {
                name: raw.trim().to_string(),
            });
        }
        Ok(key)
    }

    /// A usable parent: exists and is not the default category.
    fn resolve_parent(&self, id: &CategoryId, current: &[Category]) -> TaxonomyResult<()> {
        let parent = current
            .iter()
            .find(|c| c.id == *id)
            .ok_or_else(|| TaxonomyError::ParentNotFound { id: id.clone() })?;
        if parent.name_key().as_ref() == Some(self.store.settings().default_key()) {
            return Err(TaxonomyError::ParentIsDefault);
        }
        Ok(())
    }

    /// Walk `parent`'s ancestor chain; reaching `target` means the move
    /// would close a cycle. Bounded by the node count so corrupted input
    /// cannot hang the walk.
    fn check_cycle(
        &self,
        target: &CategoryId,
        parent: &CategoryId,
        current: &[Category],
    ) -> TaxonomyResult<()> {
        let mut cursor = Some(parent.clone());
        let mut hops = 0usize;
        while let Some(ancestor) = cursor {
            if ancestor == *target {
                return Err(TaxonomyError::Cycle {
                    id: target.clone(),
                    parent: parent.clone(),
                });
            }
            hops += 1;
            if hops > current.len() {
                break;
            }
            cursor = current
                .iter()
                .find(|c| c.id == ancestor)
                .and_then(|c| c.parent.clone());
        }
        Ok(())
    }
}

/// Next free order slot in the sibling group under `parent`.
fn next_order(current: &[Category], parent: Option<&CategoryId>) -> u32 {
    current
        .iter()
        .filter(|c| c.parent.as_ref() == parent)
        .filter_map(|c| c.order)
        .max()
        .map(|max| max + 1)
        .unwrap_or(0)
}
