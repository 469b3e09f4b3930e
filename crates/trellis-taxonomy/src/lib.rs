//! The Trellis category engine.
//!
//! Categories form a tree with three hard invariants: names are unique
//! (case-insensitive, trimmed), parent links never cycle, and every sibling
//! group carries contiguous `0..n-1` ordering. A reserved *default category*
//! always exists and always sits at the root; it is the fallback target when
//! a category is deleted.
//!
//! The engine is layered:
//!
//! - [`normalize`] — pure canonicalization of an arbitrary category list
//! - [`CategoryStore`] — the canonical collection on disk (read/parse/
//!   normalize, normalize/persist/return)
//! - [`CategoryService`] — create / update / delete / reorder with the full
//!   validation taxonomy, mutations serialized through a collection lock
//!
//! Every mutation re-derives state by normalizing a modified copy of the
//! current canonical list. Nothing is ever hand-patched in place, which is
//! what makes normalization idempotent and the store self-healing: any
//! invalid file on disk becomes canonical on the next read.

pub mod error;
pub mod normalize;
pub mod service;
pub mod settings;
pub mod store;

pub use error::{TaxonomyError, TaxonomyResult};
pub use normalize::normalize;
pub use service::{CategoryPatch, CategoryService, CategoryUpdate, DeletedCategory};
pub use settings::TaxonomySettings;
pub use store::CategoryStore;
