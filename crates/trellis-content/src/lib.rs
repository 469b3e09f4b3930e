//! The Trellis post collection.
//!
//! Posts are persisted twice: an aggregate index file (the fast-read path)
//! and one shard file per post keyed by slug (the fast-point-read path and
//! the recovery source of truth). The two representations must describe the
//! same set of posts; [`PostStore::recover`], run once at startup, repairs a
//! missing half in either direction.
//!
//! Structural edits to the category tree cascade into this collection
//! through [`Cascade`], because posts reference their category by *name*,
//! not by id.

pub mod cascade;
pub mod error;
pub mod recovery;
pub mod store;

pub use cascade::Cascade;
pub use error::{ContentError, ContentResult};
pub use recovery::{RecoveryAction, RecoveryReport};
pub use store::PostStore;
