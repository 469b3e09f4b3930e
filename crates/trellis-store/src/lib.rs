//! File persistence primitives for Trellis.
//!
//! Every collection Trellis persists — the category tree, the post index,
//! the per-post shards — goes through this crate. Two layers:
//!
//! - [`atomic`] — byte-level atomic file replacement (write-temp-then-rename)
//! - [`document`] — typed JSON documents on top of the atomic writer
//!
//! # Design Rules
//!
//! 1. A reader of a path always observes a complete payload: the old file,
//!    the new file, never a partial write.
//! 2. Missing files are a normal state (`Ok(None)`), not an error.
//! 3. All I/O errors are propagated, never silently ignored. There is no
//!    retry; callers decide.

pub mod atomic;
pub mod document;
pub mod error;

pub use atomic::write_atomic;
pub use document::{read_json, write_json};
pub use error::{StoreError, StoreResult};
