//! Startup recovery for the dual-representation post store.
//!
//! The index and the shard directory must describe the same post set. When
//! one half is missing, recovery repairs it from the other in a single,
//! explicit transition — run once at startup, never as inline fallback on
//! the read path:
//!
//! - index present and non-empty, shard dir empty → **split** the index
//!   into shards (first-run migration from index-only data);
//! - index missing or unparseable, shard dir non-empty → **rebuild** the
//!   index from the shards (shards are the recovery source of truth);
//! - neither present → **initialize** an empty index;
//! - anything else → already **indexed**, no work.
//!
//! Corrupt shard files are skipped with a warning during a rebuild; one torn
//! write must not sink the rest of the collection.

use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::{info, warn};

use trellis_store::{read_json, write_json, StoreError};
use trellis_types::Post;

use crate::error::ContentResult;
use crate::store::PostStore;

/// Which transition `recover` performed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Index and shards were already consistent; nothing done.
    Indexed,
    /// Index was split into per-post shards.
    Split,
    /// Index was rebuilt from the shard files.
    Rebuilt,
    /// No data anywhere; an empty index was written.
    Initialized,
}

/// Outcome of a recovery pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecoveryReport {
    /// The transition taken.
    pub action: RecoveryAction,
    /// Posts in the collection after recovery.
    pub posts: usize,
}

impl PostStore {
    /// Reconcile the index and the shard directory. Run once at startup.
    pub fn recover(&self) -> ContentResult<RecoveryReport> {
        let shards = self.list_shards()?;
        let index = match read_json::<Vec<Post>>(self.index_path()) {
            Ok(parsed) => parsed,
            Err(StoreError::Serialization(reason)) => {
                warn!(%reason, "post index unparseable, treating as absent");
                None
            }
            Err(other) => return Err(other.into()),
        };

        match index {
            Some(posts) if !posts.is_empty() && shards.is_empty() => {
                for post in &posts {
                    write_json(&self.shard_path(&post.slug), post)?;
                }
                info!(posts = posts.len(), "post index split into shards");
                Ok(RecoveryReport {
                    action: RecoveryAction::Split,
                    posts: posts.len(),
                })
            }
            Some(posts) => Ok(RecoveryReport {
                action: RecoveryAction::Indexed,
                posts: posts.len(),
            }),
            None if !shards.is_empty() => {
                let mut posts = Vec::with_capacity(shards.len());
                for path in &shards {
                    match read_json::<Post>(path) {
                        Ok(Some(post)) => posts.push(post),
                        Ok(None) => {}
                        Err(StoreError::Serialization(reason)) => {
                            warn!(shard = %path.display(), %reason, "skipping corrupt shard");
                        }
                        Err(other) => return Err(other.into()),
                    }
                }
                posts.sort_by(|a, b| a.slug.cmp(&b.slug));
                write_json(self.index_path(), &posts)?;
                info!(posts = posts.len(), "post index rebuilt from shards");
                Ok(RecoveryReport {
                    action: RecoveryAction::Rebuilt,
                    posts: posts.len(),
                })
            }
            None => {
                write_json(self.index_path(), &Vec::<Post>::new())?;
                info!("post index initialized empty");
                Ok(RecoveryReport {
                    action: RecoveryAction::Initialized,
                    posts: 0,
                })
            }
        }
    }

    /// Shard files (`*.json`) in the shard directory, sorted. A missing
    /// directory is an empty collection, not an error.
    fn list_shards(&self) -> ContentResult<Vec<PathBuf>> {
        let mut paths = Vec::new();
        match fs::read_dir(self.shard_dir()) {
            Ok(entries) => {
                for entry in entries {
                    let entry = entry.map_err(StoreError::from)?;
                    let path = entry.path();
                    if path.extension().map(|e| e == "json").unwrap_or(false) {
                        paths.push(path);
                    }
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(StoreError::from(e).into()),
        }
        paths.sort();
        Ok(paths)
    }
}
