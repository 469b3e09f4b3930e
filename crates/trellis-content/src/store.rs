use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use trellis_store::{read_json, write_json, StoreError};
use trellis_types::{Post, Slug};

use crate::error::{ContentError, ContentResult};

/// The post collection: aggregate index plus one shard per post.
///
/// `write_all` persists the index first, then the shards, then prunes stray
/// shard files. A writer interrupted between the index and shard steps
/// leaves the shards one write behind the index — an accepted, narrow
/// inconsistency window for this single-writer store; a parseable index is
/// authoritative on startup and [`recover`](PostStore::recover) does not
/// attempt to repair it.
pub struct PostStore {
    index_path: PathBuf,
    shard_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl PostStore {
    /// Create a store over the given index file and shard directory.
    pub fn new(index_path: impl Into<PathBuf>, shard_dir: impl Into<PathBuf>) -> Self {
        Self {
            index_path: index_path.into(),
            shard_dir: shard_dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// The aggregate index path.
    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    /// The shard directory.
    pub fn shard_dir(&self) -> &Path {
        &self.shard_dir
    }

    /// The shard path for a slug.
    pub fn shard_path(&self, slug: &Slug) -> PathBuf {
        self.shard_dir.join(slug.file_name())
    }

    /// Read the whole collection from the index. Missing index yields `[]`.
    pub fn read_all(&self) -> ContentResult<Vec<Post>> {
        Ok(read_json(&self.index_path)?.unwrap_or_default())
    }

    /// Point-read one post from its shard. `Ok(None)` if absent.
    pub fn read(&self, slug: &Slug) -> ContentResult<Option<Post>> {
        Ok(read_json(&self.shard_path(slug))?)
    }

    /// Persist the full collection: index, then shards, then prune.
    ///
    /// Shard pruning is best-effort — a stray file that cannot be deleted is
    /// logged and skipped, never allowed to fail the write.
    pub fn write_all(&self, posts: &[Post]) -> ContentResult<()> {
        let _guard = self.write_lock.lock().expect("lock poisoned");

        fs::create_dir_all(&self.shard_dir).map_err(StoreError::from)?;
        write_json(&self.index_path, &posts)?;
        for post in posts {
            write_json(&self.shard_path(&post.slug), post)?;
        }
        self.prune_stray_shards(posts);

        debug!(posts = posts.len(), "post collection persisted");
        Ok(())
    }

    /// Append one post. Fails on a duplicate slug.
    pub fn insert(&self, post: Post) -> ContentResult<Post> {
        let mut posts = self.read_all()?;
        if posts.iter().any(|p| p.slug == post.slug) {
            return Err(ContentError::DuplicateSlug(post.slug));
        }
        posts.push(post.clone());
        self.write_all(&posts)?;
        Ok(post)
    }

    /// Remove one post by slug. Fails if no such post is indexed.
    pub fn remove(&self, slug: &Slug) -> ContentResult<Post> {
        let mut posts = self.read_all()?;
        let index = posts
            .iter()
            .position(|p| p.slug == *slug)
            .ok_or_else(|| ContentError::NotFound(slug.clone()))?;
        let removed = posts.remove(index);
        self.write_all(&posts)?;
        Ok(removed)
    }

    /// Delete shard files whose name matches no current slug.
    fn prune_stray_shards(&self, posts: &[Post]) {
        let keep: HashSet<String> = posts.iter().map(|p| p.slug.file_name()).collect();
        let entries = match fs::read_dir(&self.shard_dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %self.shard_dir.display(), error = %e, "cannot scan shard dir");
                return;
            }
        };
        for entry in entries {
            let Ok(entry) = entry else { continue };
            let name = entry.file_name().to_string_lossy().into_owned();
            if keep.contains(&name) {
                continue;
            }
            match fs::remove_file(entry.path()) {
                Ok(()) => debug!(shard = %name, "stray shard removed"),
                Err(e) => warn!(shard = %name, error = %e, "failed to remove stray shard"),
            }
        }
    }
}
