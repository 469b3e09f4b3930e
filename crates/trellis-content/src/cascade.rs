use tracing::info;

use trellis_types::NameKey;

use crate::error::ContentResult;
use crate::store::PostStore;

/// Applies category structural changes onto the post collection.
///
/// Posts reference categories by name, so a rename or delete in the
/// taxonomy must rewrite every matching post. The glue layer invokes these
/// immediately after a successful category mutation; the cascade is a
/// second, separate persistence operation with no shared transaction — if
/// the process dies between the category write and the cascade, the two
/// collections disagree until the operation is repeated. That window is an
/// accepted property of the single-writer design.
pub struct Cascade<'a> {
    posts: &'a PostStore,
}

impl<'a> Cascade<'a> {
    /// Build a cascade over a post store.
    pub fn new(posts: &'a PostStore) -> Self {
        Self { posts }
    }

    /// Retag every post matching `old_name` (case-insensitive) to
    /// `new_name`. Returns the number of rewritten posts.
    pub fn on_category_renamed(&self, old_name: &str, new_name: &str) -> ContentResult<usize> {
        let changed = self.retag(old_name, new_name)?;
        info!(from = old_name, to = new_name, changed, "rename cascade");
        Ok(changed)
    }

    /// Retag every post matching `old_name` (case-insensitive) to the
    /// default category. Returns the number of rewritten posts.
    pub fn on_category_deleted(&self, old_name: &str, default_name: &str) -> ContentResult<usize> {
        let changed = self.retag(old_name, default_name)?;
        info!(from = old_name, to = default_name, changed, "delete cascade");
        Ok(changed)
    }

    /// The write happens only when at least one post matched; an untouched
    /// collection is never rewritten.
    fn retag(&self, from: &str, to: &str) -> ContentResult<usize> {
        let Some(key) = NameKey::of(from) else {
            return Ok(0);
        };

        let mut posts = self.posts.read_all()?;
        let mut changed = 0usize;
        for post in posts.iter_mut() {
            if post.category_key().as_ref() == Some(&key) {
                post.retag(to);
                changed += 1;
            }
        }
        if changed > 0 {
            self.posts.write_all(&posts)?;
        }
        Ok(changed)
    }
}
