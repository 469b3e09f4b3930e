//! Wiring between the taxonomy and content collections.
//!
//! [`Platform`] is the composition the HTTP layer of a full deployment
//! would hold: the category service, the post store, and the glue that
//! invokes the cascade after a successful rename or delete. The category
//! write and the cascade write are two separate persistence operations by
//! design; the platform runs them back-to-back and reports how many posts
//! the cascade rewrote.

use trellis_content::{Cascade, ContentError, PostStore, RecoveryReport};
use trellis_taxonomy::{
    CategoryPatch, CategoryService, CategoryStore, CategoryUpdate, DeletedCategory,
    TaxonomyError, TaxonomySettings,
};
use trellis_types::{Category, CategoryId};

use crate::config::PlatformConfig;

/// Errors from composed platform operations.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error(transparent)]
    Taxonomy(#[from] TaxonomyError),

    #[error(transparent)]
    Content(#[from] ContentError),
}

impl PlatformError {
    /// Expected caller mistakes get their specific message; storage
    /// failures get a generic one with the cause logged (see `commands`).
    pub fn is_validation(&self) -> bool {
        match self {
            Self::Taxonomy(e) => e.is_validation(),
            Self::Content(e) => !matches!(e, ContentError::Store(_)),
        }
    }
}

pub type PlatformResult<T> = Result<T, PlatformError>;

/// The composed store: categories plus posts.
pub struct Platform {
    categories: CategoryService,
    posts: PostStore,
}

impl Platform {
    /// Open the collections described by `config`. No I/O happens yet.
    pub fn open(config: &PlatformConfig) -> Self {
        let settings = TaxonomySettings::new(&config.default_category);
        let store = CategoryStore::new(config.categories_path(), settings);
        Self {
            categories: CategoryService::new(store),
            posts: PostStore::new(config.posts_index_path(), config.shards_path()),
        }
    }

    /// Startup recovery for the post collection. Run once per process.
    pub fn recover(&self) -> PlatformResult<RecoveryReport> {
        Ok(self.posts.recover()?)
    }

    /// The category mutation service.
    pub fn categories(&self) -> &CategoryService {
        &self.categories
    }

    /// The post store.
    pub fn posts(&self) -> &PostStore {
        &self.posts
    }

    /// Current canonical category list.
    pub fn list_categories(&self) -> PlatformResult<Vec<Category>> {
        Ok(self.categories.list()?)
    }

    /// Rename a category and cascade the rename into posts.
    ///
    /// Returns the update plus the number of posts rewritten (zero when
    /// the name key did not change).
    pub fn rename_category(
        &self,
        id: &CategoryId,
        name: &str,
    ) -> PlatformResult<(CategoryUpdate, usize)> {
        let update = self.categories.update(
            id,
            CategoryPatch {
                name: Some(name.to_string()),
                parent: None,
            },
        )?;
        let rewritten = if update.renamed() {
            Cascade::new(&self.posts)
                .on_category_renamed(&update.previous_name, &update.category.name)?
        } else {
            0
        };
        Ok((update, rewritten))
    }

    /// Move a category under a new parent (`None` for the root).
    pub fn move_category(
        &self,
        id: &CategoryId,
        parent: Option<CategoryId>,
    ) -> PlatformResult<CategoryUpdate> {
        Ok(self.categories.update(
            id,
            CategoryPatch {
                name: None,
                parent: Some(parent),
            },
        )?)
    }

    /// Delete a category and retag its posts to the default category.
    pub fn delete_category(
        &self,
        id: &CategoryId,
    ) -> PlatformResult<(DeletedCategory, usize)> {
        let deleted = self.categories.delete(id)?;
        let rewritten = Cascade::new(&self.posts)
            .on_category_deleted(&deleted.previous_name, &deleted.default_name)?;
        Ok((deleted, rewritten))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_content::RecoveryAction;
    use trellis_types::{Post, Slug};

    fn platform(dir: &tempfile::TempDir) -> Platform {
        let config = PlatformConfig {
            data_dir: dir.path().join("data"),
            ..PlatformConfig::default()
        };
        Platform::open(&config)
    }

    fn post(slug: &str, category: &str) -> Post {
        Post::new(Slug::parse(slug).unwrap(), format!("Post {slug}"), category)
    }

    #[test]
    fn recover_initializes_fresh_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let p = platform(&dir);
        let report = p.recover().unwrap();
        assert_eq!(report.action, RecoveryAction::Initialized);
    }

    #[test]
    fn rename_cascades_into_posts() {
        let dir = tempfile::tempdir().unwrap();
        let p = platform(&dir);
        let go = p.categories().create("Go", None).unwrap();
        p.posts()
            .write_all(&[post("a", "go"), post("b", "GO"), post("c", "Rust")])
            .unwrap();

        let (update, rewritten) = p.rename_category(&go.id, "Golang").unwrap();
        assert!(update.renamed());
        assert_eq!(rewritten, 2);
        let posts = p.posts().read_all().unwrap();
        assert_eq!(
            posts.iter().filter(|x| x.category == "Golang").count(),
            2
        );
    }

    #[test]
    fn case_only_rename_skips_the_cascade() {
        let dir = tempfile::tempdir().unwrap();
        let p = platform(&dir);
        let go = p.categories().create("go", None).unwrap();
        p.posts().write_all(&[post("a", "go")]).unwrap();

        let (update, rewritten) = p.rename_category(&go.id, "Go").unwrap();
        assert!(!update.renamed());
        assert_eq!(rewritten, 0);
    }

    #[test]
    fn delete_retags_posts_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let p = platform(&dir);
        let go = p.categories().create("Go", None).unwrap();
        p.posts()
            .write_all(&[post("a", "Go"), post("b", "Go"), post("c", "Go")])
            .unwrap();

        let (deleted, rewritten) = p.delete_category(&go.id).unwrap();
        assert_eq!(deleted.previous_name, "Go");
        assert_eq!(rewritten, 3);
        assert!(p
            .posts()
            .read_all()
            .unwrap()
            .iter()
            .all(|x| x.category == "Uncategorized"));
    }

    #[test]
    fn validation_errors_are_flagged() {
        let dir = tempfile::tempdir().unwrap();
        let p = platform(&dir);
        p.categories().create("Go", None).unwrap();

        let err = PlatformError::from(
            p.categories().create("go", None).unwrap_err(),
        );
        assert!(err.is_validation());
    }

    #[test]
    fn full_lifecycle_survives_index_loss() {
        let dir = tempfile::tempdir().unwrap();
        let p = platform(&dir);
        p.categories().create("Go", None).unwrap();
        p.posts().insert(post("one", "Go")).unwrap();
        p.posts().insert(post("two", "Go")).unwrap();

        std::fs::remove_file(p.posts().index_path()).unwrap();
        let report = p.recover().unwrap();
        assert_eq!(report.action, RecoveryAction::Rebuilt);
        assert_eq!(report.posts, 2);
    }
}
