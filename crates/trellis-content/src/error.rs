use trellis_store::StoreError;
use trellis_types::Slug;

/// Errors from post collection operations.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// A post with this slug already exists.
    #[error("a post with slug {0:?} already exists")]
    DuplicateSlug(Slug),

    /// No post with this slug.
    #[error("post not found: {0}")]
    NotFound(Slug),

    /// Failure in the underlying persistence layer.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result alias for post collection operations.
pub type ContentResult<T> = Result<T, ContentError>;
