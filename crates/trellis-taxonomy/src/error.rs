use trellis_store::StoreError;
use trellis_types::CategoryId;

/// Errors from taxonomy operations.
///
/// Every variant except `Store` is a *validation* error: an expected,
/// recoverable caller mistake with a specific, stable message. `Store`
/// wraps environment failures from the persistence layer; the glue layer
/// surfaces those as a generic failure and logs the cause.
#[derive(Debug, thiserror::Error)]
pub enum TaxonomyError {
    #[error("category name must not be empty")]
    EmptyName,

    #[error("{name:?} is reserved for the default category")]
    ReservedName { name: String },

    #[error("a category named {name:?} already exists")]
    Duplicate { name: String },

    #[error("parent category not found: {id}")]
    ParentNotFound { id: CategoryId },

    #[error("the default category cannot have children")]
    ParentIsDefault,

    #[error("a category cannot be its own parent")]
    SelfParent,

    #[error("moving {id} under {parent} would create a cycle")]
    Cycle { id: CategoryId, parent: CategoryId },

    #[error("category not found: {id}")]
    NotFound { id: CategoryId },

    #[error("the default category cannot be deleted")]
    CannotDeleteDefault,

    #[error("reorder ids do not match the current siblings: {reason}")]
    SiblingMismatch { reason: String },

    #[error("reorder requires at least one id")]
    EmptyReorder,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TaxonomyError {
    /// Returns `true` for expected caller mistakes (typed results the glue
    /// layer maps to protocol errors), `false` for storage failures.
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}

/// Result alias for taxonomy operations.
pub type TaxonomyResult<T> = Result<T, TaxonomyError>;
