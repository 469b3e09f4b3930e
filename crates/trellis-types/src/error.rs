use thiserror::Error;

/// Errors produced by type construction and parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid slug {slug:?}: {reason}")]
    InvalidSlug { slug: String, reason: String },

    #[error("invalid identifier: {0}")]
    InvalidId(String),
}
