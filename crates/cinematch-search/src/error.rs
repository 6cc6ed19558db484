//! Similarity engine error types.

use thiserror::Error;

/// Errors that can occur while building a similarity index.
#[derive(Debug, Error)]
pub enum SearchError {
    /// There is nothing to vectorize.
    #[error("cannot build a similarity index from an empty corpus")]
    EmptyCorpus,
}

/// Convenience alias for similarity engine results.
pub type SearchResult<T> = std::result::Result<T, SearchError>;
