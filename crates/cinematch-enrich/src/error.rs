//! Enrichment error types.

use thiserror::Error;

/// Errors that can occur while fetching enrichment data.
///
/// These never escape an [`EnrichmentProvider`]; providers degrade to
/// per-field placeholders instead.
///
/// [`EnrichmentProvider`]: crate::enrich::EnrichmentProvider
#[derive(Debug, Error)]
pub enum EnrichError {
    /// An HTTP request to an external source failed.
    #[error("HTTP error from {source_name}: {message}")]
    Http {
        source_name: String,
        message: String,
    },

    /// The external source returned a rate-limit response.
    #[error("rate limited by {source_name}")]
    RateLimited { source_name: String },

    /// The requested title was not found at the external source.
    #[error("not found: {title} at {source_name}")]
    NotFound { title: String, source_name: String },

    /// A response from an external source could not be parsed.
    #[error("parse error from {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    /// The source rejected the configured credentials.
    #[error("{source_name} rejected the API key: {message}")]
    Unauthorized {
        source_name: String,
        message: String,
    },

    /// An error propagated from `reqwest`.
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
}

impl EnrichError {
    /// Returns `true` when the error is transient and the operation may
    /// succeed if retried.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http { .. } | Self::RateLimited { .. } => true,
            Self::Request(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Returns `true` when the error indicates the title was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Convenience alias for enrichment results.
pub type EnrichResult<T> = std::result::Result<T, EnrichError>;
