//! Enrichment, configuration and recommendation assembly for cinematch.
//!
//! The similarity core picks which titles to recommend; this crate decides
//! how they are presented, pulling poster, plot and cast data from OMDb
//! when an API key is configured and falling back to the catalog otherwise.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod enrich;
pub mod error;
pub mod recommend;

pub use config::Config;
pub use enrich::omdb::{OmdbClient, OmdbEnricher};
pub use enrich::resilience::{RateLimiter, RetryPolicy};
pub use enrich::{Enrichment, EnrichmentProvider, Field};
pub use error::{EnrichError, EnrichResult};
pub use recommend::{Recommendation, Recommender};
