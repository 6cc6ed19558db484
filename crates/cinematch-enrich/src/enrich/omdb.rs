//! OMDb enrichment source.
//!
//! Looks a title up on the Open Movie Database and turns the response into
//! an [`Enrichment`]. OMDb marks missing values with `"N/A"` and reports
//! lookup failures in-band (`"Response": "False"`), so both are decoded
//! here rather than left to callers.

use std::time::Duration;

use async_trait::async_trait;
use backon::Retryable;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::enrich::resilience::{RateLimiter, RetryPolicy};
use crate::enrich::{Enrichment, EnrichmentProvider, Field};
use crate::error::{EnrichError, EnrichResult};

pub const OMDB_API_BASE: &str = "https://www.omdbapi.com/";

const SOURCE_NAME: &str = "OMDb";

/// The error OMDb reports once the daily quota is used up.
const REQUEST_LIMIT_MESSAGE: &str = "Request limit reached!";

// ---------------------------------------------------------------------------
// API response types
// ---------------------------------------------------------------------------

/// The subset of an OMDb title response used for enrichment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OmdbResponse {
    /// `"True"` or `"False"`.
    pub response: String,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub actors: Option<String>,
    #[serde(default)]
    pub plot: Option<String>,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default, rename = "BoxOffice")]
    pub box_office: Option<String>,
}

fn field(value: Option<String>) -> Field<String> {
    value.map_or(Field::Unavailable, |v| Field::from_text(v))
}

impl OmdbResponse {
    /// Decode the in-band status into either enrichment data or an error.
    ///
    /// # Errors
    /// Returns [`EnrichError::NotFound`] when OMDb has no such title,
    /// [`EnrichError::RateLimited`] when the quota is exhausted and
    /// [`EnrichError::Parse`] for any other reported failure.
    pub fn into_enrichment(self, title: &str) -> EnrichResult<Enrichment> {
        if !self.response.eq_ignore_ascii_case("true") {
            let message = self.error.unwrap_or_else(|| "unknown error".to_string());
            return Err(classify_error_message(title, message));
        }

        Ok(Enrichment {
            poster: field(self.poster),
            plot: field(self.plot),
            year: field(self.year),
            actors: field(self.actors),
            director: field(self.director),
            box_office: field(self.box_office),
        })
    }
}

fn classify_error_message(title: &str, message: String) -> EnrichError {
    let lower = message.to_lowercase();
    if lower.contains("not found") {
        EnrichError::NotFound {
            title: title.to_string(),
            source_name: SOURCE_NAME.to_string(),
        }
    } else if message == REQUEST_LIMIT_MESSAGE {
        EnrichError::RateLimited {
            source_name: SOURCE_NAME.to_string(),
        }
    } else if lower.contains("api key") {
        EnrichError::Unauthorized {
            source_name: SOURCE_NAME.to_string(),
            message,
        }
    } else {
        EnrichError::Parse {
            source_name: SOURCE_NAME.to_string(),
            message,
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// OMDb HTTP client.
#[derive(Debug, Clone)]
pub struct OmdbClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl OmdbClient {
    /// Create a new OMDb client.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> EnrichResult<Self> {
        let http = Client::builder()
            .user_agent("cinematch/0.1.0 (https://github.com/oxur/cinematch)")
            .timeout(timeout)
            .build()
            .map_err(EnrichError::from)?;

        Ok(Self {
            http,
            api_key,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch enrichment data for a title (exact title match on OMDb's side).
    ///
    /// # Errors
    /// Returns an error on HTTP failure, an unparseable body, or when OMDb
    /// reports that the lookup failed.
    pub async fn fetch(&self, title: &str) -> EnrichResult<Enrichment> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("t", title), ("apikey", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(EnrichError::RateLimited {
                source_name: SOURCE_NAME.to_string(),
            });
        }
        if status.is_server_error() {
            return Err(EnrichError::Http {
                source_name: SOURCE_NAME.to_string(),
                message: status.to_string(),
            });
        }

        // OMDb answers 401 with a JSON body explaining whether the key is
        // invalid or the quota is exhausted.
        let body: OmdbResponse = response.json().await.map_err(|e| EnrichError::Parse {
            source_name: SOURCE_NAME.to_string(),
            message: e.to_string(),
        })?;

        body.into_enrichment(title)
    }
}

// ---------------------------------------------------------------------------
// Enricher
// ---------------------------------------------------------------------------

/// Rate-limited, retrying OMDb enrichment provider.
///
/// Transient failures are retried with exponential backoff. Once retries
/// are exhausted, or for permanent failures, every field degrades to
/// unavailable and a warning is logged.
#[derive(Debug, Clone)]
pub struct OmdbEnricher {
    client: OmdbClient,
    rate_limiter: RateLimiter,
    retry: RetryPolicy,
}

impl OmdbEnricher {
    pub fn new(client: OmdbClient, rate_limiter: RateLimiter, retry: RetryPolicy) -> Self {
        Self {
            client,
            rate_limiter,
            retry,
        }
    }

    pub fn client(&self) -> &OmdbClient {
        &self.client
    }

    /// Fetch with rate limiting and retries, surfacing the final error.
    ///
    /// # Errors
    /// Returns the last error once retries are exhausted, or the first
    /// non-transient one.
    pub async fn try_enrich(&self, title: &str) -> EnrichResult<Enrichment> {
        let client = &self.client;
        let rate_limiter = &self.rate_limiter;

        (move || async move {
            rate_limiter.acquire().await;
            client.fetch(title).await
        })
        .retry(self.retry.backoff())
        .when(|e: &EnrichError| e.is_transient())
        .notify(|e: &EnrichError, delay: Duration| {
            log::debug!("Retrying OMDb lookup for {:?} in {:?}: {}", title, delay, e);
        })
        .await
    }
}

#[async_trait]
impl EnrichmentProvider for OmdbEnricher {
    fn name(&self) -> &str {
        "omdb"
    }

    async fn enrich(&self, title: &str) -> Enrichment {
        match self.try_enrich(title).await {
            Ok(enrichment) => {
                log::debug!("OMDb enrichment for {:?} succeeded", title);
                enrichment
            }
            Err(e) if e.is_not_found() => {
                log::info!("OMDb has no entry for {:?}", title);
                Enrichment::unavailable()
            }
            Err(e) => {
                log::warn!("OMDb enrichment failed for {:?}: {}", title, e);
                Enrichment::unavailable()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_enricher() -> OmdbEnricher {
        // Port 9 (discard) is closed on any sane test host: connections are
        // refused immediately.
        let client = OmdbClient::new(
            "test-key".to_string(),
            "http://127.0.0.1:9/".to_string(),
            Duration::from_secs(2),
        )
        .unwrap();
        OmdbEnricher::new(client, RateLimiter::new(100), RetryPolicy::new(0))
    }

    #[test]
    fn test_deserialize_full_response() {
        let json = r#"{
            "Title": "Heat",
            "Year": "1995",
            "Rated": "R",
            "Director": "Michael Mann",
            "Actors": "Al Pacino, Robert De Niro, Val Kilmer",
            "Plot": "A group of high-end professional thieves start to feel the heat.",
            "Poster": "https://m.media-amazon.com/images/heat.jpg",
            "BoxOffice": "$67,436,818",
            "Response": "True"
        }"#;

        let response: OmdbResponse = serde_json::from_str(json).unwrap();
        let enrichment = response.into_enrichment("Heat").unwrap();

        assert_eq!(enrichment.year_or_placeholder(), "1995");
        assert_eq!(enrichment.director_or_placeholder(), "Michael Mann");
        assert_eq!(
            enrichment.actors_or_placeholder(),
            "Al Pacino, Robert De Niro, Val Kilmer"
        );
        assert_eq!(enrichment.box_office_or_placeholder(), "$67,436,818");
        assert_eq!(
            enrichment.poster_or_placeholder(),
            "https://m.media-amazon.com/images/heat.jpg"
        );
    }

    #[test]
    fn test_na_values_become_unavailable() {
        let json = r#"{
            "Title": "Drishyam",
            "Year": "2013",
            "Poster": "N/A",
            "BoxOffice": "N/A",
            "Plot": "N/A",
            "Response": "True"
        }"#;

        let response: OmdbResponse = serde_json::from_str(json).unwrap();
        let enrichment = response.into_enrichment("Drishyam").unwrap();

        assert_eq!(enrichment.year, Field::Available("2013".to_string()));
        assert_eq!(enrichment.poster, Field::Unavailable);
        assert_eq!(enrichment.box_office, Field::Unavailable);
        assert_eq!(enrichment.plot_or_placeholder(), "Description not available");
        // absent keys are unavailable too
        assert_eq!(enrichment.director, Field::Unavailable);
    }

    #[test]
    fn test_movie_not_found() {
        let json = r#"{"Response": "False", "Error": "Movie not found!"}"#;
        let response: OmdbResponse = serde_json::from_str(json).unwrap();
        let err = response.into_enrichment("Nope").unwrap_err();
        assert!(err.is_not_found());
        assert!(!err.is_transient());
    }

    #[test]
    fn test_request_limit_is_transient() {
        let json = r#"{"Response": "False", "Error": "Request limit reached!"}"#;
        let response: OmdbResponse = serde_json::from_str(json).unwrap();
        let err = response.into_enrichment("Heat").unwrap_err();
        assert!(matches!(err, EnrichError::RateLimited { .. }));
        assert!(err.is_transient());
    }

    #[test]
    fn test_invalid_api_key() {
        let json = r#"{"Response": "False", "Error": "Invalid API key!"}"#;
        let response: OmdbResponse = serde_json::from_str(json).unwrap();
        let err = response.into_enrichment("Heat").unwrap_err();
        assert!(matches!(err, EnrichError::Unauthorized { .. }));
    }

    #[test]
    fn test_unknown_failure_is_parse_error() {
        let json = r#"{"Response": "False"}"#;
        let response: OmdbResponse = serde_json::from_str(json).unwrap();
        let err = response.into_enrichment("Heat").unwrap_err();
        assert!(matches!(err, EnrichError::Parse { .. }));
    }

    #[test]
    fn test_client_debug_format() {
        let client = OmdbClient::new(
            "k".to_string(),
            OMDB_API_BASE.to_string(),
            Duration::from_secs(5),
        )
        .unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("OmdbClient"));
        assert_eq!(client.base_url(), OMDB_API_BASE);
    }

    #[tokio::test]
    async fn test_unreachable_source_degrades_to_placeholders() {
        let enricher = unreachable_enricher();
        let enrichment = enricher.enrich("Heat").await;
        assert!(enrichment.is_empty());
        assert_eq!(
            enrichment.poster_or_placeholder(),
            crate::enrich::POSTER_PLACEHOLDER
        );
    }

    #[tokio::test]
    async fn test_unreachable_source_surfaces_error_from_try_enrich() {
        let enricher = unreachable_enricher();
        let err = enricher.try_enrich("Heat").await.unwrap_err();
        assert!(matches!(err, EnrichError::Request(_)));
    }
}
