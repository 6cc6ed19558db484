//! Ranked recommendations with enrichment attached.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use cinematch_search::{Neighbor, SimilarityIndex};

use crate::enrich::{Enrichment, EnrichmentProvider};

/// One recommended title, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub rank: usize,
    pub position: usize,
    pub title: String,
    pub genre: String,
    pub rating: String,
    pub score: f64,
    pub enrichment: Enrichment,
}

/// Joins the similarity index with an optional enrichment source.
///
/// Without a provider every recommendation is enriched from its own catalog
/// row. With one, provider values win field by field and the catalog fills
/// whatever the provider could not supply.
#[derive(Clone)]
pub struct Recommender {
    index: Arc<SimilarityIndex>,
    provider: Option<Arc<dyn EnrichmentProvider>>,
}

impl Recommender {
    pub fn new(index: Arc<SimilarityIndex>) -> Self {
        Self {
            index,
            provider: None,
        }
    }

    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn EnrichmentProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn index(&self) -> &SimilarityIndex {
        &self.index
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_deref().map(|p| p.name())
    }

    pub fn is_offline(&self) -> bool {
        self.provider.is_none()
    }

    /// Up to `k` recommendations for `title`. Unknown titles give an empty
    /// result.
    pub async fn recommend(&self, title: &str, k: usize) -> Vec<Recommendation> {
        let neighbors = self.index.neighbors(title, k);
        self.enrich_all(neighbors).await
    }

    /// Up to `k` recommendations for the catalog entry at `position`.
    pub async fn recommend_position(&self, position: usize, k: usize) -> Vec<Recommendation> {
        let neighbors = self.index.neighbors_of(position, k);
        self.enrich_all(neighbors).await
    }

    /// Enrichment for a single catalog entry.
    pub async fn enrich_position(&self, position: usize) -> Option<Enrichment> {
        let entry = self.index.catalog().get(position)?;
        let fallback = Enrichment::from_catalog(entry);
        Some(match &self.provider {
            Some(provider) => provider.enrich(&entry.title).await.or(fallback),
            None => fallback,
        })
    }

    // Sequential on purpose: each provider is rate limited to one request
    // at a time anyway.
    async fn enrich_all(&self, neighbors: Vec<Neighbor<'_>>) -> Vec<Recommendation> {
        let mut recommendations = Vec::with_capacity(neighbors.len());
        for (i, neighbor) in neighbors.into_iter().enumerate() {
            let fallback = Enrichment::from_catalog(neighbor.entry);
            let enrichment = match &self.provider {
                Some(provider) => provider.enrich(&neighbor.entry.title).await.or(fallback),
                None => fallback,
            };
            recommendations.push(Recommendation {
                rank: i + 1,
                position: neighbor.position,
                title: neighbor.entry.title.clone(),
                genre: neighbor.entry.genre.clone(),
                rating: neighbor.entry.rating.clone(),
                score: neighbor.score,
                enrichment,
            });
        }
        recommendations
    }
}

impl fmt::Debug for Recommender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recommender")
            .field("entries", &self.index.len())
            .field("provider", &self.provider_name())
            .finish()
    }
}
