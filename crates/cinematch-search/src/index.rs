//! The immutable similarity index and its ranked-neighbor query.

use std::fmt;
use std::sync::Arc;

use cinematch_core::{Catalog, CatalogEntry};

use crate::error::{SearchError, SearchResult};
use crate::matrix::SimilarityMatrix;
use crate::vectorizer::{VectorSpace, VectorizerConfig};

/// One ranked result of a neighbor query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<'a> {
    /// Position of the entry in the catalog.
    pub position: usize,
    pub entry: &'a CatalogEntry,
    /// Cosine similarity to the query entry.
    pub score: f64,
}

/// Vector space and similarity matrix built once from a catalog.
///
/// Read-only after construction, so it can be shared across threads and
/// queried concurrently without locking.
#[derive(Clone)]
pub struct SimilarityIndex {
    catalog: Arc<Catalog>,
    space: VectorSpace,
    matrix: SimilarityMatrix,
}

impl SimilarityIndex {
    /// Build an index with the default vectorizer configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::EmptyCorpus`] when the catalog has no entries.
    pub fn build(catalog: Arc<Catalog>) -> SearchResult<Self> {
        Self::build_with(catalog, &VectorizerConfig::default())
    }

    /// Build an index with an explicit vectorizer configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::EmptyCorpus`] when the catalog has no entries.
    pub fn build_with(catalog: Arc<Catalog>, config: &VectorizerConfig) -> SearchResult<Self> {
        if catalog.is_empty() {
            return Err(SearchError::EmptyCorpus);
        }

        let documents = catalog.documents();
        let space = VectorSpace::fit(&documents, config)?;
        let matrix = SimilarityMatrix::from_space(&space);

        log::info!(
            "Built similarity index: {} movies, {} terms",
            catalog.len(),
            space.vocabulary_size()
        );

        Ok(Self {
            catalog,
            space,
            matrix,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn matrix(&self) -> &SimilarityMatrix {
        &self.matrix
    }

    pub fn len(&self) -> usize {
        self.matrix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.is_empty()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.space.vocabulary_size()
    }

    /// Cosine similarity between two catalog positions.
    pub fn similarity(&self, i: usize, j: usize) -> Option<f64> {
        self.matrix.get(i, j)
    }

    /// Similarity row of a catalog position.
    pub fn row(&self, position: usize) -> Option<&[f64]> {
        self.matrix.row(position)
    }

    /// Position of a title (case-insensitive, first occurrence wins).
    pub fn position_of(&self, title: &str) -> Option<usize> {
        self.catalog.position_of(title)
    }

    /// The `k` entries most similar to `title`, best first.
    ///
    /// An unknown title yields an empty result rather than an error. The
    /// query entry itself is never part of the result.
    pub fn neighbors(&self, title: &str, k: usize) -> Vec<Neighbor<'_>> {
        match self.position_of(title) {
            Some(position) => self.neighbors_of(position, k),
            None => {
                log::debug!("No catalog entry titled {:?}", title);
                Vec::new()
            }
        }
    }

    /// The `k` entries most similar to the entry at `position`, best first.
    ///
    /// Ties keep catalog order. Returns fewer than `k` results when the
    /// catalog has fewer other entries, and nothing for an out-of-range
    /// position.
    pub fn neighbors_of(&self, position: usize, k: usize) -> Vec<Neighbor<'_>> {
        let Some(row) = self.matrix.row(position) else {
            return Vec::new();
        };

        let mut ranked: Vec<(usize, f64)> = row
            .iter()
            .copied()
            .enumerate()
            .filter(|&(other, _)| other != position)
            .collect();

        // `sort_by` is stable: equal scores stay in catalog order.
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(k);

        ranked
            .into_iter()
            .filter_map(|(other, score)| {
                self.catalog.get(other).map(|entry| Neighbor {
                    position: other,
                    entry,
                    score,
                })
            })
            .collect()
    }
}

impl fmt::Debug for SimilarityIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimilarityIndex")
            .field("entries", &self.catalog.len())
            .field("vocabulary_size", &self.space.vocabulary_size())
            .finish_non_exhaustive()
    }
}
