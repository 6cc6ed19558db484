//! TF-IDF vector space.
//!
//! Fits a vocabulary over the whole corpus, weights each document's term
//! counts by inverse document frequency and L2-normalizes the result so
//! that cosine similarity reduces to a dot product.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::error::{SearchError, SearchResult};
use crate::stop_words::StopWords;
use crate::tokenize::Tokenizer;

/// Settings that fully determine the vector space for a given corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorizerConfig {
    pub stop_words: StopWords,

    /// Use `ln((1 + n) / (1 + df)) + 1` instead of `ln(n / df) + 1`.
    pub smooth_idf: bool,

    /// Replace a raw count `c` with `1 + ln(c)`.
    pub sublinear_tf: bool,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            stop_words: StopWords::english(),
            smooth_idf: true,
            sublinear_tf: false,
        }
    }
}

/// A sparse vector as `(dimension, weight)` pairs sorted by dimension.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// Build from pairs already sorted by dimension with no repeats.
    fn from_sorted(entries: Vec<(usize, f64)>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn is_zero(&self) -> bool {
        self.entries.iter().all(|&(_, w)| w == 0.0)
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt()
    }

    fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for (_, w) in &mut self.entries {
                *w /= norm;
            }
        }
    }

    /// Dot product by merging the two sorted dimension lists.
    pub fn dot(&self, other: &Self) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (da, wa) = self.entries[i];
            let (db, wb) = other.entries[j];
            match da.cmp(&db) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += wa * wb;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// Fitted vocabulary, IDF weights and one normalized vector per document.
#[derive(Debug, Clone)]
pub struct VectorSpace {
    /// Term -> dimension. Dimensions follow lexicographic term order.
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
    vectors: Vec<SparseVector>,
}

impl VectorSpace {
    /// Fit the vector space to `documents`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::EmptyCorpus`] when there are no documents.
    pub fn fit<S: AsRef<str>>(documents: &[S], config: &VectorizerConfig) -> SearchResult<Self> {
        if documents.is_empty() {
            return Err(SearchError::EmptyCorpus);
        }

        let tokenizer = Tokenizer::new(config.stop_words.clone());
        let tokenized: Vec<Vec<String>> = documents
            .iter()
            .map(|doc| tokenizer.tokenize(doc.as_ref()))
            .collect();

        let terms: BTreeSet<&str> = tokenized.iter().flatten().map(String::as_str).collect();
        let vocabulary: BTreeMap<String, usize> = terms
            .into_iter()
            .enumerate()
            .map(|(dim, term)| (term.to_string(), dim))
            .collect();

        let mut document_frequency = vec![0_usize; vocabulary.len()];
        for tokens in &tokenized {
            let unique: HashSet<usize> = tokens.iter().filter_map(|t| vocabulary.get(t).copied()).collect();
            for dim in unique {
                document_frequency[dim] += 1;
            }
        }

        let n = documents.len() as f64;
        let idf: Vec<f64> = document_frequency
            .iter()
            .map(|&df| inverse_document_frequency(n, df as f64, config.smooth_idf))
            .collect();

        let vectors = tokenized
            .iter()
            .map(|tokens| {
                let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
                for token in tokens {
                    if let Some(&dim) = vocabulary.get(token) {
                        *counts.entry(dim).or_insert(0) += 1;
                    }
                }
                let weighted = counts
                    .into_iter()
                    .map(|(dim, count)| {
                        let tf = if config.sublinear_tf {
                            1.0 + (count as f64).ln()
                        } else {
                            count as f64
                        };
                        (dim, tf * idf[dim])
                    })
                    .collect();
                let mut vector = SparseVector::from_sorted(weighted);
                vector.normalize();
                vector
            })
            .collect();

        log::debug!(
            "Fitted TF-IDF space: {} documents, {} terms",
            documents.len(),
            vocabulary.len()
        );

        Ok(Self {
            vocabulary,
            idf,
            vectors,
        })
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Number of document vectors.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn dimension_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.dimension_of(term).map(|dim| self.idf[dim])
    }

    pub fn vector(&self, position: usize) -> Option<&SparseVector> {
        self.vectors.get(position)
    }

    pub fn vectors(&self) -> &[SparseVector] {
        &self.vectors
    }

    /// Terms in dimension order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.vocabulary.keys().map(String::as_str)
    }
}

fn inverse_document_frequency(n: f64, df: f64, smooth: bool) -> f64 {
    if smooth {
        ((1.0 + n) / (1.0 + df)).ln() + 1.0
    } else {
        (n / df).ln() + 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn no_stop_words() -> VectorizerConfig {
        VectorizerConfig {
            stop_words: StopWords::none(),
            ..VectorizerConfig::default()
        }
    }

    #[test]
    fn test_fit_rejects_empty_corpus() {
        let docs: Vec<String> = Vec::new();
        let err = VectorSpace::fit(&docs, &VectorizerConfig::default()).unwrap_err();
        assert!(matches!(err, SearchError::EmptyCorpus));
    }

    #[test]
    fn test_vocabulary_is_sorted_union() {
        let space = VectorSpace::fit(&["banana apple", "cherry apple"], &no_stop_words()).unwrap();
        let terms: Vec<&str> = space.terms().collect();
        assert_eq!(terms, vec!["apple", "banana", "cherry"]);
        assert_eq!(space.dimension_of("cherry"), Some(2));
    }

    #[test]
    fn test_smoothed_idf_values() {
        let space = VectorSpace::fit(&["apple banana", "apple cherry"], &no_stop_words()).unwrap();
        // apple in both documents: ln(3/3) + 1
        assert!((space.idf("apple").unwrap() - 1.0).abs() < EPSILON);
        // banana in one: ln(3/2) + 1
        assert!((space.idf("banana").unwrap() - (1.5_f64.ln() + 1.0)).abs() < EPSILON);
    }

    #[test]
    fn test_unsmoothed_idf_values() {
        let config = VectorizerConfig {
            smooth_idf: false,
            ..no_stop_words()
        };
        let space = VectorSpace::fit(&["apple banana", "apple cherry"], &config).unwrap();
        assert!((space.idf("apple").unwrap() - 1.0).abs() < EPSILON);
        assert!((space.idf("banana").unwrap() - (2.0_f64.ln() + 1.0)).abs() < EPSILON);
    }

    #[test]
    fn test_vectors_are_unit_length() {
        let space = VectorSpace::fit(
            &["space space creatures", "quiet family story", "space family"],
            &VectorizerConfig::default(),
        )
        .unwrap();
        for vector in space.vectors() {
            assert!((vector.norm() - 1.0).abs() < EPSILON);
        }
    }

    #[test]
    fn test_known_cosine_value() {
        let space = VectorSpace::fit(&["apple banana", "apple cherry"], &no_stop_words()).unwrap();
        let a = space.vector(0).unwrap();
        let b = space.vector(1).unwrap();
        let idf_unique = 1.5_f64.ln() + 1.0;
        let expected = 1.0 / (1.0 + idf_unique * idf_unique);
        assert!((a.dot(b) - expected).abs() < EPSILON);
        assert!((a.dot(b) - 0.336_096_9).abs() < 1e-6);
    }

    #[test]
    fn test_term_frequency_counts_repeats() {
        let space = VectorSpace::fit(&["alpha alpha beta", "gamma"], &no_stop_words()).unwrap();
        let entries = space.vector(0).unwrap().entries();
        let alpha = entries[0].1;
        let beta = entries[1].1;
        // same idf, alpha counted twice
        assert!((alpha / beta - 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_sublinear_tf_dampens_repeats() {
        let config = VectorizerConfig {
            sublinear_tf: true,
            ..no_stop_words()
        };
        let space = VectorSpace::fit(&["alpha alpha beta", "gamma"], &config).unwrap();
        let entries = space.vector(0).unwrap().entries();
        let ratio = entries[0].1 / entries[1].1;
        assert!((ratio - (1.0 + 2.0_f64.ln())).abs() < EPSILON);
    }

    #[test]
    fn test_stop_word_only_document_is_zero_vector() {
        let space =
            VectorSpace::fit(&["the and of", "hero saves world"], &VectorizerConfig::default()).unwrap();
        assert!(space.vector(0).unwrap().is_zero());
        assert!(!space.vector(1).unwrap().is_zero());
    }

    #[test]
    fn test_sparse_dot_disjoint_is_zero() {
        let a = SparseVector::from_sorted(vec![(0, 1.0), (2, 1.0)]);
        let b = SparseVector::from_sorted(vec![(1, 1.0), (3, 1.0)]);
        assert!(a.dot(&b).abs() < EPSILON);
    }
}
