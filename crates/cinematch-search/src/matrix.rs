//! Dense all-pairs cosine similarity matrix.

use std::fmt;

use crate::vectorizer::VectorSpace;

/// Square, symmetric matrix of cosine similarities, stored row-major.
///
/// Each unordered pair is computed once and mirrored, so `(i, j)` and
/// `(j, i)` are bit-identical. The diagonal is exactly `1.0` for every
/// entry, including documents whose vector is all zeros.
#[derive(Clone, PartialEq)]
pub struct SimilarityMatrix {
    size: usize,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    pub fn from_space(space: &VectorSpace) -> Self {
        let vectors = space.vectors();
        let size = vectors.len();
        let mut values = vec![0.0; size * size];

        for i in 0..size {
            values[i * size + i] = 1.0;
            for j in (i + 1)..size {
                let score = vectors[i].dot(&vectors[j]);
                values[i * size + j] = score;
                values[j * size + i] = score;
            }
        }

        Self { size, values }
    }

    /// Number of rows (and columns).
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        (i < self.size && j < self.size).then(|| self.values[i * self.size + j])
    }

    pub fn row(&self, i: usize) -> Option<&[f64]> {
        (i < self.size).then(|| &self.values[i * self.size..(i + 1) * self.size])
    }
}

impl fmt::Debug for SimilarityMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimilarityMatrix")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}
