//! Content-based similarity search for cinematch.
//!
//! Turns composite catalog documents into a TF-IDF vector space, caches the
//! all-pairs cosine similarity matrix and answers ranked neighbor queries
//! against that immutable state.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod index;
pub mod matrix;
pub mod stop_words;
pub mod tokenize;
pub mod vectorizer;

pub use error::{SearchError, SearchResult};
pub use index::{Neighbor, SimilarityIndex};
pub use matrix::SimilarityMatrix;
pub use stop_words::StopWords;
pub use tokenize::Tokenizer;
pub use vectorizer::{SparseVector, VectorSpace, VectorizerConfig};
