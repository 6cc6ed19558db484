//! Unigram tokenizer.

use std::sync::LazyLock;

use regex::Regex;

use crate::stop_words::StopWords;

/// Runs of two or more word characters. Single-character tokens never make
/// it into the vocabulary.
#[allow(clippy::expect_used)]
static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?u)\b\w\w+\b").expect("word pattern is a valid regex"));

/// Lowercases text, splits it into word tokens and drops stop words.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    stop_words: StopWords,
}

impl Tokenizer {
    pub fn new(stop_words: StopWords) -> Self {
        Self { stop_words }
    }

    /// Tokens of `text` in order of appearance, repeats included.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        WORD.find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|term| !self.stop_words.contains(term))
            .map(String::from)
            .collect()
    }
}
