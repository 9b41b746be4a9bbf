//! Vocabulary
//!
//! The set of distinct words seen across every training document.
//! Only its cardinality takes part in smoothing.

use std::collections::BTreeSet;

/// Distinct words across all categories. Grows monotonically.
#[derive(Clone, Debug, Default)]
pub struct Vocabulary {
    words: BTreeSet<String>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union `words` into the vocabulary, returning how many were new
    pub fn insert_all<S: AsRef<str>>(&mut self, words: &[S]) -> usize {
        let before = self.words.len();
        for word in words {
            let word = word.as_ref();
            if !self.words.contains(word) {
                self.words.insert(word.to_string());
            }
        }
        self.words.len() - before
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Words in lexicographic order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}
