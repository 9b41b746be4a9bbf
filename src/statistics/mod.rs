//! Category Word Statistics
//!
//! Word occurrence counting for one category, plus the add-one smoothed
//! likelihood estimate built on top of it.
//!
//! Formula:
//! - p(w | c) = (count(w, c) + α) / (|V| + total(c)), α = 1
//!   - count(w, c): occurrences of w in documents learnt as c
//!   - total(c): all word occurrences added to c, duplicates included
//!   - |V|: global vocabulary size

use std::collections::BTreeMap;

use crate::types::LAPLACE_ALPHA;

// ==================== Word Multiset ====================

/// Words with their multiplicities and a running total of everything added
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WordMultiset {
    counts: BTreeMap<String, usize>,
    added: usize,
}

impl WordMultiset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_words<S: AsRef<str>>(words: &[S]) -> Self {
        let mut multiset = Self::new();
        multiset.add_all(words);
        multiset
    }

    pub fn add(&mut self, word: &str) {
        match self.counts.get_mut(word) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(word.to_string(), 1);
            }
        }
        self.added += 1;
    }

    pub fn add_all<S: AsRef<str>>(&mut self, words: &[S]) {
        for word in words {
            self.add(word.as_ref());
        }
    }

    /// Multiplicity of `word`, 0 if never added
    pub fn occurrences(&self, word: &str) -> usize {
        self.counts.get(word).copied().unwrap_or(0)
    }

    /// Total words added, duplicates included
    pub fn total(&self) -> usize {
        self.added
    }

    /// Number of distinct words
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.added == 0
    }

    /// `(word, multiplicity)` pairs in lexicographic order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(w, &n)| (w.as_str(), n))
    }
}

// ==================== Category Words ====================

/// Word statistics of a single category
#[derive(Clone, Debug, Default)]
pub struct CategoryWords {
    words: WordMultiset,
}

impl CategoryWords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts every occurrence in one learnt document
    pub fn add_document<S: AsRef<str>>(&mut self, words: &[S]) {
        self.words.add_all(words);
    }

    pub fn word_occurrences(&self, word: &str) -> usize {
        self.words.occurrences(word)
    }

    pub fn total_word_occurrences(&self) -> usize {
        self.words.total()
    }

    pub fn distinct_words(&self) -> usize {
        self.words.distinct()
    }

    /// Smoothed p(word | category) given the global vocabulary size.
    ///
    /// Lies in `(0, 1]` whenever `vocabulary_size` counts every word learnt.
    /// With nothing learnt anywhere the denominator is zero; the word then
    /// carries no evidence and the estimate is `1.0`.
    pub fn likelihood(&self, word: &str, vocabulary_size: usize) -> f64 {
        let denominator = (vocabulary_size + self.total_word_occurrences()) as f64;
        if denominator == 0.0 {
            return 1.0;
        }
        (self.word_occurrences(word) as f64 + LAPLACE_ALPHA) / denominator
    }
}
