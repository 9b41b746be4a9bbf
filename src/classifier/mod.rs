//! Multinomial Naive Bayes Text Classifier
//!
//! Core principles:
//! - Every learnt document increments its category's document count and adds
//!   its words to the category's word statistics and the global vocabulary
//! - The prior p(c) and likelihood p(w | c) are computed on demand from the
//!   counts; no derived state is cached
//! - Scoring multiplies the prior by each distinct query word's likelihood
//!   raised to its multiplicity in the query
//!
//! Mathematical formulas:
//! - Prior: p(c) = docs(c) / N
//! - Likelihood: p(w | c) = (count(w, c) + 1) / (|V| + total(c))
//! - Score: s(c) = p(c) · Π_w p(w | c)^m(w)
//!
//! Scores are unnormalized joint likelihoods. They rank categories but do not
//! sum to 1; divide by their sum externally for a distribution. Long
//! documents may underflow to `0.0`, see [`TextClassifier::log_probabilities`].
//!
//! Training takes `&mut self` and inference `&self`; share a classifier
//! across threads behind the caller's own lock.

use std::collections::BTreeMap;
use std::fmt;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::error::{ClassifierError, Result};
use crate::registry::CategoryRegistry;
use crate::sanitize::{self, FeatureValidator};
use crate::statistics::{CategoryWords, WordMultiset};
use crate::types::{
    CategorySummary, ClassifierOptions, ClassifierSummary, DEFAULT_WARN_ON_UNDERFLOW,
};
use crate::vocabulary::Vocabulary;

// ==================== Main Implementation ====================

/// Multinomial Naive Bayes classifier over category labels `K`
///
/// Categories iterate in `K`'s natural order, so every score map is
/// reproducible.
pub struct TextClassifier<K> {
    /// Document counts per category and training set size
    registry: CategoryRegistry<K>,
    /// Word statistics per category
    features: BTreeMap<K, CategoryWords>,
    /// Distinct words across all categories
    vocabulary: Vocabulary,
    /// Word validation policy
    validator: Box<dyn FeatureValidator>,
    /// Log a warning when a score underflows to zero
    warn_on_underflow: bool,
}

impl<K: fmt::Debug> fmt::Debug for TextClassifier<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextClassifier")
            .field("registry", &self.registry)
            .field("features", &self.features)
            .field("vocabulary", &self.vocabulary)
            .field("warn_on_underflow", &self.warn_on_underflow)
            .finish_non_exhaustive()
    }
}

impl<K: Ord + Clone + fmt::Debug> Default for TextClassifier<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone + fmt::Debug> TextClassifier<K> {
    /// Create an empty classifier that rejects empty words
    pub fn new() -> Self {
        Self::with_options(ClassifierOptions::default())
    }

    /// Create an empty classifier from configuration options
    pub fn with_options(options: ClassifierOptions) -> Self {
        let validator = options.validation.unwrap_or_default().into_validator();
        let mut classifier = Self::from_boxed(validator);
        classifier.warn_on_underflow = options
            .warn_on_underflow
            .unwrap_or(DEFAULT_WARN_ON_UNDERFLOW);
        classifier
    }

    /// Create an empty classifier with a caller-supplied validation policy
    ///
    /// ```rust
    /// use danci_bayes::TextClassifier;
    ///
    /// let mut classifier = TextClassifier::with_validator(|w: &str| w.len() > 1);
    /// assert!(classifier.learn("spam", &["buy", "x"]).is_err());
    /// ```
    pub fn with_validator<V: FeatureValidator + 'static>(validator: V) -> Self {
        Self::from_boxed(Box::new(validator))
    }

    fn from_boxed(validator: Box<dyn FeatureValidator>) -> Self {
        Self {
            registry: CategoryRegistry::new(),
            features: BTreeMap::new(),
            vocabulary: Vocabulary::new(),
            validator,
            warn_on_underflow: DEFAULT_WARN_ON_UNDERFLOW,
        }
    }

    // ==================== Training ====================

    /// Learn one document filed under `category`
    ///
    /// All words are validated before any state changes; a rejected document
    /// leaves the model exactly as it was. An empty document is accepted and
    /// still counts towards the category's document count.
    pub fn learn<S: AsRef<str>>(&mut self, category: K, words: &[S]) -> Result<()> {
        sanitize::validate_words(self.validator.as_ref(), words)?;

        let doc_count = self.registry.record_document(category.clone());
        let new_words = self.vocabulary.insert_all(words);
        self.features
            .entry(category)
            .or_default()
            .add_document(words);

        debug!(
            words = words.len(),
            new_words,
            doc_count,
            vocabulary = self.vocabulary.len(),
            training_set_size = self.registry.training_set_size(),
            "learnt document"
        );
        Ok(())
    }

    // ==================== Estimation ====================

    /// Prior p(category) = docs(category) / N
    pub fn prior(&self, category: &K) -> Result<f64> {
        let n = self.trained_size()?;
        let doc_count = self
            .registry
            .doc_count(category)
            .ok_or_else(|| unknown_category(category))?;
        Ok(doc_count as f64 / n as f64)
    }

    /// Smoothed likelihood p(word | category)
    pub fn likelihood(&self, word: &str, category: &K) -> Result<f64> {
        let stats = self.category_words(category)?;
        Ok(stats.likelihood(word, self.vocabulary.len()))
    }

    /// Unnormalized joint score for every known category
    ///
    /// Fails with [`ClassifierError::InvalidArgument`] on an empty document and
    /// with [`ClassifierError::IllegalFeature`] when the validation policy
    /// rejects a query word. An untrained model yields an empty map.
    ///
    /// ```rust
    /// use danci_bayes::TextClassifier;
    ///
    /// let mut classifier = TextClassifier::new();
    /// classifier.learn("spam", &["buy", "now"]).unwrap();
    /// classifier.learn("ham", &["hello", "friend"]).unwrap();
    ///
    /// let scores = classifier.probabilities(&["buy"]).unwrap();
    /// assert!(scores["spam"] > scores["ham"]);
    /// ```
    pub fn probabilities<S: AsRef<str>>(&self, words: &[S]) -> Result<BTreeMap<K, f64>> {
        let query = self.query_multiset(words)?;
        let vocabulary_size = self.vocabulary.len();
        let n = self.registry.training_set_size() as f64;

        let mut result = BTreeMap::new();
        for (category, doc_count) in self.registry.iter() {
            let stats = self.category_words(category)?;
            let mut score = doc_count as f64 / n;
            for (word, multiplicity) in query.iter() {
                score *= stats
                    .likelihood(word, vocabulary_size)
                    .powf(multiplicity as f64);
            }

            trace!(?category, score, "scored category");
            if self.warn_on_underflow && sanitize::underflowed(score) {
                warn!(
                    ?category,
                    words = query.total(),
                    "joint likelihood underflowed to zero"
                );
            }
            result.insert(category.clone(), score);
        }
        Ok(result)
    }

    /// Natural-log counterpart of [`probabilities`](Self::probabilities)
    ///
    /// ln s(c) = ln p(c) + Σ_w m(w) · ln p(w | c). Same preconditions and
    /// ordering; does not underflow for long documents.
    pub fn log_probabilities<S: AsRef<str>>(&self, words: &[S]) -> Result<BTreeMap<K, f64>> {
        let query = self.query_multiset(words)?;
        let vocabulary_size = self.vocabulary.len();
        let n = self.registry.training_set_size() as f64;

        let mut result = BTreeMap::new();
        for (category, doc_count) in self.registry.iter() {
            let stats = self.category_words(category)?;
            let log_score = query.iter().fold(
                (doc_count as f64 / n).ln(),
                |acc, (word, multiplicity)| {
                    acc + multiplicity as f64 * stats.likelihood(word, vocabulary_size).ln()
                },
            );

            trace!(?category, log_score, "scored category");
            result.insert(category.clone(), log_score);
        }
        Ok(result)
    }

    // ==================== Accessors ====================

    /// Number of documents learnt (`N`)
    pub fn training_set_size(&self) -> usize {
        self.registry.training_set_size()
    }

    pub fn is_trained(&self) -> bool {
        self.registry.training_set_size() > 0
    }

    /// Documents learnt under `category`, 0 if unknown
    pub fn doc_count(&self, category: &K) -> usize {
        self.registry.doc_count(category).unwrap_or(0)
    }

    /// Known categories in natural order
    pub fn categories(&self) -> impl Iterator<Item = &K> {
        self.registry.categories()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn contains_word(&self, word: &str) -> bool {
        self.vocabulary.contains(word)
    }

    /// Word occurrences added to `category`, 0 if unknown
    pub fn total_word_occurrences(&self, category: &K) -> usize {
        self.features
            .get(category)
            .map_or(0, CategoryWords::total_word_occurrences)
    }

    /// Occurrences of `word` under `category`, 0 if either is unknown
    pub fn word_occurrences(&self, word: &str, category: &K) -> usize {
        self.features
            .get(category)
            .map_or(0, |stats| stats.word_occurrences(word))
    }

    /// Snapshot of the model's counts
    pub fn summary(&self) -> ClassifierSummary<K> {
        let n = self.registry.training_set_size();
        let categories = self
            .registry
            .iter()
            .map(|(category, doc_count)| {
                let stats = self.features.get(category);
                CategorySummary {
                    category: category.clone(),
                    doc_count,
                    total_word_occurrences: stats
                        .map_or(0, CategoryWords::total_word_occurrences),
                    distinct_words: stats.map_or(0, CategoryWords::distinct_words),
                    prior: doc_count as f64 / n as f64,
                }
            })
            .collect();

        ClassifierSummary {
            training_set_size: n,
            vocabulary_size: self.vocabulary.len(),
            categories,
        }
    }

    // ==================== Internal ====================

    fn trained_size(&self) -> Result<usize> {
        match self.registry.training_set_size() {
            0 => Err(ClassifierError::Untrained),
            n => Ok(n),
        }
    }

    fn category_words(&self, category: &K) -> Result<&CategoryWords> {
        self.trained_size()?;
        self.features
            .get(category)
            .ok_or_else(|| unknown_category(category))
    }

    fn query_multiset<S: AsRef<str>>(&self, words: &[S]) -> Result<WordMultiset> {
        if words.is_empty() {
            return Err(ClassifierError::InvalidArgument(
                "collection of words must be non-empty".to_string(),
            ));
        }
        sanitize::validate_words(self.validator.as_ref(), words)?;
        Ok(WordMultiset::from_words(words))
    }
}

impl<K: Ord + Clone + fmt::Debug + Serialize> TextClassifier<K> {
    /// [`summary`](Self::summary) rendered as JSON
    pub fn summary_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.summary())?)
    }
}

impl<K: Ord + Clone + fmt::Debug + Send + Sync> TextClassifier<K> {
    /// Score many documents in parallel (Rayon)
    ///
    /// Result `i` equals `probabilities(&documents[i])`.
    pub fn batch_probabilities<D, S>(&self, documents: &[D]) -> Vec<Result<BTreeMap<K, f64>>>
    where
        D: AsRef<[S]> + Sync,
        S: AsRef<str>,
    {
        documents
            .par_iter()
            .map(|document| self.probabilities(document.as_ref()))
            .collect()
    }
}

fn unknown_category<K: fmt::Debug>(category: &K) -> ClassifierError {
    ClassifierError::UnknownCategory(format!("{:?}", category))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ValidationPolicy;

    const TOLERANCE: f64 = 1e-12;

    fn spam_ham() -> TextClassifier<&'static str> {
        let mut classifier = TextClassifier::new();
        classifier.learn("spam", &["buy", "now"]).unwrap();
        classifier.learn("ham", &["hello", "friend"]).unwrap();
        classifier
    }

    // ==================== learn 测试 ====================

    #[test]
    fn test_learn_updates_counts() {
        let mut classifier = TextClassifier::new();
        classifier.learn("A", &["x", "y", "x"]).unwrap();
        classifier.learn("B", &["y"]).unwrap();

        assert_eq!(classifier.training_set_size(), 2);
        assert_eq!(classifier.doc_count(&"A"), 1);
        assert_eq!(classifier.doc_count(&"B"), 1);
        assert_eq!(classifier.vocabulary_size(), 2);
        assert_eq!(classifier.total_word_occurrences(&"A"), 3);
        assert_eq!(classifier.word_occurrences("x", &"A"), 2);
        assert_eq!(classifier.word_occurrences("x", &"B"), 0);
    }

    #[test]
    fn test_learn_empty_document_counts_as_document() {
        let mut classifier = TextClassifier::new();
        let empty: [&str; 0] = [];
        classifier.learn("A", &empty).unwrap();

        assert_eq!(classifier.training_set_size(), 1);
        assert_eq!(classifier.doc_count(&"A"), 1);
        assert_eq!(classifier.total_word_occurrences(&"A"), 0);
        assert_eq!(classifier.vocabulary_size(), 0);
        assert_eq!(classifier.prior(&"A").unwrap(), 1.0);
    }

    #[test]
    fn test_learn_rejects_empty_word_without_mutation() {
        let mut classifier = TextClassifier::new();
        classifier.learn("A", &["x"]).unwrap();

        let err = classifier.learn("A", &["", "x"]).unwrap_err();
        assert!(matches!(err, ClassifierError::IllegalFeature { position: 0, .. }));

        assert_eq!(classifier.training_set_size(), 1);
        assert_eq!(classifier.doc_count(&"A"), 1);
        assert_eq!(classifier.total_word_occurrences(&"A"), 1);
        assert_eq!(classifier.vocabulary_size(), 1);
    }

    #[test]
    fn test_learn_rejected_new_category_not_registered() {
        let mut classifier = TextClassifier::new();
        assert!(classifier.learn("B", &["ok", ""]).is_err());
        assert_eq!(classifier.categories().count(), 0);
        assert!(!classifier.is_trained());
        assert!(!classifier.contains_word("ok"));
    }

    #[test]
    fn test_accept_all_policy_learns_empty_word() {
        let mut classifier = TextClassifier::with_options(ClassifierOptions {
            validation: Some(ValidationPolicy::AcceptAll),
            warn_on_underflow: None,
        });
        classifier.learn("A", &["", "x"]).unwrap();
        assert_eq!(classifier.vocabulary_size(), 2);
        assert_eq!(classifier.word_occurrences("", &"A"), 1);
    }

    #[test]
    fn test_custom_validator() {
        let mut classifier = TextClassifier::with_validator(|w: &str| w != "stop");
        classifier.learn("A", &[""]).unwrap();
        assert!(classifier.learn("A", &["go", "stop"]).is_err());
        assert_eq!(classifier.training_set_size(), 1);
    }

    // ==================== prior 测试 ====================

    #[test]
    fn test_prior() {
        let mut classifier = TextClassifier::new();
        for _ in 0..3 {
            classifier.learn("A", &["a"]).unwrap();
        }
        classifier.learn("B", &["b"]).unwrap();

        assert_eq!(classifier.prior(&"A").unwrap(), 0.75);
        assert_eq!(classifier.prior(&"B").unwrap(), 0.25);
    }

    #[test]
    fn test_prior_untrained() {
        let classifier: TextClassifier<&str> = TextClassifier::new();
        assert!(matches!(classifier.prior(&"A"), Err(ClassifierError::Untrained)));
    }

    #[test]
    fn test_prior_unknown_category() {
        let classifier = spam_ham();
        match classifier.prior(&"eggs") {
            Err(ClassifierError::UnknownCategory(name)) => assert_eq!(name, "\"eggs\""),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    // ==================== likelihood 测试 ====================

    #[test]
    fn test_likelihood_laplace() {
        let mut classifier = TextClassifier::new();
        classifier.learn("c", &["a"]).unwrap();
        classifier.learn("d", &["b"]).unwrap();

        let p_a = classifier.likelihood("a", &"c").unwrap();
        let p_b = classifier.likelihood("b", &"c").unwrap();
        assert!((p_a - 2.0 / 3.0).abs() < TOLERANCE);
        assert!((p_b - 1.0 / 3.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_likelihood_errors() {
        let empty: TextClassifier<&str> = TextClassifier::new();
        assert!(matches!(empty.likelihood("a", &"c"), Err(ClassifierError::Untrained)));

        let classifier = spam_ham();
        assert!(matches!(
            classifier.likelihood("buy", &"eggs"),
            Err(ClassifierError::UnknownCategory(_))
        ));
    }

    // ==================== probabilities 测试 ====================

    #[test]
    fn test_probabilities_spam_ham() {
        let classifier = spam_ham();
        let scores = classifier.probabilities(&["buy"]).unwrap();
        assert_eq!(scores.len(), 2);
        assert!(scores["spam"] > scores["ham"]);
    }

    #[test]
    fn test_probabilities_matches_formula() {
        let classifier = spam_ham();
        let scores = classifier.probabilities(&["buy", "buy", "hello"]).unwrap();

        // |V| = 4, total(spam) = 2
        let expected_spam = 0.5 * (2.0_f64 / 6.0).powi(2) * (1.0 / 6.0);
        assert!((scores["spam"] - expected_spam).abs() < TOLERANCE);
        let expected_ham = 0.5 * (1.0_f64 / 6.0).powi(2) * (2.0 / 6.0);
        assert!((scores["ham"] - expected_ham).abs() < TOLERANCE);
    }

    #[test]
    fn test_probabilities_not_normalized() {
        let classifier = spam_ham();
        let scores = classifier.probabilities(&["buy"]).unwrap();
        let sum: f64 = scores.values().sum();
        assert!(sum < 1.0);
    }

    #[test]
    fn test_probabilities_empty_document() {
        let empty: [&str; 0] = [];

        let untrained: TextClassifier<&str> = TextClassifier::new();
        assert!(matches!(
            untrained.probabilities(&empty),
            Err(ClassifierError::InvalidArgument(_))
        ));

        let classifier = spam_ham();
        assert!(matches!(
            classifier.probabilities(&empty),
            Err(ClassifierError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_probabilities_rejects_empty_query_word() {
        let classifier = spam_ham();
        assert!(matches!(
            classifier.probabilities(&["buy", ""]),
            Err(ClassifierError::IllegalFeature { position: 1, .. })
        ));
    }

    #[test]
    fn test_probabilities_untrained_is_empty() {
        let classifier: TextClassifier<String> = TextClassifier::new();
        assert!(classifier.probabilities(&["anything"]).unwrap().is_empty());
    }

    #[test]
    fn test_probabilities_does_not_mutate() {
        let classifier = spam_ham();
        let before = classifier.summary();
        classifier.probabilities(&["unseen", "words"]).unwrap();
        assert_eq!(classifier.summary(), before);
        assert!(!classifier.contains_word("unseen"));
    }

    #[test]
    fn test_probabilities_underflow_preserved() {
        let mut classifier = TextClassifier::with_options(ClassifierOptions {
            validation: None,
            warn_on_underflow: Some(false),
        });
        classifier.learn("A", &["a", "b"]).unwrap();

        let long_document = vec!["zzz"; 2000];
        let scores = classifier.probabilities(&long_document).unwrap();
        assert_eq!(scores["A"], 0.0);

        let log_scores = classifier.log_probabilities(&long_document).unwrap();
        assert!(log_scores["A"].is_finite());
    }

    // ==================== log_probabilities 测试 ====================

    #[test]
    fn test_log_probabilities_consistent() {
        let classifier = spam_ham();
        let document = ["buy", "now", "friend", "buy"];
        let scores = classifier.probabilities(&document).unwrap();
        let log_scores = classifier.log_probabilities(&document).unwrap();

        for (category, score) in &scores {
            assert!((log_scores[category].exp() - score).abs() < 1e-15);
        }
    }

    #[test]
    fn test_log_probabilities_empty_document() {
        let classifier = spam_ham();
        let empty: [&str; 0] = [];
        assert!(classifier.log_probabilities(&empty).is_err());
    }

    // ==================== batch / summary 测试 ====================

    #[test]
    fn test_batch_probabilities() {
        let classifier = spam_ham();
        let documents = vec![vec!["buy"], vec![], vec!["hello", "friend"]];
        let results = classifier.batch_probabilities(&documents);

        assert_eq!(results.len(), 3);
        assert_eq!(
            results[0].as_ref().unwrap(),
            &classifier.probabilities(&["buy"]).unwrap()
        );
        assert!(results[1].is_err());
        let third = results[2].as_ref().unwrap();
        assert!(third["ham"] > third["spam"]);
    }

    #[test]
    fn test_summary() {
        let mut classifier = TextClassifier::new();
        classifier.learn("A", &["x", "x", "y"]).unwrap();
        classifier.learn("A", &["z"]).unwrap();
        classifier.learn("B", &["x"]).unwrap();

        let summary = classifier.summary();
        assert_eq!(summary.training_set_size, 3);
        assert_eq!(summary.vocabulary_size, 3);
        assert_eq!(summary.categories.len(), 2);

        let a = &summary.categories[0];
        assert_eq!(a.category, "A");
        assert_eq!(a.doc_count, 2);
        assert_eq!(a.total_word_occurrences, 4);
        assert_eq!(a.distinct_words, 3);
        assert!((a.prior - 2.0 / 3.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_summary_json() {
        let classifier = spam_ham();
        let json = classifier.summary_json().unwrap();
        assert!(json.contains("\"training_set_size\":2"));
        assert!(json.contains("\"category\":\"ham\""));
    }

    #[test]
    fn test_debug_omits_validator() {
        let classifier = spam_ham();
        let debug_str = format!("{:?}", classifier);
        assert!(debug_str.contains("TextClassifier"));
        assert!(debug_str.contains("registry"));
        assert!(!debug_str.contains("validator"));
    }
}
