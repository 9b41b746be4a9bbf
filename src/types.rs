//! Common Types and Constants
//!
//! Configuration and diagnostic data structures shared across modules.

use serde::{Deserialize, Serialize};

// ==================== Constants ====================

/// Additive (Laplace) smoothing pseudo-count
pub const LAPLACE_ALPHA: f64 = 1.0;

/// Warn when a joint likelihood underflows to zero
pub const DEFAULT_WARN_ON_UNDERFLOW: bool = true;

// ==================== Configuration ====================

/// Built-in word validation policy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationPolicy {
    /// The empty string is an illegal feature
    #[default]
    RejectEmpty,
    /// Every word is accepted
    AcceptAll,
}

impl ValidationPolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "reject_empty" => Some(ValidationPolicy::RejectEmpty),
            "accept_all" => Some(ValidationPolicy::AcceptAll),
            _ => None,
        }
    }
}

/// Classifier configuration options
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClassifierOptions {
    /// Validation policy (default: reject empty words)
    pub validation: Option<ValidationPolicy>,
    /// Log a warning when a score underflows to zero (default: true)
    pub warn_on_underflow: Option<bool>,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            validation: Some(ValidationPolicy::RejectEmpty),
            warn_on_underflow: Some(DEFAULT_WARN_ON_UNDERFLOW),
        }
    }
}

// ==================== Diagnostics ====================

/// Per-category counts
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary<K> {
    pub category: K,
    /// Number of documents learnt under this category
    pub doc_count: usize,
    /// Word occurrences added, duplicates included
    pub total_word_occurrences: usize,
    /// Distinct words seen under this category
    pub distinct_words: usize,
    /// doc_count / training_set_size
    pub prior: f64,
}

/// Read-only view of the model's counts. Not a persistence format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassifierSummary<K> {
    pub training_set_size: usize,
    pub vocabulary_size: usize,
    pub categories: Vec<CategorySummary<K>>,
}

// ==================== Tests ====================
