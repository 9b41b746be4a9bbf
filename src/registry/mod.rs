//! Category Registry
//!
//! Known category labels, per-category document counts and the training set
//! size `N`. Categories are registered implicitly by the first document filed
//! under them and are never removed.

use std::collections::BTreeMap;

/// Document counts keyed by category, iterated in the category's natural order
#[derive(Clone, Debug)]
pub struct CategoryRegistry<K> {
    doc_counts: BTreeMap<K, usize>,
    training_set_size: usize,
}

impl<K> Default for CategoryRegistry<K> {
    fn default() -> Self {
        Self {
            doc_counts: BTreeMap::new(),
            training_set_size: 0,
        }
    }
}

impl<K: Ord> CategoryRegistry<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Files one document under `category` and returns its new document count
    pub fn record_document(&mut self, category: K) -> usize {
        self.training_set_size += 1;
        let count = self.doc_counts.entry(category).or_insert(0);
        *count += 1;
        *count
    }

    pub fn doc_count(&self, category: &K) -> Option<usize> {
        self.doc_counts.get(category).copied()
    }

    pub fn contains(&self, category: &K) -> bool {
        self.doc_counts.contains_key(category)
    }

    /// Total number of documents across all categories (`N`)
    pub fn training_set_size(&self) -> usize {
        self.training_set_size
    }

    /// Number of known categories
    pub fn len(&self) -> usize {
        self.doc_counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_counts.is_empty()
    }

    pub fn categories(&self) -> impl Iterator<Item = &K> {
        self.doc_counts.keys()
    }

    /// `(category, doc_count)` pairs in category order
    pub fn iter(&self) -> impl Iterator<Item = (&K, usize)> {
        self.doc_counts.iter().map(|(k, &n)| (k, n))
    }
}
