//! Feature Validation
//!
//! Word-level validation policies and score sanity checks.
//!
//! Policies:
//! - [`RejectEmpty`] - default, the empty string is an illegal feature
//! - [`AcceptAll`] - no-op policy
//! - any `Fn(&str) -> bool + Send + Sync` closure (`true` = accept)

use tracing::warn;

use crate::error::{ClassifierError, Result};
use crate::types::ValidationPolicy;

/// Decides whether a single word is a legal feature.
pub trait FeatureValidator: Send + Sync {
    /// Returns `true` when `word` may be learnt or queried.
    fn accepts(&self, word: &str) -> bool;
}

/// Rejects the empty string, accepts everything else
#[derive(Clone, Copy, Debug, Default)]
pub struct RejectEmpty;

impl FeatureValidator for RejectEmpty {
    fn accepts(&self, word: &str) -> bool {
        !word.is_empty()
    }
}

/// Accepts every word, including the empty string
#[derive(Clone, Copy, Debug, Default)]
pub struct AcceptAll;

impl FeatureValidator for AcceptAll {
    fn accepts(&self, _word: &str) -> bool {
        true
    }
}

impl<F> FeatureValidator for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn accepts(&self, word: &str) -> bool {
        self(word)
    }
}

impl ValidationPolicy {
    /// 构建对应的校验器
    pub fn into_validator(self) -> Box<dyn FeatureValidator> {
        match self {
            ValidationPolicy::RejectEmpty => Box::new(RejectEmpty),
            ValidationPolicy::AcceptAll => Box::new(AcceptAll),
        }
    }
}

/// 校验整篇文档，遇到第一个非法词即返回错误
///
/// Runs over every element independently of duplicates. Nothing is mutated
/// here, so callers can validate before touching any state.
pub fn validate_words<S: AsRef<str>>(validator: &dyn FeatureValidator, words: &[S]) -> Result<()> {
    for (position, word) in words.iter().enumerate() {
        let word = word.as_ref();
        if !validator.accepts(word) {
            warn!(position, word, "rejected illegal feature");
            return Err(ClassifierError::IllegalFeature {
                position,
                word: word.to_string(),
            });
        }
    }
    Ok(())
}

/// 检查分数是否包含无效值 (NaN 或 Inf)
pub fn has_invalid_scores(scores: &[f64]) -> bool {
    scores.iter().any(|&x| x.is_nan() || x.is_infinite())
}

/// 判断联合概率是否已下溢为 0
pub fn underflowed(score: f64) -> bool {
    score == 0.0
}
