//! Error Types
//!
//! Every fallible operation in this crate returns [`ClassifierError`].
//! Nothing is retried or swallowed internally.

/// Classifier error
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    /// A word was rejected by the validation policy
    #[error("illegal feature at position {position}: {word:?}")]
    IllegalFeature { position: usize, word: String },

    /// Argument violates an operation precondition
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Category was never trained
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    /// No document has been learnt yet
    #[error("model is untrained: no documents have been learnt")]
    Untrained,

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClassifierError>;
