//! # danci-bayes - 多项式朴素贝叶斯文本分类
//!
//! 本 crate 提供纯 Rust 实现的文本分类算法:
//!
//! - **Multinomial Naive Bayes** - 基于词频的贝叶斯分类器
//! - **Laplace Smoothing** - 加一平滑，未见词的概率不为零
//! - **Pluggable Validation** - 可注入的词校验策略
//!
//! ## 设计理念
//!
//! - **只做计数与估计** - 分词、持久化和决策规则由调用方负责
//! - **确定性** - 类别按自然顺序遍历，结果可复现
//! - **只增不减** - 训练只会累加计数
//!
//! ## 模块结构
//!
//! - [`classifier`] - 分类器 (训练、先验、似然、联合得分)
//! - [`statistics`] - 类别词频统计与平滑似然
//! - [`vocabulary`] - 全局词表
//! - [`registry`] - 类别登记与文档计数
//! - [`sanitize`] - 词校验策略与分数检查
//! - [`types`] - 配置、诊断类型和常量
//! - [`error`] - 错误类型
//!
//! ## 使用示例
//!
//! ```rust
//! use danci_bayes::TextClassifier;
//!
//! let mut classifier = TextClassifier::new();
//! classifier.learn("spam", &["buy", "now"]).unwrap();
//! classifier.learn("ham", &["hello", "friend"]).unwrap();
//!
//! let scores = classifier.probabilities(&["buy"]).unwrap();
//! let best = scores
//!     .iter()
//!     .max_by(|a, b| a.1.total_cmp(b.1))
//!     .map(|(category, _)| *category);
//! assert_eq!(best, Some("spam"));
//! ```

// ============================================================================
// 模块声明
// ============================================================================

pub mod classifier;
pub mod error;
pub mod registry;
pub mod sanitize;
pub mod statistics;
pub mod types;
pub mod vocabulary;

// ============================================================================
// 重新导出
// ============================================================================

/// 重新导出所有公共类型
pub use types::*;

/// 重新导出分类器
pub use classifier::TextClassifier;

/// 重新导出错误类型
pub use error::{ClassifierError, Result};

/// 重新导出校验策略
pub use sanitize::{AcceptAll, FeatureValidator, RejectEmpty};

pub use registry::CategoryRegistry;
pub use statistics::{CategoryWords, WordMultiset};
pub use vocabulary::Vocabulary;
