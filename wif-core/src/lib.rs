//! WIF core: flow classification building blocks.
//!
//! This crate provides:
//! - Storage types: dual-stack `IpAddress`, `FlowFeatures` records, `ClfResult`
//! - `IpPrefix` with containment and total ordering
//! - Combinators merging per-feature scores (sum, average, majority, Dempster-Shafer)
//! - `RegexPattern` with all/any/part matching
//! - Classifiers: regex, IP blocklist, ML-backed and the auto-reloading adaptive classifier
//! - Reporters, aggregation records, blocklist loading and configuration

pub mod aggregation;
pub mod blocklist;
pub mod classifiers;
pub mod combinators;
pub mod config;
pub mod error;
pub mod ml;
pub mod pattern;
pub mod reporters;
pub mod storage;
pub mod utils;

pub use classifiers::{AdaptiveClassifier, Classifier, IpPrefixClassifier, RegexClassifier};
pub use combinators::{Combinator, CombinatorKind};
pub use error::{Result, WifError};
pub use ml::{MlBackend, MlClassifier, ModelClassifier};
pub use pattern::{MatchMode, RegexPattern};
pub use reporters::Reporter;
pub use storage::{ClfResult, DataVariant, FeatureId, FlowFeatures, IpAddress};
pub use utils::IpPrefix;
