//! Classifier abstraction and the built-in classifiers.

pub mod adaptive;
pub mod ip_prefix_classifier;
pub mod regex_classifier;

use crate::error::Result;
use crate::storage::{ClfResult, FeatureId, FlowFeatures};

pub use adaptive::{AdaptiveClassifier, ReloadFlag};
pub use ip_prefix_classifier::IpPrefixClassifier;
pub use regex_classifier::RegexClassifier;

/// Turns flow feature records into classification results.
///
/// A classifier only reads the feature slots assigned through
/// [`set_feature_source_ids`](Classifier::set_feature_source_ids).
pub trait Classifier {
    /// Assign the feature slots this classifier reads.
    fn set_feature_source_ids(&mut self, ids: &[FeatureId]);

    fn feature_source_ids(&self) -> &[FeatureId];

    fn classify(&mut self, flow: &FlowFeatures) -> Result<ClfResult>;

    /// Classify a burst of flows. The result has one entry per flow, in order.
    fn classify_burst(&mut self, flows: &[FlowFeatures]) -> Result<Vec<ClfResult>> {
        flows.iter().map(|flow| self.classify(flow)).collect()
    }
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn set_feature_source_ids(&mut self, ids: &[FeatureId]) {
        (**self).set_feature_source_ids(ids)
    }

    fn feature_source_ids(&self) -> &[FeatureId] {
        (**self).feature_source_ids()
    }

    fn classify(&mut self, flow: &FlowFeatures) -> Result<ClfResult> {
        (**self).classify(flow)
    }

    fn classify_burst(&mut self, flows: &[FlowFeatures]) -> Result<Vec<ClfResult>> {
        (**self).classify_burst(flows)
    }
}
