//! Classifier configuration.
//!
//! These structs are meant to be embedded in a host application's own
//! config file, hence the serde derives. Missing fields take the defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::classifiers::{Classifier, IpPrefixClassifier, RegexClassifier};
use crate::combinators::CombinatorKind;
use crate::error::Result;
use crate::ml::DEFAULT_LOGICAL_NAME;
use crate::pattern::{MatchMode, RegexPattern};
use crate::storage::FeatureId;
use crate::utils::IpPrefix;

/// Default model file check interval in seconds.
pub const DEFAULT_CHECK_INTERVAL_SEC: u64 = 60;

/// Settings of the adaptive (auto-reloading) classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveConfig {
    /// How often the model file is checked for changes.
    pub check_interval_sec: u64,
    /// Name of the model inside the model file.
    pub logical_name: String,
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            check_interval_sec: DEFAULT_CHECK_INTERVAL_SEC,
            logical_name: DEFAULT_LOGICAL_NAME.to_string(),
        }
    }
}

impl AdaptiveConfig {
    pub fn with_check_interval_sec(mut self, seconds: u64) -> Self {
        self.check_interval_sec = seconds;
        self
    }

    pub fn with_logical_name(mut self, name: impl Into<String>) -> Self {
        self.logical_name = name.into();
        self
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_sec)
    }
}

/// Settings of a regex classifier.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegexClassifierConfig {
    pub patterns: Vec<String>,
    pub mode: MatchMode,
    pub combinator: CombinatorKind,
    pub feature_ids: Vec<FeatureId>,
}

impl RegexClassifierConfig {
    pub fn with_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_combinator(mut self, combinator: CombinatorKind) -> Self {
        self.combinator = combinator;
        self
    }

    pub fn with_feature_ids(mut self, ids: &[FeatureId]) -> Self {
        self.feature_ids = ids.to_vec();
        self
    }

    /// Compile the patterns and assemble the classifier.
    pub fn build(&self) -> Result<RegexClassifier> {
        let pattern = RegexPattern::new(&self.patterns, self.mode)?;
        let mut classifier = RegexClassifier::new(pattern, Some(self.combinator.build()))?;
        classifier.set_feature_source_ids(&self.feature_ids);
        Ok(classifier)
    }
}

/// Settings of a blocklist classifier.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IpPrefixClassifierConfig {
    pub blocklist: Vec<IpPrefix>,
    pub feature_ids: Vec<FeatureId>,
}

impl IpPrefixClassifierConfig {
    pub fn with_blocklist(mut self, blocklist: Vec<IpPrefix>) -> Self {
        self.blocklist = blocklist;
        self
    }

    pub fn with_feature_ids(mut self, ids: &[FeatureId]) -> Self {
        self.feature_ids = ids.to_vec();
        self
    }

    pub fn build(&self) -> IpPrefixClassifier {
        let mut classifier = IpPrefixClassifier::new(self.blocklist.clone());
        classifier.set_feature_source_ids(&self.feature_ids);
        classifier
    }
}
