//! Regex matching over string features.

use tracing::debug;

use super::Classifier;
use crate::combinators::Combinator;
use crate::error::{Result, WifError};
use crate::pattern::RegexPattern;
use crate::storage::{ClfResult, FeatureId, FlowFeatures};

/// Scores every assigned string feature against a [`RegexPattern`] and merges
/// the per-feature scores with a [`Combinator`].
pub struct RegexClassifier {
    pattern: RegexPattern,
    combinator: Box<dyn Combinator>,
    feature_ids: Vec<FeatureId>,
}

impl RegexClassifier {
    /// A combinator is mandatory; `None` fails with [`WifError::InvalidState`].
    pub fn new(pattern: RegexPattern, combinator: Option<Box<dyn Combinator>>) -> Result<Self> {
        let combinator = combinator.ok_or_else(|| {
            WifError::InvalidState("regex classifier requires a combinator".to_string())
        })?;
        debug!(regexes = pattern.pattern_count(), mode = ?pattern.mode(), "regex classifier created");
        Ok(Self {
            pattern,
            combinator,
            feature_ids: Vec::new(),
        })
    }

    pub fn pattern(&self) -> &RegexPattern {
        &self.pattern
    }
}

impl Classifier for RegexClassifier {
    fn set_feature_source_ids(&mut self, ids: &[FeatureId]) {
        self.feature_ids = ids.to_vec();
    }

    fn feature_source_ids(&self) -> &[FeatureId] {
        &self.feature_ids
    }

    fn classify(&mut self, flow: &FlowFeatures) -> Result<ClfResult> {
        let scores = self
            .feature_ids
            .iter()
            .map(|&id| flow.get::<String>(id).map(|text| self.pattern.score(text)))
            .collect::<Result<Vec<f64>>>()?;
        Ok(ClfResult::Scalar(self.combinator.combine(&scores)?))
    }
}

impl std::fmt::Debug for RegexClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegexClassifier")
            .field("pattern", &self.pattern)
            .field("feature_ids", &self.feature_ids)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinators::{AverageCombinator, SumCombinator};
    use crate::pattern::MatchMode;

    fn flow(values: &[&str]) -> FlowFeatures {
        let mut features = FlowFeatures::new(values.len());
        for (id, value) in values.iter().enumerate() {
            features.set(id as FeatureId, *value).expect("set");
        }
        features
    }

    fn classifier(regexes: &[&str], mode: MatchMode, combinator: Box<dyn Combinator>) -> RegexClassifier {
        let pattern = RegexPattern::new(regexes, mode).expect("pattern");
        RegexClassifier::new(pattern, Some(combinator)).expect("classifier")
    }

    // ===========================================
    // Construction
    // ===========================================

    #[test]
    fn test_missing_combinator() {
        let pattern = RegexPattern::new(["a"], MatchMode::Any).expect("pattern");
        let result = RegexClassifier::new(pattern, None);
        assert!(matches!(result, Err(WifError::InvalidState(_))));
    }

    // ===========================================
    // Classification
    // ===========================================

    #[test]
    fn test_any_with_sum() {
        let mut clf = classifier(&["a.c"], MatchMode::Any, Box::new(SumCombinator));
        clf.set_feature_source_ids(&[0, 1]);
        let result = clf.classify(&flow(&["abc", "xyz"])).expect("classify");
        assert_eq!(result, ClfResult::Scalar(100.0));
    }

    #[test]
    fn test_average_over_features() {
        let mut clf = classifier(&["a.c"], MatchMode::Any, Box::new(AverageCombinator));
        clf.set_feature_source_ids(&[0, 1]);
        let result = clf.classify(&flow(&["abc", "xyz"])).expect("classify");
        assert_eq!(result.as_scalar().expect("scalar"), 50.0);
    }

    #[test]
    fn test_only_assigned_features_are_read() {
        let mut clf = classifier(&["bad"], MatchMode::Any, Box::new(SumCombinator));
        clf.set_feature_source_ids(&[1]);
        let result = clf.classify(&flow(&["bad", "good"])).expect("classify");
        assert_eq!(result, ClfResult::Scalar(0.0));
        assert_eq!(clf.feature_source_ids(), &[1]);
    }

    #[test]
    fn test_non_string_feature_is_type_mismatch() {
        let mut clf = classifier(&["a"], MatchMode::Any, Box::new(SumCombinator));
        clf.set_feature_source_ids(&[0]);
        let mut features = FlowFeatures::new(1);
        features.set(0, 80u16).expect("set");
        assert!(matches!(
            clf.classify(&features),
            Err(WifError::TypeMismatch { expected: "string", .. })
        ));
    }

    #[test]
    fn test_no_assigned_features_is_empty_input() {
        let mut clf = classifier(&["a"], MatchMode::Any, Box::new(SumCombinator));
        assert!(matches!(
            clf.classify(&flow(&["a"])),
            Err(WifError::EmptyInput(_))
        ));
    }

    #[test]
    fn test_burst() {
        let mut clf = classifier(&["x", "y"], MatchMode::Part, Box::new(SumCombinator));
        clf.set_feature_source_ids(&[0]);
        let results = clf
            .classify_burst(&[flow(&["xy"]), flow(&["x"]), flow(&["z"])])
            .expect("burst");
        assert_eq!(
            results,
            vec![ClfResult::Scalar(100.0), ClfResult::Scalar(50.0), ClfResult::Scalar(0.0)]
        );
    }
}
