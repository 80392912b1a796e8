//! Multi-regex pattern scored on a 0-100 scale.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WifError};

/// Score returned when the pattern is found.
pub const PATTERN_FOUND: f64 = 100.0;
/// Score returned when the pattern is not found.
pub const PATTERN_NOT_FOUND: f64 = 0.0;

/// How the individual regexes of a pattern are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Every regex has to match.
    All,
    /// At least one regex has to match.
    #[default]
    Any,
    /// Proportional score: `100 / total * matched`.
    Part,
}

type MatchFn = fn(&RegexPattern, &str) -> f64;

/// An ordered, non-empty list of compiled regexes plus a match mode.
///
/// Regexes are searched (unanchored), not matched against the whole input.
#[derive(Clone)]
pub struct RegexPattern {
    regexes: Vec<Regex>,
    mode: MatchMode,
    match_fn: MatchFn,
}

impl RegexPattern {
    /// Compile all regexes. Fails on an empty list or on the first invalid regex.
    pub fn new<I, S>(regexes: I, mode: MatchMode) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let regexes = regexes
            .into_iter()
            .map(|r| Regex::new(r.as_ref()))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        if regexes.is_empty() {
            return Err(WifError::InvalidArgument(
                "a regex pattern needs at least one regex".to_string(),
            ));
        }

        let match_fn: MatchFn = match mode {
            MatchMode::All => Self::match_all,
            MatchMode::Any => Self::match_any,
            MatchMode::Part => Self::match_part,
        };

        Ok(Self {
            regexes,
            mode,
            match_fn,
        })
    }

    /// Score `text` according to the match mode.
    pub fn score(&self, text: &str) -> f64 {
        (self.match_fn)(self, text)
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Number of compiled regexes, never zero.
    pub fn pattern_count(&self) -> usize {
        self.regexes.len()
    }

    /// Source text of each regex, in order.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.regexes.iter().map(Regex::as_str)
    }

    fn match_all(&self, text: &str) -> f64 {
        if self.regexes.iter().all(|r| r.is_match(text)) {
            PATTERN_FOUND
        } else {
            PATTERN_NOT_FOUND
        }
    }

    fn match_any(&self, text: &str) -> f64 {
        if self.regexes.iter().any(|r| r.is_match(text)) {
            PATTERN_FOUND
        } else {
            PATTERN_NOT_FOUND
        }
    }

    fn match_part(&self, text: &str) -> f64 {
        let matched = self.regexes.iter().filter(|r| r.is_match(text)).count();
        if matched == self.regexes.len() {
            return PATTERN_FOUND;
        }
        PATTERN_FOUND / self.regexes.len() as f64 * matched as f64
    }
}

impl std::fmt::Debug for RegexPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegexPattern")
            .field("regexes", &self.sources().collect::<Vec<_>>())
            .field("mode", &self.mode)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(regexes: &[&str], mode: MatchMode) -> RegexPattern {
        RegexPattern::new(regexes, mode).expect("valid pattern")
    }

    // ===========================================
    // Construction
    // ===========================================

    #[test]
    fn test_empty_list_rejected() {
        let result = RegexPattern::new(Vec::<String>::new(), MatchMode::Any);
        assert!(matches!(result, Err(WifError::InvalidArgument(_))));
    }

    #[test]
    fn test_invalid_regex_rejected() {
        let result = RegexPattern::new(["ok", "(unclosed"], MatchMode::All);
        assert!(matches!(result, Err(WifError::Pattern(_))));
    }

    #[test]
    fn test_accessors() {
        let p = pattern(&["a", "b+"], MatchMode::Part);
        assert_eq!(p.pattern_count(), 2);
        assert_eq!(p.mode(), MatchMode::Part);
        assert_eq!(p.sources().collect::<Vec<_>>(), ["a", "b+"]);
    }

    // ===========================================
    // Match modes
    // ===========================================

    #[test]
    fn test_all_mode() {
        let p = pattern(&["foo", "bar"], MatchMode::All);
        assert_eq!(p.score("foobar"), PATTERN_FOUND);
        assert_eq!(p.score("foo"), PATTERN_NOT_FOUND);
    }

    #[test]
    fn test_any_mode() {
        let p = pattern(&["a.c"], MatchMode::Any);
        assert_eq!(p.score("abc"), 100.0);
        assert_eq!(p.score("xyz"), 0.0);
    }

    #[test]
    fn test_search_is_unanchored() {
        let p = pattern(&["evil"], MatchMode::Any);
        assert_eq!(p.score("www.evil.example.com"), PATTERN_FOUND);
        let anchored = pattern(&["^evil$"], MatchMode::Any);
        assert_eq!(anchored.score("www.evil.example.com"), PATTERN_NOT_FOUND);
    }

    #[test]
    fn test_part_mode_proportional() {
        let p = pattern(&["a", "b", "c", "d"], MatchMode::Part);
        assert_eq!(p.score("xyz"), 0.0);
        assert_eq!(p.score("a"), 25.0);
        assert_eq!(p.score("ab"), 50.0);
        assert_eq!(p.score("abcd"), 100.0);
    }

    #[test]
    fn test_part_mode_all_matched_is_exactly_hundred() {
        let p = pattern(&["a", "b", "c"], MatchMode::Part);
        assert_eq!(p.score("cab"), PATTERN_FOUND);
        let two_of_three = p.score("ab");
        assert!((two_of_three - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_mode_serde_names() {
        assert_eq!(serde_json::to_string(&MatchMode::Part).expect("json"), "\"part\"");
        let mode: MatchMode = serde_json::from_str("\"all\"").expect("json");
        assert_eq!(mode, MatchMode::All);
    }

    #[test]
    fn test_debug_lists_sources() {
        let p = pattern(&["x+"], MatchMode::Any);
        assert!(format!("{:?}", p).contains("x+"));
    }
}
