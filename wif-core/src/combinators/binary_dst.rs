//! Dempster-Shafer combination over the frame {positive, negative}.
//!
//! Each input value `v` is read as a piece of evidence assigning mass `v` to
//! "positive" and `1 - v` to "negative". Evidence is fused left to right with
//! Dempster's rule and the result is the belief in "positive".

use super::{ensure_not_empty, Combinator};
use crate::error::{Result, WifError};

const CONFLICT_EPSILON: f64 = 1e-12;

/// Basic mass assignment over the focal sets {P}, {N} and Θ = {P, N}.
#[derive(Debug, Clone, Copy, PartialEq)]
struct MassFunction {
    positive: f64,
    negative: f64,
    uncertain: f64,
}

impl MassFunction {
    fn from_evidence(value: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&value) {
            return Err(WifError::InvalidArgument(format!(
                "evidence must lie in [0, 1], got {}",
                value
            )));
        }
        Ok(Self {
            positive: value,
            negative: 1.0 - value,
            uncertain: 0.0,
        })
    }

    /// Dempster's rule of combination, normalised by `1 - K`.
    fn combine(&self, other: &MassFunction) -> Result<Self> {
        let conflict = self.positive * other.negative + self.negative * other.positive;
        let norm = 1.0 - conflict;
        if norm <= CONFLICT_EPSILON {
            return Err(WifError::InvalidArgument(
                "evidence is in total conflict".to_string(),
            ));
        }

        let positive = self.positive * other.positive
            + self.positive * other.uncertain
            + self.uncertain * other.positive;
        let negative = self.negative * other.negative
            + self.negative * other.uncertain
            + self.uncertain * other.negative;
        let uncertain = self.uncertain * other.uncertain;

        Ok(Self {
            positive: positive / norm,
            negative: negative / norm,
            uncertain: uncertain / norm,
        })
    }

    /// Bel({P}) is the mass of {P}, the only non-empty subset of itself.
    fn belief_positive(&self) -> f64 {
        self.positive
    }
}

/// Fuses scores in `[0, 1]` as independent binary evidence.
#[derive(Debug, Default, Clone, Copy)]
pub struct BinaryDstCombinator;

impl Combinator for BinaryDstCombinator {
    fn combine(&self, values: &[f64]) -> Result<f64> {
        ensure_not_empty(values, "binary DST combinator")?;

        let mut combined = MassFunction::from_evidence(values[0])?;
        for &value in &values[1..] {
            combined = combined.combine(&MassFunction::from_evidence(value)?)?;
        }
        Ok(combined.belief_positive())
    }
}
