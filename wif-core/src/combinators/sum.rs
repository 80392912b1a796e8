use super::{ensure_not_empty, Combinator};
use crate::error::Result;

/// Plain sum of all scores.
#[derive(Debug, Default, Clone, Copy)]
pub struct SumCombinator;

impl Combinator for SumCombinator {
    fn combine(&self, values: &[f64]) -> Result<f64> {
        ensure_not_empty(values, "sum combinator")?;
        Ok(values.iter().sum())
    }
}
