use super::{ensure_not_empty, Combinator};
use crate::error::Result;

/// Arithmetic mean of all scores.
#[derive(Debug, Default, Clone, Copy)]
pub struct AverageCombinator;

impl Combinator for AverageCombinator {
    fn combine(&self, values: &[f64]) -> Result<f64> {
        ensure_not_empty(values, "average combinator")?;
        Ok(values.iter().sum::<f64>() / values.len() as f64)
    }
}
