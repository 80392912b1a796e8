use super::{ensure_not_empty, Combinator};
use crate::error::Result;

/// Most frequent score.
///
/// Ties go to the smallest value, since values are scanned in ascending order
/// and a later run only wins with a strictly higher count.
#[derive(Debug, Default, Clone, Copy)]
pub struct MajorityCombinator;

impl Combinator for MajorityCombinator {
    fn combine(&self, values: &[f64]) -> Result<f64> {
        ensure_not_empty(values, "majority combinator")?;

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mut best = sorted[0];
        let mut best_count = 1usize;
        let mut run = 1usize;
        for pair in sorted.windows(2) {
            if pair[1] == pair[0] {
                run += 1;
            } else {
                run = 1;
            }
            if run > best_count {
                best_count = run;
                best = pair[0];
            }
        }
        Ok(best)
    }
}
