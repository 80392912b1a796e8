//! Strategies merging several per-feature scores into one.

pub mod average;
pub mod binary_dst;
pub mod majority;
pub mod sum;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WifError};

pub use average::AverageCombinator;
pub use binary_dst::BinaryDstCombinator;
pub use majority::MajorityCombinator;
pub use sum::SumCombinator;

/// Merges a list of scores into a single score.
///
/// Every implementation rejects an empty list with [`WifError::EmptyInput`].
pub trait Combinator: Send + Sync {
    fn combine(&self, values: &[f64]) -> Result<f64>;
}

/// Selects a combinator by name, e.g. from a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombinatorKind {
    #[default]
    Sum,
    Average,
    Majority,
    BinaryDst,
}

impl CombinatorKind {
    pub fn build(self) -> Box<dyn Combinator> {
        match self {
            CombinatorKind::Sum => Box::new(SumCombinator),
            CombinatorKind::Average => Box::new(AverageCombinator),
            CombinatorKind::Majority => Box::new(MajorityCombinator),
            CombinatorKind::BinaryDst => Box::new(BinaryDstCombinator),
        }
    }
}

fn ensure_not_empty(values: &[f64], combinator: &'static str) -> Result<()> {
    if values.is_empty() {
        return Err(WifError::EmptyInput(combinator));
    }
    Ok(())
}
