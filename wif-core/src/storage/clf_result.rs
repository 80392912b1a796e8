//! Output of a classifier.

use serde::Serialize;

use crate::error::{Result, WifError};

/// Either a single score or a probability per class.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ClfResult {
    Scalar(f64),
    Probabilities(Vec<f64>),
}

impl ClfResult {
    pub fn as_scalar(&self) -> Result<f64> {
        match self {
            ClfResult::Scalar(value) => Ok(*value),
            ClfResult::Probabilities(_) => Err(WifError::TypeMismatch {
                expected: "scalar",
                found: "probabilities",
            }),
        }
    }

    pub fn as_probabilities(&self) -> Result<&[f64]> {
        match self {
            ClfResult::Probabilities(values) => Ok(values.as_slice()),
            ClfResult::Scalar(_) => Err(WifError::TypeMismatch {
                expected: "probabilities",
                found: "scalar",
            }),
        }
    }

    /// Index of the most probable class. A scalar has a single class.
    pub fn predicted_class(&self) -> usize {
        match self {
            ClfResult::Scalar(_) => 0,
            ClfResult::Probabilities(values) => values
                .iter()
                .enumerate()
                .fold((0, f64::NEG_INFINITY), |best, (i, &p)| {
                    if p > best.1 {
                        (i, p)
                    } else {
                        best
                    }
                })
                .0,
        }
    }
}

impl From<f64> for ClfResult {
    fn from(value: f64) -> Self {
        ClfResult::Scalar(value)
    }
}

impl From<Vec<f64>> for ClfResult {
    fn from(values: Vec<f64>) -> Self {
        ClfResult::Probabilities(values)
    }
}
