//! Pure-Rust linear model backend.
//!
//! A model document is a JSON object mapping logical names to models:
//!
//! ```json
//! {
//!   "trained_data": {
//!     "weights": [[0.5, -1.0], [-0.5, 1.0]],
//!     "bias": [0.0, 0.1]
//!   }
//! }
//! ```
//!
//! `weights[class][feature]` and `bias[class]`. With several classes the
//! output is the softmax over the class scores. A single-class model is a
//! logistic regression and yields `[1 - p, p]`.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;
use wif_fs::Filesystem;

use super::MlBackend;
use crate::error::{Result, WifError};
use crate::storage::ClfResult;

/// Weights and biases of one linear model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
}

impl LinearModel {
    pub fn num_classes(&self) -> usize {
        self.weights.len()
    }

    pub fn num_features(&self) -> usize {
        self.weights.first().map_or(0, Vec::len)
    }

    fn validate(&self) -> Result<()> {
        if self.weights.is_empty() {
            return Err(WifError::ModelLoad("model has no classes".to_string()));
        }
        if self.bias.len() != self.weights.len() {
            return Err(WifError::ModelLoad(format!(
                "model has {} weight rows but {} biases",
                self.weights.len(),
                self.bias.len()
            )));
        }
        let features = self.num_features();
        if self.weights.iter().any(|row| row.len() != features) {
            return Err(WifError::ModelLoad(
                "weight rows differ in length".to_string(),
            ));
        }
        Ok(())
    }

    fn scores(&self, row: &[f64]) -> Vec<f64> {
        self.weights
            .iter()
            .zip(&self.bias)
            .map(|(weights, bias)| weights.iter().zip(row).map(|(w, x)| w * x).sum::<f64>() + bias)
            .collect()
    }

    /// Class probabilities for one row.
    pub fn predict_row(&self, row: &[f64]) -> Result<Vec<f64>> {
        if row.len() != self.num_features() {
            return Err(WifError::InvalidArgument(format!(
                "model expects {} features, got {}",
                self.num_features(),
                row.len()
            )));
        }

        let scores = self.scores(row);
        if let [score] = scores.as_slice() {
            let p = 1.0 / (1.0 + (-*score).exp());
            return Ok(vec![1.0 - p, p]);
        }

        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
        let total: f64 = exps.iter().sum();
        Ok(exps.into_iter().map(|e| e / total).collect())
    }
}

/// Backend reading [`LinearModel`] documents through a [`Filesystem`].
#[derive(Debug)]
pub struct LinearModelBackend<F: Filesystem> {
    fs: F,
    model: Option<LinearModel>,
}

impl<F: Filesystem> LinearModelBackend<F> {
    pub fn new(fs: F) -> Self {
        Self { fs, model: None }
    }

    pub fn model(&self) -> Option<&LinearModel> {
        self.model.as_ref()
    }
}

impl<F: Filesystem> MlBackend for LinearModelBackend<F> {
    fn load_model(&mut self, path: &Path, logical_name: &str) -> Result<()> {
        let content = self.fs.read_file(path)?;
        let mut document: HashMap<String, LinearModel> = serde_json::from_str(&content)?;
        let model = document.remove(logical_name).ok_or_else(|| {
            WifError::ModelLoad(format!(
                "no model named '{}' in {}",
                logical_name,
                path.display()
            ))
        })?;
        model.validate()?;

        debug!(
            classes = model.num_classes(),
            features = model.num_features(),
            "linear model parsed"
        );
        self.model = Some(model);
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<ClfResult>> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| WifError::InvalidState("no model loaded".to_string()))?;
        rows.iter()
            .map(|row| model.predict_row(row).map(ClfResult::Probabilities))
            .collect()
    }
}
