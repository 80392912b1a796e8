//! Adapter between classifiers and machine-learning model backends.
//!
//! A backend only knows numeric rows. [`MlClassifier`] pulls the assigned
//! features out of each flow, widens them to `f64` and hands the whole burst
//! to the backend in a single call.

pub mod linear;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::classifiers::Classifier;
use crate::error::{Result, WifError};
use crate::storage::{ClfResult, FeatureId, FlowFeatures};

pub use linear::{LinearModel, LinearModelBackend};

/// Logical name used when a model document holds several models.
pub const DEFAULT_LOGICAL_NAME: &str = "trained_data";

/// A model that can be loaded from disk and evaluated on numeric rows.
pub trait MlBackend: Send {
    /// Load (or replace) the model. On failure the previous model stays active.
    fn load_model(&mut self, path: &Path, logical_name: &str) -> Result<()>;

    fn is_loaded(&self) -> bool;

    /// One result per row, in row order.
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<ClfResult>>;
}

/// A classifier backed by a model file that can be reloaded at runtime.
pub trait ModelClassifier: Classifier {
    fn model_path(&self) -> &Path;

    /// Name of the active model inside the model file.
    fn logical_name(&self) -> &str;

    /// Reload the model file. `None` keeps the current logical name.
    fn reload_model_from_disk(&mut self, logical_name: Option<&str>) -> Result<()>;

    fn is_loaded(&self) -> bool;
}

/// Classifier evaluating an [`MlBackend`] on the assigned numeric features.
#[derive(Debug)]
pub struct MlClassifier<B: MlBackend> {
    backend: B,
    model_path: PathBuf,
    logical_name: String,
    feature_ids: Vec<FeatureId>,
}

impl<B: MlBackend> MlClassifier<B> {
    /// Create the classifier and load the model right away.
    pub fn new(mut backend: B, model_path: impl Into<PathBuf>, logical_name: &str) -> Result<Self> {
        let model_path = model_path.into();
        backend.load_model(&model_path, logical_name)?;
        info!(path = %model_path.display(), logical_name, "model loaded");
        Ok(Self {
            backend,
            model_path,
            logical_name: logical_name.to_string(),
            feature_ids: Vec::new(),
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn extract_row(&self, flow: &FlowFeatures) -> Result<Vec<f64>> {
        self.feature_ids
            .iter()
            .map(|&id| flow.get_raw(id)?.as_f64())
            .collect()
    }
}

impl<B: MlBackend> Classifier for MlClassifier<B> {
    fn set_feature_source_ids(&mut self, ids: &[FeatureId]) {
        self.feature_ids = ids.to_vec();
    }

    fn feature_source_ids(&self) -> &[FeatureId] {
        &self.feature_ids
    }

    fn classify(&mut self, flow: &FlowFeatures) -> Result<ClfResult> {
        self.classify_burst(std::slice::from_ref(flow))?
            .pop()
            .ok_or_else(|| WifError::InvalidState("model returned no result".to_string()))
    }

    fn classify_burst(&mut self, flows: &[FlowFeatures]) -> Result<Vec<ClfResult>> {
        if !self.backend.is_loaded() {
            return Err(WifError::InvalidState("no model loaded".to_string()));
        }
        let rows = flows
            .iter()
            .map(|flow| self.extract_row(flow))
            .collect::<Result<Vec<_>>>()?;

        let results = self.backend.predict(&rows)?;
        if results.len() != rows.len() {
            return Err(WifError::InvalidState(format!(
                "model returned {} results for {} flows",
                results.len(),
                rows.len()
            )));
        }
        Ok(results)
    }
}

impl<B: MlBackend> ModelClassifier for MlClassifier<B> {
    fn model_path(&self) -> &Path {
        &self.model_path
    }

    fn logical_name(&self) -> &str {
        &self.logical_name
    }

    fn reload_model_from_disk(&mut self, logical_name: Option<&str>) -> Result<()> {
        let name = logical_name.unwrap_or(&self.logical_name).to_string();
        self.backend.load_model(&self.model_path, &name)?;
        info!(path = %self.model_path.display(), logical_name = %name, "model reloaded");
        self.logical_name = name;
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.backend.is_loaded()
    }
}
