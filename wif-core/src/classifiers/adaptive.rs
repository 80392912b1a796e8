//! Model classifier that follows changes of its model file and reports every
//! classified flow.
//!
//! A background [`Timer`] polls a [`ChangeDetector`] and raises a
//! [`ReloadFlag`]. The flag is consumed at the start of the next burst, so the
//! model is only ever swapped between bursts, on the classifying thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use wif_clock::Clock;
use wif_fs::ChangeDetector;

use super::Classifier;
use crate::config::AdaptiveConfig;
use crate::error::{Result, WifError};
use crate::ml::ModelClassifier;
use crate::reporters::Reporter;
use crate::storage::{ClfResult, DataVariant, FeatureId, FlowFeatures};
use crate::utils::{Timer, TimerCallback};

/// Shared "model is obsolete" marker.
/// Cloning creates a new handle to the same flag.
#[derive(Debug, Clone, Default)]
pub struct ReloadFlag {
    flag: Arc<AtomicBool>,
}

impl ReloadFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_obsolete(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Clear the flag, returning whether it was set.
    pub fn take(&self) -> bool {
        self.flag.swap(false, Ordering::SeqCst)
    }
}

struct ModelWatch {
    detector: Box<dyn ChangeDetector>,
    flag: ReloadFlag,
}

impl TimerCallback for ModelWatch {
    fn on_tick(&mut self) {
        if self.detector.is_change_detected() {
            info!("model file changed, scheduling reload");
            self.flag.mark_obsolete();
        }
    }
}

/// Wraps a [`ModelClassifier`], reloads its model when the file changes and
/// sends each classified flow to a [`Reporter`].
///
/// Every flow produces one record:
/// own feature values, model feature values, the Unix time of the last model
/// load (`U64`) and finally the probability vector.
pub struct AdaptiveClassifier<M: ModelClassifier, R: Reporter, C: Clock> {
    model: M,
    reporter: R,
    clock: C,
    reload_flag: ReloadFlag,
    last_model_load: u64,
    feature_ids: Vec<FeatureId>,
    timer: Timer,
}

impl<M: ModelClassifier, R: Reporter, C: Clock> AdaptiveClassifier<M, R, C> {
    /// Start watching with `detector`, polled every `check_interval`.
    pub fn new(
        model: M,
        reporter: R,
        clock: C,
        detector: Box<dyn ChangeDetector>,
        check_interval: Duration,
    ) -> Result<Self> {
        let reload_flag = ReloadFlag::new();
        let watch = ModelWatch {
            detector,
            flag: reload_flag.clone(),
        };
        let mut timer = Timer::new(check_interval, Box::new(watch));
        timer.start()?;

        let last_model_load = clock.epoch_seconds();
        info!(
            path = %model.model_path().display(),
            check_interval_sec = check_interval.as_secs(),
            "adaptive classifier started"
        );

        Ok(Self {
            model,
            reporter,
            clock,
            reload_flag,
            last_model_load,
            feature_ids: Vec::new(),
            timer,
        })
    }

    /// Like [`new`](Self::new), switching the model to the configured
    /// logical name first if it differs.
    pub fn with_config(
        mut model: M,
        reporter: R,
        clock: C,
        detector: Box<dyn ChangeDetector>,
        config: &AdaptiveConfig,
    ) -> Result<Self> {
        if model.logical_name() != config.logical_name {
            model.reload_model_from_disk(Some(config.logical_name.as_str()))?;
        }
        Self::new(model, reporter, clock, detector, config.check_interval())
    }

    /// Request a reload before the next burst.
    pub fn mark_model_as_obsolete(&self) {
        self.reload_flag.mark_obsolete();
    }

    /// Handle to the reload flag, e.g. for an external trigger.
    pub fn reload_flag(&self) -> ReloadFlag {
        self.reload_flag.clone()
    }

    /// Unix seconds of the last successful model load.
    pub fn last_model_load_time(&self) -> u64 {
        self.last_model_load
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn flush(&mut self) -> Result<()> {
        self.reporter.flush()
    }

    /// Stop polling the model file. Classification keeps working.
    pub fn stop_watching(&mut self) {
        self.timer.cancel();
    }

    /// Reload if flagged. A failed reload is returned to the caller and the
    /// flag stays set, so the next burst tries again.
    fn handle_model_update(&mut self) -> Result<()> {
        if !self.reload_flag.take() {
            return Ok(());
        }
        if let Err(e) = self.model.reload_model_from_disk(None) {
            warn!(error = %e, "model reload failed");
            self.reload_flag.mark_obsolete();
            return Err(e);
        }
        self.last_model_load = self.clock.epoch_seconds();
        Ok(())
    }

    fn report_flow(&mut self, flow: &FlowFeatures, result: &ClfResult) -> Result<()> {
        let probabilities = result.as_probabilities()?.to_vec();

        // Every value is read before the record opens, so a bad flow never
        // leaves a half-written record behind.
        let features = self
            .feature_ids
            .iter()
            .chain(self.model.feature_source_ids())
            .map(|&id| flow.get_raw(id))
            .collect::<Result<Vec<&DataVariant>>>()?;

        self.reporter.on_record_start()?;
        for value in features {
            self.reporter.report(value)?;
        }
        self.reporter.report(&DataVariant::U64(self.last_model_load))?;
        self.reporter.report(&DataVariant::DoubleVec(probabilities))?;
        self.reporter.on_record_end()
    }
}

impl<M: ModelClassifier, R: Reporter, C: Clock> Classifier for AdaptiveClassifier<M, R, C> {
    /// Identification features. They are reported but not classified.
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
        self.handle_model_update()?;

        let results = self.model.classify_burst(flows)?;
        for (flow, result) in flows.iter().zip(&results) {
            self.report_flow(flow, result)?;
        }
        Ok(results)
    }
}

impl<M: ModelClassifier, R: Reporter, C: Clock> std::fmt::Debug for AdaptiveClassifier<M, R, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdaptiveClassifier")
            .field("model_path", &self.model.model_path())
            .field("last_model_load", &self.last_model_load)
            .field("feature_ids", &self.feature_ids)
            .field("timer", &self.timer)
            .finish()
    }
}
