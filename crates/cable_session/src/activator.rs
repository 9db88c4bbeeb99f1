//! Pipeline activation: settings coercion, readiness, load.

use crate::{ActivationStage, PipelineConfig, ReadinessGate};
use cable_core::{LoadParams, Resolution, SettingsStore, StreamSettings};
use cable_error::{BackendError, BackendErrorKind, CableResult};
use cable_interface::PipelineBackend;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Points shared settings at the configured pipeline.
///
/// Switching from another pipeline replaces its resolution, steps and seed
/// with ours. Staying on the same pipeline only fills absent values. The
/// `paused` flag and keys owned by other consumers are left alone.
///
/// # Example
///
/// ```
/// use cable_core::StreamSettings;
/// use cable_session::{PipelineConfig, coerce_settings};
///
/// let mut settings = StreamSettings::default();
/// settings.paused = true;
/// coerce_settings(&mut settings, &PipelineConfig::default());
/// assert_eq!(settings.pipeline_id, "longlive");
/// assert!(settings.manage_cache);
/// assert!(settings.paused);
/// ```
pub fn coerce_settings(settings: &mut StreamSettings, pipeline: &PipelineConfig) {
    let switching = settings.pipeline_id != *pipeline.pipeline_id();
    let resolution = Resolution::new(*pipeline.width(), *pipeline.height());

    if switching {
        settings.pipeline_id = pipeline.pipeline_id().clone();
        settings.resolution = Some(resolution);
        settings.denoising_steps = Some(pipeline.denoising_steps().clone());
        settings.seed = *pipeline.seed();
    } else {
        settings.resolution.get_or_insert(resolution);
        settings
            .denoising_steps
            .get_or_insert_with(|| pipeline.denoising_steps().clone());
    }
    settings.manage_cache = true;
}

/// Brings the configured pipeline to a loaded state.
#[derive(Clone)]
pub struct PipelineActivator {
    gate: ReadinessGate,
    backend: Arc<dyn PipelineBackend>,
    settings: SettingsStore,
    pipeline: PipelineConfig,
}

impl std::fmt::Debug for PipelineActivator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineActivator")
            .field("gate", &self.gate)
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}

impl PipelineActivator {
    /// Creates an activator.
    pub fn new(
        gate: ReadinessGate,
        backend: Arc<dyn PipelineBackend>,
        settings: SettingsStore,
        pipeline: PipelineConfig,
    ) -> Self {
        Self {
            gate,
            backend,
            settings,
            pipeline,
        }
    }

    /// The readiness gate.
    pub fn gate(&self) -> &ReadinessGate {
        &self.gate
    }

    /// The shared settings.
    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// The pipeline defaults.
    pub fn pipeline(&self) -> &PipelineConfig {
        &self.pipeline
    }

    /// Coerces and persists the shared settings.
    pub fn normalize(&self) -> StreamSettings {
        self.settings
            .update(|settings| coerce_settings(settings, &self.pipeline))
    }

    /// Normalizes settings, waits for models, then loads the pipeline.
    ///
    /// `on_stage` is told when each wait begins.
    ///
    /// # Errors
    ///
    /// Propagates readiness failures and load call errors. A load that
    /// reports failure becomes [`BackendErrorKind::PipelineLoad`].
    #[instrument(skip(self, on_stage), fields(pipeline_id = %self.pipeline.pipeline_id()))]
    pub async fn ensure_pipeline_ready<F>(&self, on_stage: F) -> CableResult<StreamSettings>
    where
        F: Fn(ActivationStage) + Send + Sync,
    {
        let settings = self.normalize();
        debug!(seed = settings.seed, "Settings normalized");

        on_stage(ActivationStage::AwaitingModels);
        self.gate.ensure_models_ready(&settings.pipeline_id).await?;

        on_stage(ActivationStage::AwaitingPipelineLoad);
        let resolution = settings.resolution.unwrap_or_else(|| {
            Resolution::new(*self.pipeline.width(), *self.pipeline.height())
        });
        let params = LoadParams {
            height: *resolution.height(),
            width: *resolution.width(),
            seed: settings.seed,
        };

        if !self.backend.load_pipeline(&settings.pipeline_id, params).await? {
            error!("Pipeline failed to load");
            return Err(
                BackendError::new(BackendErrorKind::PipelineLoad(settings.pipeline_id.clone()))
                    .into(),
            );
        }

        info!(width = params.width, height = params.height, "Pipeline loaded");
        Ok(settings)
    }
}
