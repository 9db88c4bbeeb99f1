//! Applies narrative states to the media stream.

use crate::{ActivationStage, PipelineActivator};
use cable_core::{NarrativeState, PromptParams};
use cable_error::CableResult;
use cable_interface::StreamTransport;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

/// What [`StreamApplier::apply`] did with a narrative state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum StreamAction {
    /// No visual directive; the stream was left alone
    #[display("skipped")]
    Skipped,
    /// The existing stream received new parameters
    #[display("updated")]
    Updated,
    /// A new stream was activated and opened
    #[display("opened")]
    Opened,
}

/// Turns a narrative state into a parameter update or a new stream.
///
/// Applications are serialized, so a second state waits until the first has
/// either updated the stream or finished opening it.
pub struct StreamApplier {
    activator: PipelineActivator,
    transport: Arc<dyn StreamTransport>,
    serial: Mutex<()>,
}

impl std::fmt::Debug for StreamApplier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamApplier")
            .field("activator", &self.activator)
            .field("stream", &self.transport.status())
            .finish_non_exhaustive()
    }
}

impl StreamApplier {
    /// Creates an applier.
    pub fn new(activator: PipelineActivator, transport: Arc<dyn StreamTransport>) -> Self {
        Self {
            activator,
            transport,
            serial: Mutex::new(()),
        }
    }

    /// The pipeline activator.
    pub fn activator(&self) -> &PipelineActivator {
        &self.activator
    }

    /// Applies `state`'s visual directive.
    ///
    /// A present stream, including one still negotiating, gets a parameter
    /// update. Otherwise the pipeline is activated and a stream opened.
    ///
    /// # Errors
    ///
    /// Propagates activation and transport failures.
    #[instrument(skip_all)]
    pub async fn apply<F>(&self, state: &NarrativeState, on_stage: F) -> CableResult<StreamAction>
    where
        F: Fn(ActivationStage) + Send + Sync,
    {
        let Some(prompt) = state.visual_directive() else {
            debug!("No visual directive, leaving stream unchanged");
            return Ok(StreamAction::Skipped);
        };

        let _serial = self.serial.lock().await;

        if self.transport.status().is_present() {
            debug!(prompt, "Updating stream prompt");
            self.transport
                .send_parameter_update(PromptParams::blend(prompt))
                .await?;
            return Ok(StreamAction::Updated);
        }

        let settings = self.activator.ensure_pipeline_ready(on_stage).await?;
        let steps = settings
            .denoising_steps
            .unwrap_or_else(|| self.activator.pipeline().denoising_steps().clone());

        self.transport
            .open(PromptParams::blend(prompt).with_activation(steps, true))
            .await?;
        info!(prompt, "Stream opened");
        Ok(StreamAction::Opened)
    }
}
