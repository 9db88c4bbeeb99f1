//! Trait definitions for the external collaborators of a session.

use async_trait::async_trait;
use cable_core::{
    CaptureFormat, LoadParams, ModelStatus, NarrativeState, PromptParams, RecordingArtifact,
    Theme, TransportStatus,
};
use cable_error::CableResult;

/// Source of the selectable channels.
#[async_trait]
pub trait ThemeCatalog: Send + Sync {
    /// Channels in display order.
    async fn list_themes(&self) -> CableResult<Vec<Theme>>;
}

/// The narrative-generation service.
///
/// A failed call must leave no observable effect on the session.
#[async_trait]
pub trait NarrativeBackend: Send + Sync {
    /// Opens a new story for the channel and returns its first state.
    async fn start_session(&self, theme_id: &str) -> CableResult<NarrativeState>;

    /// Advances the current story with a cue.
    async fn submit_cue(&self, text: &str) -> CableResult<NarrativeState>;
}

/// Model-download and pipeline-loading service.
#[async_trait]
pub trait PipelineBackend: Send + Sync {
    /// Reports whether the pipeline's assets are present.
    async fn check_status(&self, pipeline_id: &str) -> CableResult<ModelStatus>;

    /// Starts fetching the pipeline's assets.
    async fn trigger_download(&self, pipeline_id: &str) -> CableResult<()>;

    /// Loads the pipeline; `false` means the load failed.
    async fn load_pipeline(&self, pipeline_id: &str, params: LoadParams) -> CableResult<bool>;
}

/// Opaque real-time media channel.
#[async_trait]
pub trait StreamTransport: Send + Sync {
    /// Negotiates a new stream with initial parameters.
    async fn open(&self, params: PromptParams) -> CableResult<()>;

    /// Pushes new parameters to the open stream without renegotiating.
    async fn send_parameter_update(&self, params: PromptParams) -> CableResult<()>;

    /// Tears the stream down. Closing a closed transport is a no-op.
    async fn close(&self) -> CableResult<()>;

    /// Current reactive signals.
    fn status(&self) -> TransportStatus;
}

/// Captures the attached media stream into data chunks.
///
/// Chunks emitted while capturing are fed to the recording controller by the
/// media layer; the final pending chunk is returned from [`MediaCapture::finish`].
#[async_trait]
pub trait MediaCapture: Send + Sync {
    /// Whether the format can be recorded.
    fn supports(&self, format: &CaptureFormat) -> bool;

    /// Starts capturing with the given format.
    async fn begin(&self, format: &CaptureFormat) -> CableResult<()>;

    /// Stops capturing and flushes the last pending chunk, if any.
    async fn finish(&self) -> CableResult<Option<Vec<u8>>>;
}

/// Delivers a finalized recording to the viewer.
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// Persists or hands off the artifact.
    async fn deliver(&self, artifact: &RecordingArtifact) -> CableResult<()>;
}
