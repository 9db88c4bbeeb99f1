//! Interdimensional Cable: AI-directed live narrative video.
//!
//! A viewer picks a channel, a narrative backend writes the story beat by
//! beat, and each beat's visual directive steers a real-time video
//! generation pipeline. Idle viewers get a "continue" cue on a fixed
//! countdown; the live stream can be recorded to a single file.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use cable::{
//!     CueOrigin, InMemoryPipeline, InMemoryTransport, SessionConfig, SessionController,
//!     StoryEngine,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = Arc::new(StoryEngine::new());
//!     let controller = SessionController::builder()
//!         .config(SessionConfig::load()?)
//!         .catalog(engine.clone())
//!         .narrative(engine)
//!         .pipeline(Arc::new(InMemoryPipeline::new()))
//!         .transport(Arc::new(InMemoryTransport::new()))
//!         .build()?;
//!
//!     controller.boot().await;
//!     controller.select_theme_by_id("lego_flux").await?;
//!     controller.submit_cue("Build a bridge", CueOrigin::Manual).await?;
//!     controller.stop().await;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `cable_error` - Error types
//! - `cable_core` - Shared data types and tracing setup
//! - `cable_interface` - Collaborator traits and in-process adapters
//! - `cable_story` - Local narrative backend and channel catalog
//! - `cable_session` - Session orchestration
//!
//! This crate re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub use cable_error::{
    BackendError, BackendErrorKind, CableError, CableErrorKind, CableResult, ConfigError,
    EmptyResultError, NotReadyError, NotReadyErrorKind, TimedOutError,
    UnsupportedCapabilityError,
};

pub use cable_core::{
    CaptureFormat, InterpolationMethod, LoadParams, LogEntry, LogRole, MAX_PROMPT_WEIGHT,
    ModelStatus, NarrativeState, NarrativeStateBuilder, PromptParams, RecordingArtifact,
    Resolution, SettingsStore, StreamSettings, Theme, ThemeBuilder, TransportStatus,
    WeightedPrompt, init_tracing,
};

pub use cable_interface::{
    ArtifactSink, FileArtifactSink, InMemoryPipeline, InMemoryTransport, MediaCapture,
    NarrativeBackend, NullCapture, PipelineBackend, StreamTransport, ThemeCatalog,
};

pub use cable_story::{
    DEFAULT_CUES, StoryEngine, StoryModel, StoryPayload, StoryRequest, StorySegment,
    StorySession, StoryTheme, builtin_themes,
};

pub use cable_session::{
    ActivationStage, Countdown, CueOrigin, CueScheduler, PipelineActivator, PipelineConfig,
    ReadinessGate, RecordingConfig, RecordingController, RecordingStatus, SessionConfig,
    SessionController, SessionControllerBuilder, SessionPhase, SessionView, StreamAction,
    StreamApplier, coerce_settings, recording_filename,
};
