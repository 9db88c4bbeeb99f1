//! Core data types for the Cable session orchestrator.
//!
//! This crate provides the data model shared by the orchestration core and its
//! collaborators: channels, narrative states, stream settings and capture types.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod capture;
mod narrative;
mod prompt;
mod settings;
mod telemetry;
mod theme;

pub use capture::{CaptureFormat, RecordingArtifact};
pub use narrative::{LogEntry, LogRole, NarrativeState, NarrativeStateBuilder};
pub use prompt::{
    InterpolationMethod, LoadParams, MAX_PROMPT_WEIGHT, ModelStatus, PromptParams,
    TransportStatus, WeightedPrompt,
};
pub use settings::{Resolution, SettingsStore, StreamSettings};
pub use telemetry::init_tracing;
pub use theme::{Theme, ThemeBuilder};
