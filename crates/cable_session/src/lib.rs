//! Session orchestration for Cable.
//!
//! A [`SessionController`] turns a viewer's channel selection and cues into
//! narrative states, keeps the media stream in step with them, and drives the
//! countdown that submits a "continue" cue when the viewer is idle.
//!
//! # Architecture
//!
//! - [`SessionController`] owns session state and sequences the other parts
//! - [`StreamApplier`] decides between a parameter update and a new stream
//! - [`PipelineActivator`] normalizes settings and loads the pipeline
//! - [`ReadinessGate`] waits for model downloads
//! - [`CueScheduler`] counts down to the next automatic cue
//! - [`RecordingController`] assembles captured chunks into an artifact
//!
//! Collaborators are the traits in `cable_interface`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod activator;
mod applier;
mod config;
mod controller;
mod phase;
mod readiness;
mod recording;
mod scheduler;

pub use activator::{PipelineActivator, coerce_settings};
pub use applier::{StreamAction, StreamApplier};
pub use config::{PipelineConfig, RecordingConfig, SessionConfig};
pub use controller::{SessionController, SessionControllerBuilder};
pub use phase::{ActivationStage, Countdown, CueOrigin, SessionPhase, SessionView};
pub use readiness::ReadinessGate;
pub use recording::{RecordingController, RecordingStatus, recording_filename};
pub use scheduler::{CueScheduler, SchedulerPhase, Tick};
