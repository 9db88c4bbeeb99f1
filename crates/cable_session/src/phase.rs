//! Session lifecycle and the observable view.

use crate::RecordingStatus;
use cable_core::{NarrativeState, Theme, TransportStatus};
use serde::Serialize;

/// What an activating session is currently waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, derive_more::Display)]
pub enum ActivationStage {
    /// The opening narrative state
    #[display("awaiting narrative")]
    AwaitingNarrative,
    /// Model assets to finish downloading
    #[display("awaiting models")]
    AwaitingModels,
    /// The pipeline load call
    #[display("awaiting pipeline load")]
    AwaitingPipelineLoad,
}

/// Lifecycle of a viewing session.
///
/// Theme selection is refused while `Activating`, or while a stream exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, derive_more::Display)]
pub enum SessionPhase {
    /// No channel selected
    #[default]
    #[display("idle")]
    Idle,
    /// Bringing a channel up
    #[display("activating ({})", _0)]
    Activating(ActivationStage),
    /// A narrative state has been applied
    #[display("active")]
    Active,
}

impl SessionPhase {
    /// True while a theme change must be refused.
    pub fn is_activating(&self) -> bool {
        matches!(self, Self::Activating(_))
    }
}

/// Who asked for a cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, derive_more::Display)]
pub enum CueOrigin {
    /// The viewer
    #[display("manual")]
    Manual,
    /// The expired countdown
    #[display("auto")]
    Auto,
}

/// Countdown to the next automatic cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Countdown {
    /// Whole seconds left
    pub remaining: u32,
    /// Set when the countdown has expired at least once since the last reset
    pub pulse: bool,
}

/// Snapshot of everything a viewer-facing surface renders.
///
/// Published through [`crate::SessionController::subscribe`] after every
/// state change.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SessionView {
    /// Channels in display order
    pub themes: Vec<Theme>,
    /// Selected channel
    pub theme: Option<Theme>,
    /// Lifecycle phase
    pub phase: SessionPhase,
    /// Latest narrative state
    pub narrative: Option<NarrativeState>,
    /// Automatic cue countdown
    pub countdown: Countdown,
    /// Any activation step is in progress
    pub loading: bool,
    /// A cue submission is in flight
    pub submitting: bool,
    /// A model download is being waited on
    pub download_pending: bool,
    /// Transport signals
    pub stream: TransportStatus,
    /// Recording state
    pub recording: RecordingStatus,
    /// Last user-facing error or hint
    pub notice: Option<String>,
}
