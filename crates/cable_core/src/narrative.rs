//! Narrative state and prompt log types.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Who produced a prompt log line.
///
/// Unknown roles from the backend are preserved verbatim in [`LogRole::Other`].
///
/// # Examples
///
/// ```
/// use cable_core::LogRole;
///
/// assert_eq!(LogRole::from("visual_prompt".to_string()), LogRole::VisualPrompt);
/// assert_eq!(LogRole::from("system".to_string()).to_string(), "system");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(from = "String", into = "String")]
pub enum LogRole {
    /// Narrative prose returned by the model
    #[display("model")]
    Model,
    /// Cue submitted by the viewer or the auto-advance timer
    #[display("cue")]
    Cue,
    /// Request sent to the model
    #[display("prompt")]
    Prompt,
    /// Visual directive derived from the model reply
    #[display("visual_prompt")]
    VisualPrompt,
    /// Any other role
    #[display("{}", _0)]
    Other(String),
}

impl From<String> for LogRole {
    fn from(role: String) -> Self {
        match role.as_str() {
            "model" => Self::Model,
            "cue" => Self::Cue,
            "prompt" => Self::Prompt,
            "visual_prompt" => Self::VisualPrompt,
            _ => Self::Other(role),
        }
    }
}

impl From<LogRole> for String {
    fn from(role: LogRole) -> Self {
        role.to_string()
    }
}

/// One line of the append-only directive log.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct LogEntry {
    /// Unique id
    id: String,
    /// Producer of the line
    role: LogRole,
    /// Line content
    text: String,
    /// When the backend recorded the line
    timestamp: DateTime<Utc>,
}

impl LogEntry {
    /// Creates a log entry.
    pub fn new(
        id: impl Into<String>,
        role: LogRole,
        text: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            role,
            text: text.into(),
            timestamp,
        }
    }
}

/// The latest story snapshot delivered by the narrative backend.
///
/// Each arrival replaces the previous state wholesale; nothing is merged.
///
/// # Examples
///
/// ```
/// use cable_core::NarrativeStateBuilder;
///
/// let state = NarrativeStateBuilder::default()
///     .story_text("The camera glides through a neon corridor.".to_string())
///     .cues(vec!["run".to_string(), "hide".to_string()])
///     .visual_prompt(Some("neon city".to_string()))
///     .build()
///     .unwrap();
///
/// assert_eq!(state.recommended_cue(), Some("run"));
/// assert!(state.prompt_log().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Getters, Serialize, Deserialize, derive_builder::Builder)]
pub struct NarrativeState {
    /// Accumulated story prose
    #[builder(default)]
    #[serde(default)]
    story_text: String,

    /// Candidate next actions, first is recommended
    #[builder(default)]
    #[serde(default)]
    cues: Vec<String>,

    /// Directive for the live video pipeline
    #[builder(default)]
    #[serde(default)]
    visual_prompt: Option<String>,

    /// Backend's directive log, ascending by arrival
    #[builder(default)]
    #[serde(default)]
    prompt_log: Vec<LogEntry>,
}

impl NarrativeState {
    /// The cue displayed first.
    pub fn recommended_cue(&self) -> Option<&str> {
        self.cues.first().map(String::as_str)
    }

    /// The visual directive, ignoring blank strings.
    pub fn visual_directive(&self) -> Option<&str> {
        self.visual_prompt
            .as_deref()
            .map(str::trim)
            .filter(|prompt| !prompt.is_empty())
    }
}
