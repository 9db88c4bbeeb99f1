//! Local narrative backend for Cable.
//!
//! [`StoryEngine`] serves the built-in channel catalog and keeps one story
//! session at a time: segment history with a rolling summary, an append-only
//! prompt log, scene continuity, and structured requests to an optional
//! [`StoryModel`]. Visual directives are enriched for the video model. Without
//! a model (or when the model misbehaves) it produces deterministic payloads
//! seeded by cue and channel, so a session can run fully offline.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod engine;
mod model;
mod session;
mod themes;

pub use engine::StoryEngine;
pub use model::{
    StoryModel, StoryPayload, StoryRequest, enrich_visual_prompt, mock_payload,
    parse_model_reply,
};
pub use session::{SceneContinuity, StorySegment, StorySession};
pub use themes::{DEFAULT_CUES, StoryTheme, builtin_themes};
