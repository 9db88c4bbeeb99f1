//! Per-broadcast story memory.

use crate::{DEFAULT_CUES, StoryTheme};
use cable_core::{LogEntry, LogRole, NarrativeState, NarrativeStateBuilder};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use tracing::debug;

/// One beat of the story.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct StorySegment {
    /// Cue that produced the beat
    cue: String,
    /// Narrative prose
    narrative: String,
    /// Visual directive sent with the beat
    visual_prompt: String,
    /// When the beat was written
    timestamp: DateTime<Utc>,
}

impl StorySegment {
    /// Creates a segment stamped now.
    pub fn new(
        cue: impl Into<String>,
        narrative: impl Into<String>,
        visual_prompt: impl Into<String>,
    ) -> Self {
        Self {
            cue: cue.into(),
            narrative: narrative.into(),
            visual_prompt: visual_prompt.into(),
            timestamp: Utc::now(),
        }
    }
}

const SUBJECT_HINTS: [&str; 8] = [
    "character",
    "person",
    "figure",
    "hero",
    "protagonist",
    "robot",
    "alien",
    "creature",
];
const LOCATION_HINTS: [&str; 9] = [
    "room", "corridor", "space", "chamber", "hall", "landscape", "city", "planet", "ship",
];
const STYLE_HINTS: [&str; 7] = ["neon", "dark", "bright", "foggy", "misty", "ethereal", "dramatic"];
const MAX_SUBJECTS: usize = 3;
const MAX_STYLES: usize = 2;

/// Who, where and how the scene looks, carried from beat to beat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters)]
pub struct SceneContinuity {
    /// Up to three recent subjects, oldest first
    subjects: Vec<String>,
    /// Most recently seen setting; empty until one appears
    location: String,
    /// Up to two style words from the latest beat that had any
    style: String,
}

impl SceneContinuity {
    /// Folds a beat's raw visual directive and narrative into the scene.
    ///
    /// # Examples
    ///
    /// ```
    /// use cable_story::SceneContinuity;
    ///
    /// let mut scene = SceneContinuity::default();
    /// scene.observe("A robot strides down a neon corridor", "The hero follows.");
    /// assert_eq!(scene.subjects(), &["hero", "robot"]);
    /// assert_eq!(scene.location(), "corridor");
    /// assert_eq!(scene.style(), "neon");
    /// ```
    pub fn observe(&mut self, visual_prompt: &str, narrative: &str) {
        let combined = format!("{} {}", visual_prompt, narrative).to_lowercase();

        for hint in SUBJECT_HINTS {
            if combined.contains(hint) && !self.subjects.iter().any(|s| s == hint) {
                self.subjects.push(hint.to_string());
            }
        }
        let excess = self.subjects.len().saturating_sub(MAX_SUBJECTS);
        self.subjects.drain(..excess);

        if let Some(location) = LOCATION_HINTS.iter().find(|hint| combined.contains(*hint)) {
            self.location = location.to_string();
        }

        let styles: Vec<&str> = STYLE_HINTS
            .iter()
            .copied()
            .filter(|hint| combined.contains(hint))
            .take(MAX_STYLES)
            .collect();
        if !styles.is_empty() {
            self.style = styles.join(", ");
        }
    }
}

/// Story memory for a single broadcast.
#[derive(Debug, Clone, Getters)]
pub struct StorySession {
    theme: StoryTheme,
    segments: Vec<StorySegment>,
    prompt_log: Vec<LogEntry>,
    summary: String,
    last_visual_prompt: String,
    last_cues: Vec<String>,
    scene: SceneContinuity,
}

impl StorySession {
    /// Opens an empty session on a channel.
    pub fn new(theme: StoryTheme) -> Self {
        Self {
            theme,
            segments: Vec::new(),
            prompt_log: Vec::new(),
            summary: String::new(),
            last_visual_prompt: String::new(),
            last_cues: DEFAULT_CUES.iter().map(|cue| cue.to_string()).collect(),
            scene: SceneContinuity::default(),
        }
    }

    /// Appends a line to the prompt log.
    pub fn append_log(&mut self, role: LogRole, text: impl Into<String>) {
        let now = Utc::now();
        let id = format!("{}-{}", now.timestamp_millis(), self.prompt_log.len());
        self.prompt_log.push(LogEntry::new(id, role, text, now));
    }

    /// Narratives of the last `n` beats, oldest first.
    pub fn recent_beats(&self, n: usize) -> Vec<String> {
        let start = self.segments.len().saturating_sub(n);
        self.segments[start..]
            .iter()
            .map(|segment| segment.narrative.clone())
            .collect()
    }

    /// Records a beat and the cues offered after it.
    pub fn record(&mut self, segment: StorySegment, cues: Vec<String>) {
        self.last_visual_prompt = segment.visual_prompt.clone();
        self.last_cues = cues;
        self.segments.push(segment);
    }

    /// Updates scene continuity from a beat's raw directive and narrative.
    pub fn observe_scene(&mut self, visual_prompt: &str, narrative: &str) {
        self.scene.observe(visual_prompt, narrative);
        debug!(
            subjects = ?self.scene.subjects,
            location = %self.scene.location,
            style = %self.scene.style,
            "Scene continuity updated"
        );
    }

    /// All narratives joined by blank lines.
    pub fn story_text(&self) -> String {
        self.segments
            .iter()
            .map(|segment| segment.narrative.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
            .trim()
            .to_string()
    }

    /// Keeps at most `max_segments` beats and refreshes the rolling summary.
    ///
    /// When trimming, the summary covers the retained beats except the two
    /// newest, which are passed to the model verbatim anyway.
    pub fn truncate_history(&mut self, max_segments: usize) {
        if self.segments.len() <= max_segments {
            self.summary = self.story_text();
            return;
        }
        let excess = self.segments.len() - max_segments;
        self.segments.drain(..excess);
        let summarized = self.segments.len().saturating_sub(2);
        self.summary = self.segments[..summarized]
            .iter()
            .map(|segment| segment.narrative.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        debug!(dropped = excess, kept = self.segments.len(), "Trimmed story history");
    }

    /// Snapshot handed to the orchestrator.
    pub fn to_state(&self) -> NarrativeState {
        let visual_prompt = if self.last_visual_prompt.is_empty() {
            self.theme.base_prompt().clone()
        } else {
            self.last_visual_prompt.clone()
        };
        NarrativeStateBuilder::default()
            .story_text(self.story_text())
            .cues(self.last_cues.clone())
            .visual_prompt(Some(visual_prompt))
            .prompt_log(self.prompt_log.clone())
            .build()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin_themes;

    fn session_with(beats: usize) -> StorySession {
        let mut session = StorySession::new(builtin_themes().remove(0));
        for i in 0..beats {
            session.record(
                StorySegment::new(format!("cue {i}"), format!("beat {i}"), format!("frame {i}")),
                vec![],
            );
        }
        session
    }

    #[test]
    fn short_history_summary_is_full_text() {
        let mut session = session_with(2);
        session.truncate_history(6);
        assert_eq!(session.summary(), "beat 0\n\nbeat 1");
    }

    #[test]
    fn long_history_is_trimmed_to_newest() {
        let mut session = session_with(8);
        session.truncate_history(6);
        assert_eq!(session.segments().len(), 6);
        assert_eq!(session.segments()[0].narrative(), "beat 2");
        assert_eq!(session.summary(), "beat 2 beat 3 beat 4 beat 5");
        assert_eq!(session.recent_beats(3), vec!["beat 5", "beat 6", "beat 7"]);
    }

    #[test]
    fn log_ids_are_unique_and_ordered() {
        let mut session = session_with(0);
        session.append_log(LogRole::Cue, "first");
        session.append_log(LogRole::Model, "second");
        let log = session.prompt_log();
        assert_ne!(log[0].id(), log[1].id());
        assert!(log[0].id().ends_with("-0"));
        assert_eq!(log[1].role(), &LogRole::Model);
    }

    #[test]
    fn subjects_keep_the_three_newest() {
        let mut scene = SceneContinuity::default();
        scene.observe("a character and a person", "");
        scene.observe("a hero meets a robot", "an alien watches");
        assert_eq!(scene.subjects(), &["hero", "robot", "alien"]);

        // Already tracked subjects are not repeated.
        scene.observe("the robot again", "");
        assert_eq!(scene.subjects(), &["hero", "robot", "alien"]);
    }

    #[test]
    fn location_and_style_persist_until_replaced() {
        let mut scene = SceneContinuity::default();
        scene.observe("Foggy planet surface, dramatic misty dawn", "");
        assert_eq!(scene.location(), "planet");
        assert_eq!(scene.style(), "foggy, misty");

        scene.observe("close-up of a face", "She smiles.");
        assert_eq!(scene.location(), "planet");
        assert_eq!(scene.style(), "foggy, misty");

        scene.observe("bright city skyline", "");
        assert_eq!(scene.location(), "city");
        assert_eq!(scene.style(), "bright");
    }

    #[test]
    fn fresh_session_state_uses_base_prompt() {
        let session = session_with(0);
        let state = session.to_state();
        assert_eq!(state.visual_prompt().as_deref(), Some(session.theme().base_prompt().as_str()));
        assert_eq!(state.cues().len(), 4);
    }
}
