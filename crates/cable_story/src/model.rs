//! Story model seam, reply parsing and the offline fallback.

use crate::{DEFAULT_CUES, SceneContinuity, StoryTheme};
use async_trait::async_trait;
use cable_error::CableResult;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use regex::Regex;
use serde::Deserialize;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;
use tracing::warn;

const CINEMATIC_KEYWORDS: [&str; 4] = ["cinematic", "volumetric", "depth of field", "lighting"];
const CINEMATIC_SUFFIX: &str =
    ", cinematic composition with volumetric lighting and shallow depth of field";
const QUALITY_SUFFIX: &str = ", highly detailed, 4K quality";
const SPARSE_PROMPT_CHARS: usize = 100;
const MAX_PROMPT_CHARS: usize = 300;

static FENCED_JSON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json)?(.*?)```").expect("Valid fenced JSON regex")
});

/// Everything a model needs to write the next beat.
#[derive(Debug, Clone)]
pub struct StoryRequest {
    /// Channel the story runs on
    pub theme: StoryTheme,
    /// Cue to honour
    pub cue: String,
    /// True for the establishing shot of a new broadcast
    pub opening: bool,
    /// Up to three most recent narrative beats, oldest first
    pub recent_beats: Vec<String>,
    /// Condensed memory of older beats
    pub summary: String,
    /// Subjects, location and style carried over from earlier beats
    pub scene: SceneContinuity,
}

impl fmt::Display for StoryRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = if self.opening { "open" } else { "continue" };
        writeln!(f, "[{}] {} / cue: {}", mode, self.theme.theme().label(), self.cue)?;
        if !self.summary.is_empty() {
            writeln!(f, "summary: {}", self.summary)?;
        }
        if !self.opening {
            if !self.scene.subjects().is_empty() {
                writeln!(f, "subjects: {}", self.scene.subjects().join(", "))?;
            }
            if !self.scene.location().is_empty() {
                writeln!(f, "location: {}", self.scene.location())?;
            }
            if !self.scene.style().is_empty() {
                writeln!(f, "style: {}", self.scene.style())?;
            }
        }
        for beat in &self.recent_beats {
            writeln!(f, "- {}", beat)?;
        }
        Ok(())
    }
}

/// A language model that writes story beats.
///
/// Implementations own their prompt wording and return the raw reply, which is
/// expected to carry a JSON object with `narrative`, `visual_prompt` and
/// `action_cues` keys, optionally inside a fenced code block.
#[async_trait]
pub trait StoryModel: Send + Sync {
    /// Produces the raw reply for a request.
    async fn complete(&self, request: &StoryRequest) -> CableResult<String>;
}

/// A parsed story beat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryPayload {
    /// Narrative prose
    pub narrative: String,
    /// Visual directive
    pub visual_prompt: String,
    /// Exactly four next actions
    pub action_cues: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawReply {
    #[serde(default)]
    narrative: Option<String>,
    #[serde(default)]
    story: Option<String>,
    #[serde(default)]
    visual_prompt: Option<String>,
    #[serde(default)]
    action_cues: Vec<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn pad_cues(mut cues: Vec<String>) -> Vec<String> {
    cues.retain(|cue| !cue.trim().is_empty());
    cues.extend(DEFAULT_CUES.iter().map(|cue| cue.to_string()));
    cues.truncate(DEFAULT_CUES.len());
    cues
}

/// Parses a model reply, returning `None` when it holds no JSON object.
///
/// Missing fields fall back to the cue (narrative), the channel base prompt
/// (visual prompt) and [`DEFAULT_CUES`] (padding to four cues).
///
/// # Examples
///
/// ```
/// let theme = cable_story::builtin_themes().remove(0);
/// let reply = "```json\n{\"narrative\": \"Woody waves.\", \"action_cues\": [\"Wave back\"]}\n```";
/// let payload = cable_story::parse_model_reply(reply, "Say hi", &theme).unwrap();
///
/// assert_eq!(payload.narrative, "Woody waves.");
/// assert_eq!(payload.visual_prompt, *theme.base_prompt());
/// assert_eq!(payload.action_cues.len(), 4);
/// assert_eq!(payload.action_cues[0], "Wave back");
/// ```
pub fn parse_model_reply(raw: &str, cue: &str, theme: &StoryTheme) -> Option<StoryPayload> {
    let candidate = FENCED_JSON
        .captures(raw)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
        .unwrap_or(raw);

    let reply: RawReply = match serde_json::from_str(candidate.trim()) {
        Ok(reply) => reply,
        Err(e) => {
            warn!(error = %e, payload = %raw, "Failed to parse model JSON");
            return None;
        }
    };

    Some(StoryPayload {
        narrative: non_blank(reply.narrative)
            .or_else(|| non_blank(reply.story))
            .unwrap_or_else(|| cue.to_string()),
        visual_prompt: non_blank(reply.visual_prompt)
            .unwrap_or_else(|| theme.base_prompt().clone()),
        action_cues: pad_cues(reply.action_cues),
    })
}

/// Tunes a raw visual directive for the video model.
///
/// Adds cinematic phrasing when none is present, appends the channel base
/// prompt to sparse directives (under 100 characters), tags quality unless a
/// 4K/8K tag exists, and caps the result at 300 characters.
///
/// # Examples
///
/// ```
/// let prompt = cable_story::enrich_visual_prompt("neon city", "brick universe");
/// assert_eq!(
///     prompt,
///     "neon city, cinematic composition with volumetric lighting and shallow depth of field. \
///      brick universe, highly detailed, 4K quality"
/// );
/// ```
pub fn enrich_visual_prompt(prompt: &str, base_prompt: &str) -> String {
    let mut enriched = prompt.to_string();

    let lower = enriched.to_lowercase();
    if !CINEMATIC_KEYWORDS.iter().any(|keyword| lower.contains(keyword)) {
        enriched.push_str(CINEMATIC_SUFFIX);
    }

    if !base_prompt.is_empty() && enriched.chars().count() < SPARSE_PROMPT_CHARS {
        enriched = format!("{}. {}", enriched, base_prompt);
    }

    let lower = enriched.to_lowercase();
    if !lower.contains("4k") && !lower.contains("8k") {
        enriched.push_str(QUALITY_SUFFIX);
    }

    enriched.chars().take(MAX_PROMPT_CHARS).collect()
}

/// Deterministic beat seeded by cue and channel id.
///
/// # Examples
///
/// ```
/// let theme = cable_story::builtin_themes().remove(1);
/// let a = cable_story::mock_payload("Switch camera angle", &theme);
/// let b = cable_story::mock_payload("Switch camera angle", &theme);
/// assert_eq!(a, b);
/// assert!(a.visual_prompt.starts_with(theme.base_prompt()));
/// ```
pub fn mock_payload(cue: &str, theme: &StoryTheme) -> StoryPayload {
    const VERBS: [&str; 6] = ["glides", "sparks", "warps", "vibrates", "orbits", "sprouts"];
    const ADJECTIVES: [&str; 6] = ["neon", "lofi", "crystalline", "anodized", "dreamy", "chaotic"];

    let mut hasher = DefaultHasher::new();
    format!("{}-{}", cue, theme.theme().id()).hash(&mut hasher);
    let mut rng = StdRng::seed_from_u64(hasher.finish());

    let verb = VERBS.choose(&mut rng).copied().unwrap_or(VERBS[0]);
    let adjective = ADJECTIVES.choose(&mut rng).copied().unwrap_or(ADJECTIVES[0]);
    let mut action_cues: Vec<String> = DEFAULT_CUES.iter().map(|c| c.to_string()).collect();
    action_cues.shuffle(&mut rng);

    StoryPayload {
        narrative: format!(
            "The camera {} through a {} corridor as the cue '{}' reverberates across the {} channel.",
            verb,
            adjective,
            cue,
            theme.theme().label()
        ),
        visual_prompt: format!("{} // inspired by cue: {}", theme.base_prompt(), cue),
        action_cues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin_themes;

    #[test]
    fn unfenced_reply_parses() {
        let theme = builtin_themes().remove(2);
        let reply = r#"{"story": "Steve digs down.", "visual_prompt": "voxel cave", "action_cues": ["a","b","c","d","e"]}"#;
        let payload = parse_model_reply(reply, "Dig", &theme).unwrap();
        assert_eq!(payload.narrative, "Steve digs down.");
        assert_eq!(payload.visual_prompt, "voxel cave");
        assert_eq!(payload.action_cues, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn prose_reply_is_rejected() {
        let theme = builtin_themes().remove(0);
        assert!(parse_model_reply("Once upon a time...", "Go", &theme).is_none());
    }

    #[test]
    fn blank_narrative_falls_back_to_cue() {
        let theme = builtin_themes().remove(0);
        let payload = parse_model_reply(r#"{"narrative": "  "}"#, "Jump", &theme).unwrap();
        assert_eq!(payload.narrative, "Jump");
        assert_eq!(payload.action_cues.len(), 4);
    }

    #[test]
    fn rich_directive_only_gains_a_quality_tag() {
        let prompt = "Woody rides a rocket through the toy room, tracking shot, warm lighting, \
                      dust motes drifting past the camera as the toys cheer from the shelves";
        assert!(prompt.chars().count() >= SPARSE_PROMPT_CHARS);
        assert_eq!(
            enrich_visual_prompt(prompt, "Pixar style"),
            format!("{}{}", prompt, QUALITY_SUFFIX)
        );
    }

    #[test]
    fn existing_resolution_tag_is_kept() {
        let prompt = enrich_visual_prompt("Volumetric fog over a castle in 8K", "");
        assert_eq!(prompt, "Volumetric fog over a castle in 8K");
    }

    #[test]
    fn enriched_directive_is_capped() {
        let long = "cinematic ".repeat(40);
        let prompt = enrich_visual_prompt(&long, "ignored");
        assert_eq!(prompt.chars().count(), MAX_PROMPT_CHARS);
        assert!(!prompt.contains("4K quality"));
    }

    #[test]
    fn continuity_is_shared_only_when_continuing() {
        let mut scene = SceneContinuity::default();
        scene.observe("a robot in the ship", "");
        let mut request = StoryRequest {
            theme: builtin_themes().remove(0),
            cue: "Go".to_string(),
            opening: true,
            recent_beats: Vec::new(),
            summary: String::new(),
            scene,
        };
        assert!(!request.to_string().contains("subjects"));

        request.opening = false;
        let text = request.to_string();
        assert!(text.contains("subjects: robot"));
        assert!(text.contains("location: ship"));
    }

    #[test]
    fn mock_cues_are_a_permutation_of_defaults() {
        let theme = builtin_themes().remove(0);
        let mut cues = mock_payload("Trigger a cosmic glitch", &theme).action_cues;
        cues.sort();
        let mut expected: Vec<String> = DEFAULT_CUES.iter().map(|c| c.to_string()).collect();
        expected.sort();
        assert_eq!(cues, expected);
    }
}
