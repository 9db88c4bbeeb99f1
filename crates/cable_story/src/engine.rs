//! The story engine: channel catalog plus narrative backend.

use crate::{
    StoryModel, StoryRequest, StorySegment, StorySession, StoryTheme, builtin_themes,
    enrich_visual_prompt, mock_payload, parse_model_reply,
};
use async_trait::async_trait;
use cable_core::{LogRole, NarrativeState, Theme};
use cable_error::{
    BackendError, BackendErrorKind, CableResult, NotReadyError, NotReadyErrorKind,
};
use cable_interface::{NarrativeBackend, ThemeCatalog};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

const OPENING_CUE: &str = "Kick off the broadcast with an establishing shot.";
const DEFAULT_MAX_SEGMENTS: usize = 6;
const RECENT_BEATS: usize = 3;

/// Serves channels and drives one story session at a time.
///
/// Requests are serialized; a cue submitted while another is being written
/// waits for it.
pub struct StoryEngine {
    themes: Vec<StoryTheme>,
    model: Option<Arc<dyn StoryModel>>,
    max_segments: usize,
    session: Mutex<Option<StorySession>>,
}

impl Default for StoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl StoryEngine {
    /// Engine over the built-in channels with the offline fallback only.
    pub fn new() -> Self {
        warn!("No story model configured. Falling back to deterministic mock responses.");
        Self {
            themes: builtin_themes(),
            model: None,
            max_segments: DEFAULT_MAX_SEGMENTS,
            session: Mutex::new(None),
        }
    }

    /// Engine backed by a model, with the offline fallback on model failure.
    pub fn with_model(model: Arc<dyn StoryModel>) -> Self {
        Self {
            themes: builtin_themes(),
            model: Some(model),
            max_segments: DEFAULT_MAX_SEGMENTS,
            session: Mutex::new(None),
        }
    }

    /// Replaces the channel list.
    pub fn with_themes(mut self, themes: Vec<StoryTheme>) -> Self {
        self.themes = themes;
        self
    }

    /// Caps the retained story history.
    pub fn with_max_segments(mut self, max_segments: usize) -> Self {
        self.max_segments = max_segments.max(1);
        self
    }

    /// State of the running session, if any.
    pub async fn current_state(&self) -> Option<NarrativeState> {
        self.session.lock().await.as_ref().map(StorySession::to_state)
    }

    fn resolve_theme(&self, theme_id: &str) -> CableResult<StoryTheme> {
        self.themes
            .iter()
            .find(|theme| theme.theme().id() == theme_id)
            .cloned()
            .ok_or_else(|| {
                BackendError::new(BackendErrorKind::UnknownTheme(theme_id.to_string())).into()
            })
    }

    async fn write_beat(&self, request: &StoryRequest) -> crate::StoryPayload {
        let theme = &request.theme;
        let Some(model) = &self.model else {
            return mock_payload(&request.cue, theme);
        };
        match model.complete(request).await {
            Ok(raw) => parse_model_reply(&raw, &request.cue, theme)
                .unwrap_or_else(|| mock_payload(&request.cue, theme)),
            Err(e) => {
                error!(error = %e, "Story generation failed");
                mock_payload(&request.cue, theme)
            }
        }
    }

    async fn advance(
        &self,
        session: &mut StorySession,
        cue: &str,
        opening: bool,
    ) -> NarrativeState {
        session.append_log(LogRole::Cue, cue);

        let request = StoryRequest {
            theme: session.theme().clone(),
            cue: cue.to_string(),
            opening,
            recent_beats: session.recent_beats(RECENT_BEATS),
            summary: session.summary().clone(),
            scene: session.scene().clone(),
        };
        session.append_log(LogRole::Prompt, request.to_string());

        let payload = self.write_beat(&request).await;
        let narrative = payload.narrative.trim().to_string();
        let raw_prompt = payload.visual_prompt.trim();
        let visual_prompt = enrich_visual_prompt(raw_prompt, session.theme().base_prompt());
        session.observe_scene(raw_prompt, &narrative);

        session.record(
            StorySegment::new(cue, narrative.clone(), visual_prompt.clone()),
            payload.action_cues,
        );
        session.truncate_history(self.max_segments);
        session.append_log(LogRole::Model, narrative);
        session.append_log(LogRole::VisualPrompt, visual_prompt);

        debug!(beats = session.segments().len(), "Story advanced");
        session.to_state()
    }
}

#[async_trait]
impl ThemeCatalog for StoryEngine {
    async fn list_themes(&self) -> CableResult<Vec<Theme>> {
        Ok(self.themes.iter().map(|theme| theme.theme().clone()).collect())
    }
}

#[async_trait]
impl NarrativeBackend for StoryEngine {
    #[instrument(skip(self))]
    async fn start_session(&self, theme_id: &str) -> CableResult<NarrativeState> {
        let mut guard = self.session.lock().await;
        let theme = self.resolve_theme(theme_id)?;
        let mut session = StorySession::new(theme);
        session.append_log(
            LogRole::Other("system".to_string()),
            format!(
                "Tuned into {} on Interdimensional Cable.",
                session.theme().theme().label()
            ),
        );
        info!("Story session started");

        let state = self.advance(&mut session, OPENING_CUE, true).await;
        *guard = Some(session);
        Ok(state)
    }

    #[instrument(skip(self))]
    async fn submit_cue(&self, text: &str) -> CableResult<NarrativeState> {
        let mut guard = self.session.lock().await;
        let Some(session) = guard.as_mut() else {
            return Err(NotReadyError::new(NotReadyErrorKind::NoSession).into());
        };
        Ok(self.advance(session, text, false).await)
    }
}
