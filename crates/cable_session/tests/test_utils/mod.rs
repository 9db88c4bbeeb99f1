//! Mock collaborators for session tests.

#![allow(dead_code)]

use async_trait::async_trait;
use cable_core::{
    CaptureFormat, LoadParams, ModelStatus, NarrativeState, NarrativeStateBuilder,
    RecordingArtifact, Theme, ThemeBuilder,
};
use cable_error::{BackendError, CableResult};
use cable_interface::{
    ArtifactSink, InMemoryTransport, MediaCapture, NarrativeBackend, PipelineBackend,
    ThemeCatalog,
};
use cable_session::{SessionConfig, SessionController};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

pub fn theme(id: &str, label: &str) -> Theme {
    ThemeBuilder::default()
        .id(id.to_string())
        .label(label.to_string())
        .build()
        .expect("Valid theme")
}

pub fn narrative(story: &str, visual: Option<&str>) -> NarrativeState {
    NarrativeStateBuilder::default()
        .story_text(story.to_string())
        .cues(vec!["Open a door".to_string(), "Look up".to_string()])
        .visual_prompt(visual.map(str::to_string))
        .build()
        .expect("Valid narrative state")
}

/// Narrative backend and catalog with scripted replies.
///
/// Unscripted cues answer with a state whose visual prompt is the cue.
#[derive(Default)]
pub struct ScriptedNarrative {
    pub themes: Vec<Theme>,
    pub catalog_fails: bool,
    pub start_delay: Duration,
    pub submit_delay: Duration,
    pub start_replies: Mutex<VecDeque<CableResult<NarrativeState>>>,
    pub cue_replies: Mutex<VecDeque<CableResult<NarrativeState>>>,
    pub started: Mutex<Vec<String>>,
    pub cues: Mutex<Vec<String>>,
}

impl ScriptedNarrative {
    pub fn new() -> Self {
        Self {
            themes: vec![
                theme("pixar_portal", "Pixar Portal"),
                theme("lego_flux", "Lego Flux"),
            ],
            ..Self::default()
        }
    }

    pub fn with_start_delay(mut self, delay: Duration) -> Self {
        self.start_delay = delay;
        self
    }

    pub fn with_submit_delay(mut self, delay: Duration) -> Self {
        self.submit_delay = delay;
        self
    }

    pub fn reply_to_start(&self, reply: CableResult<NarrativeState>) {
        self.start_replies.lock().push_back(reply);
    }

    pub fn reply_to_cue(&self, reply: CableResult<NarrativeState>) {
        self.cue_replies.lock().push_back(reply);
    }

    pub fn cues(&self) -> Vec<String> {
        self.cues.lock().clone()
    }
}

#[async_trait]
impl ThemeCatalog for ScriptedNarrative {
    async fn list_themes(&self) -> CableResult<Vec<Theme>> {
        if self.catalog_fails {
            return Err(BackendError::request("catalog offline").into());
        }
        Ok(self.themes.clone())
    }
}

#[async_trait]
impl NarrativeBackend for ScriptedNarrative {
    async fn start_session(&self, theme_id: &str) -> CableResult<NarrativeState> {
        self.started.lock().push(theme_id.to_string());
        tokio::time::sleep(self.start_delay).await;
        let scripted = self.start_replies.lock().pop_front();
        scripted.unwrap_or_else(|| {
            Ok(narrative(
                &format!("Welcome to {}", theme_id),
                Some(&format!("{} establishing shot", theme_id)),
            ))
        })
    }

    async fn submit_cue(&self, text: &str) -> CableResult<NarrativeState> {
        self.cues.lock().push(text.to_string());
        tokio::time::sleep(self.submit_delay).await;
        let scripted = self.cue_replies.lock().pop_front();
        scripted.unwrap_or_else(|| Ok(narrative(&format!("After {}", text), Some(text))))
    }
}

/// Pipeline backend whose download finishes after a number of polls.
pub struct MockPipeline {
    /// Status polls after the trigger before assets appear; `None` never
    pub ready_after: Option<usize>,
    pub downloaded: Mutex<bool>,
    pub load_result: bool,
    pub load_delay: Duration,
    pub trigger_fails: bool,
    pub status_fails_after_trigger: bool,
    pub polls: Mutex<usize>,
    pub triggers: Mutex<usize>,
    pub loads: Mutex<Vec<(String, LoadParams)>>,
}

impl Default for MockPipeline {
    fn default() -> Self {
        Self {
            ready_after: Some(0),
            downloaded: Mutex::new(true),
            load_result: true,
            load_delay: Duration::ZERO,
            trigger_fails: false,
            status_fails_after_trigger: false,
            polls: Mutex::new(0),
            triggers: Mutex::new(0),
            loads: Mutex::new(Vec::new()),
        }
    }
}

impl MockPipeline {
    pub fn ready() -> Self {
        Self::default()
    }

    pub fn downloading(ready_after: Option<usize>) -> Self {
        Self {
            ready_after,
            downloaded: Mutex::new(false),
            ..Self::default()
        }
    }

    pub fn polls(&self) -> usize {
        *self.polls.lock()
    }

    pub fn triggers(&self) -> usize {
        *self.triggers.lock()
    }

    pub fn loads(&self) -> Vec<(String, LoadParams)> {
        self.loads.lock().clone()
    }
}

#[async_trait]
impl PipelineBackend for MockPipeline {
    async fn check_status(&self, _pipeline_id: &str) -> CableResult<ModelStatus> {
        let triggered = *self.triggers.lock() > 0;
        if !triggered {
            return Ok(ModelStatus {
                downloaded: *self.downloaded.lock(),
            });
        }
        if self.status_fails_after_trigger {
            return Err(BackendError::request("status endpoint unavailable").into());
        }
        let mut polls = self.polls.lock();
        *polls += 1;
        let downloaded = self.ready_after.is_some_and(|after| *polls > after);
        Ok(ModelStatus { downloaded })
    }

    async fn trigger_download(&self, _pipeline_id: &str) -> CableResult<()> {
        if self.trigger_fails {
            return Err(BackendError::request("disk full").into());
        }
        *self.triggers.lock() += 1;
        Ok(())
    }

    async fn load_pipeline(&self, pipeline_id: &str, params: LoadParams) -> CableResult<bool> {
        self.loads.lock().push((pipeline_id.to_string(), params));
        tokio::time::sleep(self.load_delay).await;
        Ok(self.load_result)
    }
}

/// Capture device with a fixed format list and a scripted final chunk.
pub struct MockCapture {
    pub supported: Vec<CaptureFormat>,
    pub final_chunk: Option<Vec<u8>>,
    pub begun: Mutex<Vec<CaptureFormat>>,
}

impl MockCapture {
    pub fn new(supported: &[&str], final_chunk: Option<&[u8]>) -> Self {
        Self {
            supported: supported.iter().map(|f| CaptureFormat::new(*f)).collect(),
            final_chunk: final_chunk.map(<[u8]>::to_vec),
            begun: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl MediaCapture for MockCapture {
    fn supports(&self, format: &CaptureFormat) -> bool {
        self.supported.contains(format)
    }

    async fn begin(&self, format: &CaptureFormat) -> CableResult<()> {
        self.begun.lock().push(format.clone());
        Ok(())
    }

    async fn finish(&self) -> CableResult<Option<Vec<u8>>> {
        Ok(self.final_chunk.clone())
    }
}

/// Sink that keeps delivered artifacts in memory.
#[derive(Default)]
pub struct MemorySink {
    pub delivered: Mutex<Vec<RecordingArtifact>>,
}

impl MemorySink {
    pub fn delivered(&self) -> Vec<RecordingArtifact> {
        self.delivered.lock().clone()
    }
}

#[async_trait]
impl ArtifactSink for MemorySink {
    async fn deliver(&self, artifact: &RecordingArtifact) -> CableResult<()> {
        self.delivered.lock().push(artifact.clone());
        Ok(())
    }
}

/// A controller wired to mocks, with handles to each.
pub struct Harness {
    pub controller: SessionController,
    pub narrative: Arc<ScriptedNarrative>,
    pub pipeline: Arc<MockPipeline>,
    pub transport: Arc<InMemoryTransport>,
    pub capture: Arc<MockCapture>,
    pub sink: Arc<MemorySink>,
}

impl Harness {
    pub fn new(narrative: ScriptedNarrative, pipeline: MockPipeline) -> Self {
        Self::with_config(narrative, pipeline, SessionConfig::default())
    }

    pub fn with_config(
        narrative: ScriptedNarrative,
        pipeline: MockPipeline,
        config: SessionConfig,
    ) -> Self {
        Self::with_transport(narrative, pipeline, config, InMemoryTransport::new())
    }

    pub fn with_transport(
        narrative: ScriptedNarrative,
        pipeline: MockPipeline,
        config: SessionConfig,
        transport: InMemoryTransport,
    ) -> Self {
        let narrative = Arc::new(narrative);
        let pipeline = Arc::new(pipeline);
        let transport = Arc::new(transport);
        let capture = Arc::new(MockCapture::new(&["video/webm"], Some(b"tail")));
        let sink = Arc::new(MemorySink::default());

        let controller = SessionController::builder()
            .config(config)
            .catalog(narrative.clone())
            .narrative(narrative.clone())
            .pipeline(pipeline.clone())
            .transport(transport.clone())
            .capture(capture.clone())
            .sink(sink.clone())
            .build()
            .expect("Valid controller");

        Self {
            controller,
            narrative,
            pipeline,
            transport,
            capture,
            sink,
        }
    }

    pub fn ready() -> Self {
        Self::new(ScriptedNarrative::new(), MockPipeline::ready())
    }

    /// Boots and tunes into the first channel.
    pub async fn tuned() -> Self {
        let harness = Self::ready();
        harness.tune().await;
        harness
    }

    pub async fn tune(&self) {
        let themes = self.controller.boot().await;
        self.controller
            .select_theme(&themes[0])
            .await
            .expect("Channel activates");
    }
}
