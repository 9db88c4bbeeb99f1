//! The session controller: channel selection, cue cadence and teardown.

use crate::{
    ActivationStage, CueOrigin, CueScheduler, PipelineActivator, ReadinessGate,
    RecordingController, RecordingStatus, SessionConfig, SessionPhase, SessionView, StreamAction,
    StreamApplier, Tick,
};
use cable_core::{CaptureFormat, NarrativeState, RecordingArtifact, SettingsStore, Theme};
use cable_error::{
    BackendError, BackendErrorKind, CableResult, ConfigError, NotReadyError, NotReadyErrorKind,
};
use cable_interface::{
    ArtifactSink, FileArtifactSink, MediaCapture, NarrativeBackend, NullCapture, PipelineBackend,
    StreamTransport, ThemeCatalog,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, instrument, warn};

/// Mutable session state. Never held across an await.
#[derive(Debug)]
struct SessionState {
    themes: Vec<Theme>,
    theme: Option<Theme>,
    phase: SessionPhase,
    narrative: Option<NarrativeState>,
    scheduler: CueScheduler,
    submitting: bool,
    /// Bumped on every theme change and teardown; async results from an
    /// older epoch are discarded.
    epoch: u64,
    notice: Option<String>,
}

struct Inner {
    config: SessionConfig,
    catalog: Arc<dyn ThemeCatalog>,
    narrative: Arc<dyn NarrativeBackend>,
    transport: Arc<dyn StreamTransport>,
    applier: StreamApplier,
    recording: RecordingController,
    state: Mutex<SessionState>,
    view: watch::Sender<SessionView>,
}

impl Inner {
    fn snapshot(&self) -> SessionView {
        let state = self.state.lock();
        SessionView {
            themes: state.themes.clone(),
            theme: state.theme.clone(),
            phase: state.phase,
            narrative: state.narrative.clone(),
            countdown: state.scheduler.countdown(),
            loading: state.phase.is_activating(),
            submitting: state.submitting,
            download_pending: self.applier.activator().gate().is_download_pending(),
            stream: self.transport.status(),
            recording: self.recording.status(),
            notice: state.notice.clone(),
        }
    }

    fn publish(&self) {
        self.view.send_replace(self.snapshot());
    }

    /// A recording is running but its stream is gone.
    fn recording_orphaned(&self) -> bool {
        self.recording.status() == RecordingStatus::Recording
            && !self.transport.status().remote_stream_attached
    }
}

/// Orchestrates one viewer's session against the external collaborators.
///
/// Cloning yields another handle to the same session.
///
/// # Example
///
/// ```no_run
/// use cable_session::{CueOrigin, SessionController};
/// # async fn run(controller: SessionController) -> cable_error::CableResult<()> {
/// let themes = controller.boot().await;
/// controller.select_theme(&themes[0]).await?;
/// controller.submit_cue("Open the portal", CueOrigin::Manual).await?;
/// controller.stop().await;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SessionController {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("state", &*self.inner.state.lock())
            .finish_non_exhaustive()
    }
}

/// Releases the in-flight flag when a submission ends, however it ends.
struct InFlight<'a> {
    controller: &'a SessionController,
    epoch: u64,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let released = {
            let mut state = self.controller.inner.state.lock();
            let current = state.epoch == self.epoch && state.submitting;
            if current {
                state.submitting = false;
            }
            current
        };
        if released {
            self.controller.inner.publish();
        }
    }
}

impl SessionController {
    /// Starts building a controller.
    pub fn builder() -> SessionControllerBuilder {
        SessionControllerBuilder::default()
    }

    /// Subscribes to view updates.
    pub fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.inner.view.subscribe()
    }

    /// Current view.
    pub fn view(&self) -> SessionView {
        self.inner.snapshot()
    }

    /// Session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    /// Shared stream settings.
    pub fn settings(&self) -> &SettingsStore {
        self.inner.applier.activator().settings()
    }

    /// The recording controller, for feeding captured chunks.
    pub fn recording(&self) -> &RecordingController {
        &self.inner.recording
    }

    /// Channels loaded by [`boot`](Self::boot).
    pub fn themes(&self) -> Vec<Theme> {
        self.inner.state.lock().themes.clone()
    }

    /// Loads the channel catalog.
    ///
    /// A catalog failure leaves the list empty and sets a notice.
    #[instrument(skip(self))]
    pub async fn boot(&self) -> Vec<Theme> {
        let result = self.inner.catalog.list_themes().await;
        let themes = {
            let mut state = self.inner.state.lock();
            match result {
                Ok(themes) => {
                    info!(count = themes.len(), "Channels loaded");
                    state.themes = themes;
                }
                Err(e) => {
                    error!(error = %e, "Failed to load channels");
                    state.themes.clear();
                    state.notice = Some(format!("Could not load channels: {}", e.message()));
                }
            }
            state.themes.clone()
        };
        self.inner.publish();
        themes
    }

    /// Tunes into a channel by id.
    ///
    /// # Errors
    ///
    /// Fails for ids not in the loaded catalog, then as
    /// [`select_theme`](Self::select_theme).
    pub async fn select_theme_by_id(&self, theme_id: &str) -> CableResult<()> {
        let theme = self
            .themes()
            .into_iter()
            .find(|theme| theme.id() == theme_id)
            .ok_or_else(|| {
                BackendError::new(BackendErrorKind::UnknownTheme(theme_id.to_string()))
            })?;
        self.select_theme(&theme).await
    }

    /// Tunes into a channel and applies its opening narrative.
    ///
    /// # Errors
    ///
    /// Refused while a channel is activating or a stream exists. Session
    /// start failures return the session to idle. Activation failures leave
    /// the session running without a stream.
    #[instrument(skip(self, theme), fields(theme_id = %theme.id()))]
    pub async fn select_theme(&self, theme: &Theme) -> CableResult<()> {
        let epoch = {
            let mut state = self.inner.state.lock();
            if state.phase.is_activating() || self.inner.transport.status().is_present() {
                let kind = match &state.theme {
                    Some(current) => NotReadyErrorKind::SessionBusy(current.id().clone()),
                    None => NotReadyErrorKind::StreamAttached,
                };
                let err = NotReadyError::new(kind);
                warn!(phase = %state.phase, "Channel change refused");
                state.notice = Some(err.kind.to_string());
                drop(state);
                self.inner.publish();
                return Err(err.into());
            }

            state.epoch += 1;
            state.theme = Some(theme.clone());
            state.narrative = None;
            state.submitting = false;
            state.phase = SessionPhase::Activating(ActivationStage::AwaitingNarrative);
            state.scheduler.prime();
            state.notice = None;
            state.epoch
        };
        self.inner.publish();
        info!(label = %theme.label(), "Tuning in");

        match self.inner.narrative.start_session(theme.id()).await {
            Ok(narrative) => self.apply_narrative_state(epoch, narrative).await,
            Err(e) => {
                error!(error = %e, "Failed to start story session");
                {
                    let mut state = self.inner.state.lock();
                    if state.epoch == epoch {
                        state.theme = None;
                        state.phase = SessionPhase::Idle;
                        state.scheduler.halt();
                        state.notice = Some(format!(
                            "Could not tune into {}: {}",
                            theme.label(),
                            e.message()
                        ));
                    }
                }
                self.inner.publish();
                Err(e)
            }
        }
    }

    /// Sends a cue to the narrative backend and applies the result.
    ///
    /// Only one submission runs at a time. An automatic cue that finds no
    /// session or a submission in flight is dropped silently.
    ///
    /// # Errors
    ///
    /// Manual cues fail without a session or while another cue is in flight.
    /// Backend failures leave the previous narrative state and countdown as
    /// they were.
    #[instrument(skip(self, text), fields(origin = %origin))]
    pub async fn submit_cue(&self, text: &str, origin: CueOrigin) -> CableResult<()> {
        let epoch = {
            let mut state = self.inner.state.lock();
            if state.theme.is_none() || state.narrative.is_none() {
                if origin == CueOrigin::Auto {
                    debug!("Automatic cue without a session, ignoring");
                    return Ok(());
                }
                return Err(NotReadyError::new(NotReadyErrorKind::NoSession).into());
            }
            if state.submitting {
                if origin == CueOrigin::Auto {
                    debug!("Automatic cue suppressed, submission in flight");
                    return Ok(());
                }
                warn!("Cue refused, submission in flight");
                return Err(NotReadyError::new(NotReadyErrorKind::CueInFlight).into());
            }
            state.submitting = true;
            state.epoch
        };
        self.inner.publish();
        let _in_flight = InFlight {
            controller: self,
            epoch,
        };

        info!(cue = %text, "Submitting cue");
        let narrative = match self.inner.narrative.submit_cue(text).await {
            Ok(narrative) => narrative,
            Err(e) => {
                error!(error = %e, "Cue failed");
                self.set_notice(epoch, format!("Cue failed: {}", e.message()));
                return Err(e);
            }
        };

        self.apply_narrative_state(epoch, narrative).await
    }

    /// Starts recording the live stream.
    ///
    /// # Errors
    ///
    /// See [`RecordingController::start`].
    pub async fn start_recording(&self) -> CableResult<CaptureFormat> {
        let attached = self.inner.transport.status().remote_stream_attached;
        let result = self.inner.recording.start(attached).await;
        if let Err(e) = &result {
            warn!(error = %e, "Recording not started");
        }
        self.inner.publish();
        result
    }

    /// Stops recording and delivers the artifact.
    ///
    /// # Errors
    ///
    /// See [`RecordingController::stop`].
    pub async fn stop_recording(&self) -> CableResult<Option<RecordingArtifact>> {
        let result = self.inner.recording.stop().await;
        if let Err(e) = &result {
            let mut state = self.inner.state.lock();
            state.notice = Some(format!("Recording failed: {}", e.message()));
        }
        self.inner.publish();
        result
    }

    /// Buffers a captured chunk while the recorded stream is still attached.
    ///
    /// Returns whether the chunk was kept. A chunk arriving after the stream
    /// detached is dropped; [`check_stream`](Self::check_stream) finalizes the
    /// recording.
    pub fn push_chunk(&self, chunk: Vec<u8>) -> bool {
        if self.inner.recording_orphaned() {
            debug!(bytes = chunk.len(), "Chunk for a detached stream, dropping");
            return false;
        }
        self.inner.recording.push_chunk(chunk)
    }

    /// Finalizes a running recording whose stream has detached.
    ///
    /// Runs on every countdown tick. Returns the artifact when one was saved.
    #[instrument(skip(self))]
    pub async fn check_stream(&self) -> Option<RecordingArtifact> {
        if !self.inner.recording_orphaned() {
            return None;
        }
        warn!("Stream detached while recording, finalizing");
        let artifact = match self.inner.recording.stop().await {
            Ok(artifact) => artifact,
            Err(e) => {
                warn!(error = %e, "Recording discarded after detach");
                let mut state = self.inner.state.lock();
                state.notice = Some(format!("Recording failed: {}", e.message()));
                None
            }
        };
        self.inner.publish();
        artifact
    }

    /// Tears the session down: countdown, recording, stream, narrative.
    ///
    /// Never fails and is safe to call repeatedly. Results of calls still
    /// in flight are discarded when they arrive.
    #[instrument(skip(self))]
    pub async fn stop(&self) {
        let (epoch, was_running) = {
            let mut state = self.inner.state.lock();
            state.epoch += 1;
            state.scheduler.halt();
            state.submitting = false;
            (
                state.epoch,
                state.theme.is_some() || state.phase != SessionPhase::Idle,
            )
        };

        match self.inner.recording.stop().await {
            Ok(Some(artifact)) => info!(filename = %artifact.filename, "Recording finalized on stop"),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Recording discarded on stop"),
        }

        if let Err(e) = self.inner.transport.close().await {
            warn!(error = %e, "Transport close failed");
        }

        {
            let mut state = self.inner.state.lock();
            if state.epoch == epoch {
                state.theme = None;
                state.narrative = None;
                state.phase = SessionPhase::Idle;
            } else {
                debug!("Channel selected during teardown, keeping it");
            }
        }
        self.inner.publish();

        if was_running {
            info!("Session stopped");
        }
    }

    /// Stores a narrative state, restarts the countdown and updates the stream.
    async fn apply_narrative_state(&self, epoch: u64, narrative: NarrativeState) -> CableResult<()> {
        {
            let mut state = self.inner.state.lock();
            if state.epoch != epoch {
                warn!("Discarding narrative state for a torn-down session");
                return Ok(());
            }
            state.narrative = Some(narrative.clone());
            let handle = Arc::downgrade(&self.inner);
            let generation = state.scheduler.reset(move |generation| {
                handle
                    .upgrade()
                    .is_some_and(|inner| SessionController { inner }.on_tick(generation))
            });
            debug!(generation, cues = narrative.cues().len(), "Narrative state stored");
        }
        self.inner.publish();

        let result = self
            .inner
            .applier
            .apply(&narrative, |stage| self.enter_stage(epoch, stage))
            .await;

        let orphaned = {
            let mut state = self.inner.state.lock();
            if state.epoch != epoch {
                matches!(result, Ok(StreamAction::Opened))
            } else {
                if state.phase.is_activating() {
                    state.phase = SessionPhase::Active;
                }
                if let Err(e) = &result {
                    state.notice = Some(e.message());
                }
                false
            }
        };

        if orphaned {
            warn!("Stream opened after teardown, closing it");
            if let Err(e) = self.inner.transport.close().await {
                warn!(error = %e, "Transport close failed");
            }
        }
        self.inner.publish();

        match result {
            Ok(action) => {
                debug!(%action, "Narrative state applied");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Failed to apply narrative state");
                Err(e)
            }
        }
    }

    fn enter_stage(&self, epoch: u64, stage: ActivationStage) {
        {
            let mut state = self.inner.state.lock();
            if state.epoch != epoch {
                return;
            }
            state.phase = SessionPhase::Activating(stage);
        }
        debug!(%stage, "Activation stage");
        self.inner.publish();
    }

    fn set_notice(&self, epoch: u64, notice: String) {
        {
            let mut state = self.inner.state.lock();
            if state.epoch != epoch {
                return;
            }
            state.notice = Some(notice);
        }
        self.inner.publish();
    }

    /// Handles one countdown tick; returns `false` once the ticker is retired.
    fn on_tick(&self, generation: u64) -> bool {
        let fire = {
            let mut state = self.inner.state.lock();
            match state.scheduler.tick(generation) {
                Tick::Stale => return false,
                Tick::Counting(_) => false,
                Tick::Expired => !state.submitting,
            }
        };
        self.inner.publish();

        if self.inner.recording_orphaned() {
            let controller = self.clone();
            tokio::spawn(async move {
                controller.check_stream().await;
            });
        }

        if fire {
            let controller = self.clone();
            tokio::spawn(async move {
                let cue = controller.inner.config.auto_cue_text().clone();
                if let Err(e) = controller.submit_cue(&cue, CueOrigin::Auto).await {
                    warn!(error = %e, "Automatic cue failed");
                }
            });
        }
        true
    }
}

/// Builder for [`SessionController`].
///
/// Recording collaborators are optional; without them recording reports
/// every format as unsupported.
#[derive(Default)]
pub struct SessionControllerBuilder {
    config: Option<SessionConfig>,
    settings: Option<SettingsStore>,
    catalog: Option<Arc<dyn ThemeCatalog>>,
    narrative: Option<Arc<dyn NarrativeBackend>>,
    pipeline: Option<Arc<dyn PipelineBackend>>,
    transport: Option<Arc<dyn StreamTransport>>,
    capture: Option<Arc<dyn MediaCapture>>,
    sink: Option<Arc<dyn ArtifactSink>>,
}

impl SessionControllerBuilder {
    /// Session configuration; defaults to [`SessionConfig::default`].
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Shared stream settings; defaults to a fresh store.
    pub fn settings(mut self, settings: SettingsStore) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Channel catalog.
    pub fn catalog(mut self, catalog: Arc<dyn ThemeCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Narrative backend.
    pub fn narrative(mut self, narrative: Arc<dyn NarrativeBackend>) -> Self {
        self.narrative = Some(narrative);
        self
    }

    /// Pipeline backend.
    pub fn pipeline(mut self, pipeline: Arc<dyn PipelineBackend>) -> Self {
        self.pipeline = Some(pipeline);
        self
    }

    /// Media transport.
    pub fn transport(mut self, transport: Arc<dyn StreamTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Capture device.
    pub fn capture(mut self, capture: Arc<dyn MediaCapture>) -> Self {
        self.capture = Some(capture);
        self
    }

    /// Recording sink.
    pub fn sink(mut self, sink: Arc<dyn ArtifactSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Validates the configuration and assembles the controller.
    ///
    /// # Errors
    ///
    /// Fails on invalid configuration or a missing required collaborator.
    pub fn build(self) -> CableResult<SessionController> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let catalog = self.catalog.ok_or_else(|| missing("catalog"))?;
        let narrative = self.narrative.ok_or_else(|| missing("narrative"))?;
        let pipeline = self.pipeline.ok_or_else(|| missing("pipeline"))?;
        let transport = self.transport.ok_or_else(|| missing("transport"))?;
        let capture: Arc<dyn MediaCapture> = match self.capture {
            Some(capture) => capture,
            None => Arc::new(NullCapture::new(Vec::new())),
        };
        let sink: Arc<dyn ArtifactSink> = match self.sink {
            Some(sink) => sink,
            None => Arc::new(FileArtifactSink::new(config.recording().output_dir())),
        };

        let gate = ReadinessGate::new(
            Arc::clone(&pipeline),
            config.download_poll_interval(),
            config.download_timeout(),
        );
        let activator = PipelineActivator::new(
            gate,
            pipeline,
            self.settings.unwrap_or_default(),
            config.pipeline().clone(),
        );
        let applier = StreamApplier::new(activator, Arc::clone(&transport));
        let recording = RecordingController::new(capture, sink, config.recording().clone());

        let state = SessionState {
            themes: Vec::new(),
            theme: None,
            phase: SessionPhase::Idle,
            narrative: None,
            scheduler: CueScheduler::new(*config.action_interval_secs()),
            submitting: false,
            epoch: 0,
            notice: None,
        };
        let (view, _) = watch::channel(SessionView::default());

        let inner = Arc::new(Inner {
            config,
            catalog,
            narrative,
            transport,
            applier,
            recording,
            state: Mutex::new(state),
            view,
        });
        inner.publish();
        Ok(SessionController { inner })
    }
}

fn missing(collaborator: &str) -> ConfigError {
    ConfigError::new(format!("Session controller requires a {} collaborator", collaborator))
}
