//! In-process adapters for local runs.

use crate::{ArtifactSink, MediaCapture, PipelineBackend, StreamTransport};
use async_trait::async_trait;
use cable_core::{
    CaptureFormat, LoadParams, ModelStatus, PromptParams, RecordingArtifact, TransportStatus,
};
use cable_error::{BackendError, BackendErrorKind, CableResult};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Transport that keeps the stream in memory and records every payload.
///
/// # Examples
///
/// ```
/// use cable_interface::{InMemoryTransport, StreamTransport};
///
/// let transport = InMemoryTransport::new();
/// assert!(!transport.status().is_present());
/// assert!(transport.opened().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryTransport {
    state: Mutex<TransportLog>,
    close_delay: Duration,
}

#[derive(Debug, Default)]
struct TransportLog {
    status: TransportStatus,
    opened: Vec<PromptParams>,
    updates: Vec<PromptParams>,
    closes: usize,
}

impl InMemoryTransport {
    /// Creates a closed transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tears streams down at once on `close` but returns after `delay`,
    /// like a peer connection that is slow to acknowledge.
    pub fn with_close_delay(mut self, delay: Duration) -> Self {
        self.close_delay = delay;
        self
    }

    /// Drops the remote stream without a `close` call, as when the peer
    /// goes away.
    pub fn disconnect(&self) {
        let mut state = self.state.lock();
        if state.status.is_present() {
            info!("InMemoryTransport: remote stream lost");
            state.status = TransportStatus::default();
        }
    }

    /// Payloads passed to `open`, oldest first.
    pub fn opened(&self) -> Vec<PromptParams> {
        self.state.lock().opened.clone()
    }

    /// Payloads passed to `send_parameter_update`, oldest first.
    pub fn updates(&self) -> Vec<PromptParams> {
        self.state.lock().updates.clone()
    }

    /// Number of `close` calls that tore down a stream.
    pub fn closes(&self) -> usize {
        self.state.lock().closes
    }
}

#[async_trait]
impl StreamTransport for InMemoryTransport {
    async fn open(&self, params: PromptParams) -> CableResult<()> {
        let mut state = self.state.lock();
        debug!(prompt = ?params.primary_text(), "InMemoryTransport: open");
        state.opened.push(params);
        state.status = TransportStatus {
            remote_stream_attached: true,
            is_negotiating: false,
        };
        Ok(())
    }

    async fn send_parameter_update(&self, params: PromptParams) -> CableResult<()> {
        let mut state = self.state.lock();
        if !state.status.is_present() {
            return Err(BackendError::new(BackendErrorKind::Transport(
                "parameter update without an open stream".to_string(),
            ))
            .into());
        }
        debug!(prompt = ?params.primary_text(), "InMemoryTransport: parameter update");
        state.updates.push(params);
        Ok(())
    }

    async fn close(&self) -> CableResult<()> {
        {
            let mut state = self.state.lock();
            if state.status.is_present() {
                state.closes += 1;
                state.status = TransportStatus::default();
                debug!("InMemoryTransport: closed");
            }
        }
        if !self.close_delay.is_zero() {
            tokio::time::sleep(self.close_delay).await;
        }
        Ok(())
    }

    fn status(&self) -> TransportStatus {
        self.state.lock().status
    }
}

/// Pipeline backend with assets already present and loads that always succeed.
#[derive(Debug, Default)]
pub struct InMemoryPipeline {
    loads: Mutex<Vec<(String, LoadParams)>>,
}

impl InMemoryPipeline {
    /// Creates the backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load requests received, oldest first.
    pub fn loads(&self) -> Vec<(String, LoadParams)> {
        self.loads.lock().clone()
    }
}

#[async_trait]
impl PipelineBackend for InMemoryPipeline {
    async fn check_status(&self, _pipeline_id: &str) -> CableResult<ModelStatus> {
        Ok(ModelStatus { downloaded: true })
    }

    async fn trigger_download(&self, _pipeline_id: &str) -> CableResult<()> {
        Ok(())
    }

    async fn load_pipeline(&self, pipeline_id: &str, params: LoadParams) -> CableResult<bool> {
        debug!(pipeline_id, ?params, "InMemoryPipeline: load");
        self.loads.lock().push((pipeline_id.to_string(), params));
        Ok(true)
    }
}

/// Capture device that accepts a fixed set of formats and never buffers data.
#[derive(Debug, Clone)]
pub struct NullCapture {
    supported: Vec<CaptureFormat>,
}

impl NullCapture {
    /// Creates a capture device supporting exactly `supported`.
    pub fn new(supported: Vec<CaptureFormat>) -> Self {
        Self { supported }
    }
}

#[async_trait]
impl MediaCapture for NullCapture {
    fn supports(&self, format: &CaptureFormat) -> bool {
        self.supported.contains(format)
    }

    async fn begin(&self, format: &CaptureFormat) -> CableResult<()> {
        debug!(%format, "NullCapture: begin");
        Ok(())
    }

    async fn finish(&self) -> CableResult<Option<Vec<u8>>> {
        Ok(None)
    }
}

/// Writes each artifact into a directory under its generated file name.
#[derive(Debug, Clone)]
pub struct FileArtifactSink {
    dir: PathBuf,
}

impl FileArtifactSink {
    /// Creates a sink rooted at `dir`; the directory is created on first delivery.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl ArtifactSink for FileArtifactSink {
    async fn deliver(&self, artifact: &RecordingArtifact) -> CableResult<()> {
        let persist_err = |e: std::io::Error| {
            BackendError::new(BackendErrorKind::Persist(format!(
                "{}: {}",
                self.dir.join(&artifact.filename).display(),
                e
            )))
        };

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(persist_err)?;
        let path = self.dir.join(&artifact.filename);
        tokio::fs::write(&path, &artifact.bytes)
            .await
            .map_err(persist_err)?;

        info!(
            path = %path.display(),
            bytes = artifact.bytes.len(),
            chunks = artifact.chunk_count,
            "Recording saved"
        );
        Ok(())
    }
}
