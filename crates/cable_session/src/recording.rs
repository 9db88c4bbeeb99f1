//! Recording of the live stream into a single artifact.

use crate::RecordingConfig;
use cable_core::{CaptureFormat, RecordingArtifact};
use cable_error::{
    CableResult, EmptyResultError, NotReadyError, NotReadyErrorKind, UnsupportedCapabilityError,
};
use cable_interface::{ArtifactSink, MediaCapture};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, trace, warn};

/// Whether a recording is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, derive_more::Display)]
pub enum RecordingStatus {
    /// Nothing is being captured
    #[default]
    #[display("idle")]
    Idle,
    /// Chunks are being buffered
    #[display("recording")]
    Recording,
}

#[derive(Debug, Default)]
struct Take {
    status: RecordingStatus,
    format: Option<CaptureFormat>,
    chunks: Vec<Vec<u8>>,
}

/// Builds the artifact file name, `<prefix>-<YYYYMMDD-HHMMSS-mmm>.<ext>`.
///
/// # Example
///
/// ```
/// use cable_core::CaptureFormat;
/// use cable_session::recording_filename;
/// use chrono::TimeZone;
///
/// let at = chrono::Utc.with_ymd_and_hms(2026, 3, 14, 15, 9, 26).unwrap();
/// let name = recording_filename("cable", &CaptureFormat::new("video/mp4"), at);
/// assert_eq!(name, "cable-20260314-150926-000.mp4");
/// ```
pub fn recording_filename(prefix: &str, format: &CaptureFormat, at: DateTime<Utc>) -> String {
    format!(
        "{}-{}.{}",
        prefix,
        at.format("%Y%m%d-%H%M%S-%3f"),
        format.extension()
    )
}

/// Buffers captured chunks and assembles them into one artifact on stop.
pub struct RecordingController {
    capture: Arc<dyn MediaCapture>,
    sink: Arc<dyn ArtifactSink>,
    config: RecordingConfig,
    take: parking_lot::Mutex<Take>,
    ops: tokio::sync::Mutex<()>,
}

impl std::fmt::Debug for RecordingController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingController")
            .field("config", &self.config)
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

impl RecordingController {
    /// Creates an idle controller.
    pub fn new(
        capture: Arc<dyn MediaCapture>,
        sink: Arc<dyn ArtifactSink>,
        config: RecordingConfig,
    ) -> Self {
        Self {
            capture,
            sink,
            config,
            take: parking_lot::Mutex::new(Take::default()),
            ops: tokio::sync::Mutex::new(()),
        }
    }

    /// Current status.
    pub fn status(&self) -> RecordingStatus {
        self.take.lock().status
    }

    /// Chunks buffered so far.
    pub fn buffered_chunks(&self) -> usize {
        self.take.lock().chunks.len()
    }

    /// First configured format the capture device supports.
    ///
    /// # Errors
    ///
    /// Lists every format tried when none is supported.
    pub fn select_format(&self) -> CableResult<CaptureFormat> {
        self.config
            .formats()
            .iter()
            .find(|format| self.capture.supports(format))
            .cloned()
            .ok_or_else(|| {
                let tried = self
                    .config
                    .formats()
                    .iter()
                    .map(|format| format.to_string())
                    .collect();
                UnsupportedCapabilityError::new(tried).into()
            })
    }

    /// Starts recording the attached stream.
    ///
    /// # Errors
    ///
    /// Fails without a remote stream, while already recording, when no
    /// format is supported, or when the capture refuses to begin.
    #[instrument(skip(self))]
    pub async fn start(&self, stream_attached: bool) -> CableResult<CaptureFormat> {
        let _op = self.ops.lock().await;

        if !stream_attached {
            return Err(NotReadyError::new(NotReadyErrorKind::NoStream).into());
        }
        if self.status() == RecordingStatus::Recording {
            return Err(NotReadyError::new(NotReadyErrorKind::AlreadyRecording).into());
        }

        let format = self.select_format()?;
        *self.take.lock() = Take {
            status: RecordingStatus::Recording,
            format: Some(format.clone()),
            chunks: Vec::new(),
        };

        if let Err(e) = self.capture.begin(&format).await {
            warn!(error = %e, %format, "Capture refused to begin");
            *self.take.lock() = Take::default();
            return Err(e);
        }

        info!(%format, "Recording started");
        Ok(format)
    }

    /// Buffers a captured chunk. Empty chunks and chunks arriving while idle
    /// are dropped; returns whether the chunk was kept.
    pub fn push_chunk(&self, chunk: Vec<u8>) -> bool {
        if chunk.is_empty() {
            return false;
        }
        let mut take = self.take.lock();
        if take.status != RecordingStatus::Recording {
            trace!(bytes = chunk.len(), "Chunk arrived while idle");
            return false;
        }
        take.chunks.push(chunk);
        true
    }

    /// Stops recording and delivers the assembled artifact.
    ///
    /// Returns `Ok(None)` when nothing was recording. The buffer is released
    /// whether or not assembly succeeds.
    ///
    /// # Errors
    ///
    /// Fails when no data was captured or the sink rejects the artifact.
    #[instrument(skip(self))]
    pub async fn stop(&self) -> CableResult<Option<RecordingArtifact>> {
        let _op = self.ops.lock().await;

        if self.status() == RecordingStatus::Idle {
            debug!("No recording to stop");
            return Ok(None);
        }

        let last = self.capture.finish().await;
        let take = std::mem::take(&mut *self.take.lock());
        let mut chunks = take.chunks;
        match last {
            Ok(Some(chunk)) if !chunk.is_empty() => chunks.push(chunk),
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Final chunk lost"),
        }

        let Some(format) = take.format else {
            return Ok(None);
        };

        let chunk_count = chunks.len();
        let bytes = chunks.concat();
        if bytes.is_empty() {
            warn!(chunk_count, "Recording captured no data");
            return Err(EmptyResultError::new(chunk_count, 0).into());
        }

        let artifact = RecordingArtifact {
            filename: recording_filename(self.config.file_prefix(), &format, Utc::now()),
            format,
            bytes,
            chunk_count,
        };
        self.sink.deliver(&artifact).await?;

        info!(
            filename = %artifact.filename,
            bytes = artifact.bytes.len(),
            chunk_count,
            "Recording saved"
        );
        Ok(Some(artifact))
    }
}
