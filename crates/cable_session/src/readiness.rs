//! Model download readiness.

use cable_error::{BackendError, BackendErrorKind, CableResult, TimedOutError};
use cable_interface::PipelineBackend;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::{self, Instant};
use tracing::{debug, info, instrument, warn};

/// Ensures a pipeline's model assets are present, downloading them if needed.
#[derive(Clone)]
pub struct ReadinessGate {
    backend: Arc<dyn PipelineBackend>,
    poll_interval: Duration,
    timeout: Duration,
    pending: Arc<AtomicBool>,
}

impl std::fmt::Debug for ReadinessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadinessGate")
            .field("poll_interval", &self.poll_interval)
            .field("timeout", &self.timeout)
            .field("pending", &self.is_download_pending())
            .finish_non_exhaustive()
    }
}

/// Clears the pending flag however the wait ends, including cancellation.
struct PendingGuard<'a>(&'a AtomicBool);

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl ReadinessGate {
    /// Creates a gate polling every `poll_interval` for at most `timeout`.
    pub fn new(backend: Arc<dyn PipelineBackend>, poll_interval: Duration, timeout: Duration) -> Self {
        Self {
            backend,
            poll_interval,
            timeout,
            pending: Arc::new(AtomicBool::new(false)),
        }
    }

    /// True while a download is being waited on.
    pub fn is_download_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }

    /// Returns once the pipeline's assets are present.
    ///
    /// Already-downloaded pipelines return without triggering anything.
    /// Otherwise a download is started and polled until it completes or the
    /// timeout elapses.
    ///
    /// # Errors
    ///
    /// Returns a download failure if the trigger is rejected, a timeout if
    /// the assets never appear, and propagates status query failures.
    #[instrument(skip(self), fields(timeout_secs = self.timeout.as_secs()))]
    pub async fn ensure_models_ready(&self, pipeline_id: &str) -> CableResult<()> {
        if self.backend.check_status(pipeline_id).await?.downloaded {
            debug!("Models already present");
            return Ok(());
        }

        self.pending.store(true, Ordering::SeqCst);
        let _pending = PendingGuard(&self.pending);

        info!("Downloading models");
        if let Err(e) = self.backend.trigger_download(pipeline_id).await {
            warn!(error = %e, "Model download rejected");
            return Err(BackendError::new(BackendErrorKind::DownloadFailed {
                pipeline_id: pipeline_id.to_string(),
                message: e.to_string(),
            })
            .into());
        }

        let deadline = Instant::now() + self.timeout;
        loop {
            time::sleep(self.poll_interval).await;

            if self.backend.check_status(pipeline_id).await?.downloaded {
                info!("Models downloaded");
                return Ok(());
            }

            if Instant::now() >= deadline {
                warn!("Model download timed out");
                return Err(
                    TimedOutError::new("model download", pipeline_id, self.timeout.as_secs())
                        .into(),
                );
            }
            debug!("Models still downloading");
        }
    }
}
