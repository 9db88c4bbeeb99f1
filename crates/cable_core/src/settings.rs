//! Process-wide stream settings.

use derive_getters::Getters;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Output frame size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Getters, Serialize, Deserialize)]
pub struct Resolution {
    /// Frame width in pixels
    width: u32,
    /// Frame height in pixels
    height: u32,
}

impl Resolution {
    /// Creates a resolution.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Generation parameters shared by every consumer of the pipeline.
///
/// Keys other consumers own are kept in `extra` and are never cleared by this
/// crate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StreamSettings {
    /// Pipeline the settings target
    #[serde(default)]
    pub pipeline_id: String,
    /// Output size, `None` means "pipeline default"
    #[serde(default)]
    pub resolution: Option<Resolution>,
    /// Denoising timesteps, `None` means "pipeline default"
    #[serde(default)]
    pub denoising_steps: Option<Vec<u32>>,
    /// Sampling seed
    #[serde(default)]
    pub seed: u64,
    /// Let the pipeline manage its KV cache
    #[serde(default)]
    pub manage_cache: bool,
    /// Generation paused by the viewer
    #[serde(default)]
    pub paused: bool,
    /// Keys owned by other consumers
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Shared, cloneable handle to the process-wide [`StreamSettings`].
///
/// # Examples
///
/// ```
/// use cable_core::SettingsStore;
///
/// let store = SettingsStore::default();
/// let other = store.clone();
/// store.update(|settings| settings.paused = true);
/// assert!(other.snapshot().paused);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    inner: Arc<RwLock<StreamSettings>>,
}

impl SettingsStore {
    /// Creates a store seeded with `settings`.
    pub fn new(settings: StreamSettings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
        }
    }

    /// Copy of the current settings.
    pub fn snapshot(&self) -> StreamSettings {
        self.inner.read().clone()
    }

    /// Mutates the settings in place and returns the result.
    pub fn update(&self, f: impl FnOnce(&mut StreamSettings)) -> StreamSettings {
        let mut settings = self.inner.write();
        f(&mut settings);
        debug!(pipeline_id = %settings.pipeline_id, "Stream settings updated");
        settings.clone()
    }
}
