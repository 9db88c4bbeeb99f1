//! Session configuration.
//!
//! Configuration is layered with the `config` crate:
//! - Bundled defaults (include_str! from cable.toml)
//! - User overrides (~/.config/cable/cable.toml, then ./cable.toml)
//! - An explicit file, when the caller names one

use cable_core::CaptureFormat;
use cable_error::{CableError, CableResult, ConfigError};
use config::{Config, File, FileFormat};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../cable.toml");

/// Generative pipeline this session asserts on entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct PipelineConfig {
    /// Pipeline identifier
    pipeline_id: String,
    /// Default frame width
    width: u32,
    /// Default frame height
    height: u32,
    /// Default denoising timesteps
    denoising_steps: Vec<u32>,
    /// Default seed
    seed: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            pipeline_id: "longlive".to_string(),
            width: 576,
            height: 320,
            denoising_steps: vec![1000, 750, 500, 250],
            seed: 42,
        }
    }
}

/// Recording naming and format preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct RecordingConfig {
    /// File name prefix
    file_prefix: String,
    /// Directory the CLI writes recordings into
    output_dir: PathBuf,
    /// Capture formats in preference order
    formats: Vec<CaptureFormat>,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            file_prefix: "interdimensional-cable".to_string(),
            output_dir: PathBuf::from("recordings"),
            formats: [
                "video/webm;codecs=vp9,opus",
                "video/webm;codecs=vp8,opus",
                "video/webm",
                "video/mp4",
            ]
            .into_iter()
            .map(CaptureFormat::new)
            .collect(),
        }
    }
}

/// Tunables for a viewing session.
///
/// # Example
///
/// ```
/// use cable_session::SessionConfig;
///
/// let config = SessionConfig::default().with_action_interval_secs(5);
/// assert_eq!(*config.action_interval_secs(), 5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct SessionConfig {
    /// Countdown length in seconds
    #[serde(default = "default_action_interval")]
    action_interval_secs: u32,
    /// Cue submitted when the countdown expires
    #[serde(default = "default_auto_cue")]
    auto_cue_text: String,
    /// Seconds between model status polls
    #[serde(default = "default_poll")]
    download_poll_secs: u64,
    /// Seconds before a model download is abandoned
    #[serde(default = "default_download_timeout")]
    download_timeout_secs: u64,
    /// Pipeline defaults
    #[serde(default)]
    pipeline: PipelineConfig,
    /// Recording preferences
    #[serde(default)]
    recording: RecordingConfig,
}

fn default_action_interval() -> u32 {
    8
}

fn default_auto_cue() -> String {
    "Continue the current scene with new possibilities".to_string()
}

fn default_poll() -> u64 {
    4
}

fn default_download_timeout() -> u64 {
    15 * 60
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            action_interval_secs: default_action_interval(),
            auto_cue_text: default_auto_cue(),
            download_poll_secs: default_poll(),
            download_timeout_secs: default_download_timeout(),
            pipeline: PipelineConfig::default(),
            recording: RecordingConfig::default(),
        }
    }
}

fn config_error(context: &str, e: config::ConfigError) -> CableError {
    ConfigError::new(format!("{}: {}", context, e)).into()
}

impl SessionConfig {
    /// Interval between model status polls.
    pub fn download_poll_interval(&self) -> Duration {
        Duration::from_secs(self.download_poll_secs)
    }

    /// Deadline for a model download.
    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    /// Rejects values the orchestrator cannot run with.
    pub fn validate(&self) -> CableResult<()> {
        if self.action_interval_secs == 0 {
            return Err(ConfigError::invalid("action_interval_secs", "must be at least 1").into());
        }
        if self.auto_cue_text.trim().is_empty() {
            return Err(ConfigError::invalid("auto_cue_text", "must not be blank").into());
        }
        if self.download_poll_secs == 0 {
            return Err(ConfigError::invalid("download_poll_secs", "must be at least 1").into());
        }
        if self.download_timeout_secs < self.download_poll_secs {
            return Err(ConfigError::invalid(
                "download_timeout_secs",
                format!("must be at least download_poll_secs ({})", self.download_poll_secs),
            )
            .into());
        }
        if self.pipeline.pipeline_id.trim().is_empty() {
            return Err(ConfigError::invalid("pipeline.pipeline_id", "must not be blank").into());
        }
        if self.pipeline.width == 0 || self.pipeline.height == 0 {
            return Err(ConfigError::invalid("pipeline", "width and height must be non-zero").into());
        }
        if self.recording.formats.is_empty() {
            return Err(ConfigError::invalid("recording.formats", "list at least one format").into());
        }
        Ok(())
    }

    /// Load configuration from a specific file layered over the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or fails validation.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> CableResult<Self> {
        debug!("Loading session configuration from file");

        let config: Self = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                config_error(
                    &format!("Failed to read configuration from {}", path.as_ref().display()),
                    e,
                )
            })?
            .try_deserialize()
            .map_err(|e| config_error("Failed to parse configuration", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with precedence: current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped if not found.
    #[instrument]
    pub fn load() -> CableResult<Self> {
        debug!("Loading session configuration");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/cable/cable.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("cable").required(false));

        let config: Self = builder
            .build()
            .map_err(|e| config_error("Failed to build configuration", e))?
            .try_deserialize()
            .map_err(|e| config_error("Failed to parse configuration", e))?;

        config.validate()?;
        Ok(config)
    }
}
