//! Capture format and recording artifact types.

use serde::{Deserialize, Serialize};

/// A container/codec combination, as a MIME type string.
///
/// # Examples
///
/// ```
/// use cable_core::CaptureFormat;
///
/// assert_eq!(CaptureFormat::new("video/webm;codecs=vp9,opus").extension(), "webm");
/// assert_eq!(CaptureFormat::new("video/mp4").extension(), "mp4");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(transparent)]
#[display("{}", _0)]
pub struct CaptureFormat(String);

impl CaptureFormat {
    /// Wraps a MIME type.
    pub fn new(mime_type: impl Into<String>) -> Self {
        Self(mime_type.into())
    }

    /// The full MIME type.
    pub fn mime_type(&self) -> &str {
        &self.0
    }

    /// File extension for the container.
    pub fn extension(&self) -> &'static str {
        let container = self.0.split(';').next().unwrap_or_default().trim();
        match container {
            "video/mp4" => "mp4",
            "video/x-matroska" => "mkv",
            _ => "webm",
        }
    }
}

/// A finalized recording ready to hand to the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingArtifact {
    /// Generated unique file name
    pub filename: String,
    /// Container/codec of the bytes
    pub format: CaptureFormat,
    /// Chunks concatenated in arrival order
    pub bytes: Vec<u8>,
    /// How many chunks were assembled
    pub chunk_count: usize,
}
