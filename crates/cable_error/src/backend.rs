//! Remote collaborator error types.

/// Failures reported by the narrative, pipeline, transport or persistence collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum BackendErrorKind {
    /// Generic request failure
    #[display("Request failed: {}", _0)]
    Request(String),
    /// Model download could not be triggered or polled
    #[display("Model download failed for pipeline '{}': {}", pipeline_id, message)]
    DownloadFailed {
        /// Pipeline whose assets were being fetched
        pipeline_id: String,
        /// Error message
        message: String,
    },
    /// Pipeline load returned a failure status
    #[display("Pipeline '{}' failed to load", _0)]
    PipelineLoad(String),
    /// Media transport failure
    #[display("Transport failure: {}", _0)]
    Transport(String),
    /// Narrative backend failure
    #[display("Narrative request failed for {}: {}", context, message)]
    Narrative {
        /// Theme id or cue text the request was about
        context: String,
        /// Error message
        message: String,
    },
    /// Theme id not present in the catalog
    #[display("Unknown theme '{}'", _0)]
    UnknownTheme(String),
    /// Recording artifact could not be persisted
    #[display("Failed to persist recording: {}", _0)]
    Persist(String),
}

/// Backend error with location tracking.
///
/// # Examples
///
/// ```
/// use cable_error::{BackendError, BackendErrorKind};
///
/// let err = BackendError::new(BackendErrorKind::PipelineLoad("longlive".to_string()));
/// assert!(format!("{}", err).contains("longlive"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Backend Error: {} at line {} in {}", kind, line, file)]
pub struct BackendError {
    /// The specific failure
    pub kind: BackendErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl BackendError {
    /// Create a new BackendError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: BackendErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for a generic request failure.
    #[track_caller]
    pub fn request(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Request(message.into()))
    }
}
