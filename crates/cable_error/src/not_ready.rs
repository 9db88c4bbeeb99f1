//! Unmet-precondition error types.

/// Preconditions that can be unmet when an operation is requested.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum NotReadyErrorKind {
    /// Recording requires an attached live stream
    #[display("No live stream is attached")]
    NoStream,
    /// A recording is already running for this stream
    #[display("A recording is already in progress")]
    AlreadyRecording,
    /// Another channel is activating or streaming
    #[display("Channel '{}' is already active; stop it before tuning elsewhere", _0)]
    SessionBusy(String),
    /// A stream outlived its channel and must be stopped first
    #[display("A live stream is still attached; stop it before tuning elsewhere")]
    StreamAttached,
    /// No channel has been selected yet
    #[display("No active story session. Select a channel first.")]
    NoSession,
    /// A cue submission is outstanding
    #[display("A cue is already being submitted, please wait")]
    CueInFlight,
}

/// Unmet-precondition error with location tracking.
///
/// # Examples
///
/// ```
/// use cable_error::{NotReadyError, NotReadyErrorKind};
///
/// let err = NotReadyError::new(NotReadyErrorKind::NoStream);
/// assert!(format!("{}", err).contains("No live stream"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Not Ready: {} at line {} in {}", kind, line, file)]
pub struct NotReadyError {
    /// The unmet precondition
    pub kind: NotReadyErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl NotReadyError {
    /// Create a new NotReadyError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: NotReadyErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
