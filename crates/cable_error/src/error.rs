//! Top-level error wrapper types.

use crate::{
    BackendError, ConfigError, EmptyResultError, NotReadyError, TimedOutError,
    UnsupportedCapabilityError,
};

/// Every error condition a Cable session can surface.
///
/// # Examples
///
/// ```
/// use cable_error::{CableError, CableErrorKind, EmptyResultError};
///
/// let err: CableError = EmptyResultError::new(0, 0).into();
/// assert!(matches!(err.kind(), CableErrorKind::EmptyResult(_)));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum CableErrorKind {
    /// Preconditions for the operation are unmet
    #[from(NotReadyError)]
    NotReady(NotReadyError),
    /// A bounded wait was exceeded
    #[from(TimedOutError)]
    TimedOut(TimedOutError),
    /// A remote call failed or reported failure
    #[from(BackendError)]
    Backend(BackendError),
    /// No compatible capture format
    #[from(UnsupportedCapabilityError)]
    Unsupported(UnsupportedCapabilityError),
    /// A recording produced no data
    #[from(EmptyResultError)]
    EmptyResult(EmptyResultError),
    /// Configuration could not be loaded or is invalid
    #[from(ConfigError)]
    Config(ConfigError),
}

/// Cable error with kind discrimination.
///
/// # Examples
///
/// ```
/// use cable_error::{CableResult, ConfigError};
///
/// fn might_fail() -> CableResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Cable Error: {}", _0)]
pub struct CableError(Box<CableErrorKind>);

impl CableError {
    /// Create a new error from a kind.
    pub fn new(kind: CableErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &CableErrorKind {
        &self.0
    }

    /// User-facing description without source location.
    ///
    /// # Examples
    ///
    /// ```
    /// use cable_error::{CableError, NotReadyError, NotReadyErrorKind};
    ///
    /// let err: CableError = NotReadyError::new(NotReadyErrorKind::NoStream).into();
    /// assert_eq!(err.message(), "No live stream is attached");
    /// ```
    pub fn message(&self) -> String {
        match self.kind() {
            CableErrorKind::NotReady(e) => e.kind.to_string(),
            CableErrorKind::Backend(e) => e.kind.to_string(),
            CableErrorKind::TimedOut(e) => format!(
                "Timed out after {}s waiting for {} (pipeline '{}')",
                e.waited_secs, e.operation, e.pipeline_id
            ),
            CableErrorKind::Unsupported(e) => {
                format!("No supported capture format among [{}]", e.tried.join(", "))
            }
            CableErrorKind::EmptyResult(e) => format!(
                "Recording captured no data ({} chunks, {} bytes)",
                e.chunks, e.bytes
            ),
            CableErrorKind::Config(e) => e.message.clone(),
        }
    }

    /// True when the error is a bounded-wait timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self.kind(), CableErrorKind::TimedOut(_))
    }
}

impl<T> From<T> for CableError
where
    T: Into<CableErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Cable operations.
pub type CableResult<T> = std::result::Result<T, CableError>;
