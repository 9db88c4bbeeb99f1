//! Bounded-wait timeout error types.

/// A bounded wait exceeded its deadline.
///
/// # Examples
///
/// ```
/// use cable_error::TimedOutError;
///
/// let err = TimedOutError::new("model download", "longlive", 900);
/// assert!(format!("{}", err).contains("900s"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display(
    "Timed out after {}s waiting for {} (pipeline '{}') at line {} in {}",
    waited_secs,
    operation,
    pipeline_id,
    line,
    file
)]
pub struct TimedOutError {
    /// What was being waited on
    pub operation: String,
    /// Pipeline the wait concerned
    pub pipeline_id: String,
    /// How long the caller waited
    pub waited_secs: u64,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl TimedOutError {
    /// Create a new TimedOutError at the current location.
    #[track_caller]
    pub fn new(
        operation: impl Into<String>,
        pipeline_id: impl Into<String>,
        waited_secs: u64,
    ) -> Self {
        let location = std::panic::Location::caller();
        Self {
            operation: operation.into(),
            pipeline_id: pipeline_id.into(),
            waited_secs,
            line: location.line(),
            file: location.file(),
        }
    }
}
