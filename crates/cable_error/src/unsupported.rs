//! Missing-capability error types.

/// None of the preferred capture formats is supported.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display(
    "No supported capture format among [{}] at line {} in {}",
    tried.join(", "),
    line,
    file
)]
pub struct UnsupportedCapabilityError {
    /// Formats probed, in preference order
    pub tried: Vec<String>,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl UnsupportedCapabilityError {
    /// Create a new UnsupportedCapabilityError at the current location.
    #[track_caller]
    pub fn new(tried: Vec<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            tried,
            line: location.line(),
            file: location.file(),
        }
    }
}
