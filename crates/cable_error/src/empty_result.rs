//! Empty-recording error types.

/// A recording finished without any captured data.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display(
    "Recording captured no data ({} chunks, {} bytes) at line {} in {}",
    chunks,
    bytes,
    line,
    file
)]
pub struct EmptyResultError {
    /// Number of chunks received
    pub chunks: usize,
    /// Total bytes received
    pub bytes: usize,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl EmptyResultError {
    /// Create a new EmptyResultError at the current location.
    #[track_caller]
    pub fn new(chunks: usize, bytes: usize) -> Self {
        let location = std::panic::Location::caller();
        Self {
            chunks,
            bytes,
            line: location.line(),
            file: location.file(),
        }
    }
}
