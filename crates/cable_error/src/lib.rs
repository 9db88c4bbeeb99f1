//! Error types for the Cable session orchestrator.
//!
//! This crate provides the error taxonomy shared by every Cable crate.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use cable_error::{CableErrorKind, CableResult, NotReadyError, NotReadyErrorKind};
//!
//! fn start_recording() -> CableResult<()> {
//!     Err(NotReadyError::new(NotReadyErrorKind::NoStream))?
//! }
//!
//! match start_recording() {
//!     Ok(()) => println!("Recording"),
//!     Err(e) => assert!(matches!(e.kind(), CableErrorKind::NotReady(_))),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod config;
mod empty_result;
mod error;
mod not_ready;
mod timed_out;
mod unsupported;

pub use backend::{BackendError, BackendErrorKind};
pub use config::ConfigError;
pub use empty_result::EmptyResultError;
pub use error::{CableError, CableErrorKind, CableResult};
pub use not_ready::{NotReadyError, NotReadyErrorKind};
pub use timed_out::TimedOutError;
pub use unsupported::UnsupportedCapabilityError;
