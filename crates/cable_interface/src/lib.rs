//! Collaborator trait definitions for the Cable session orchestrator.
//!
//! The orchestration core never talks to a network, a GPU or a file system
//! directly; it goes through the traits in this crate. Lightweight in-process
//! adapters are provided for local runs.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod adapters;
mod traits;

pub use adapters::{FileArtifactSink, InMemoryPipeline, InMemoryTransport, NullCapture};
pub use traits::{
    ArtifactSink, MediaCapture, NarrativeBackend, PipelineBackend, StreamTransport, ThemeCatalog,
};
