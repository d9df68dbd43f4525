//! Error taxonomy for the pipeline.
//!
//! Readers and solvers never produce a recoverable error: any fault in
//! those layers is a sizing or invariant bug and is an assertion, not a
//! `PipelineError`. Only the boundary the CLI actually touches — opening
//! and mapping the dictionary, and writing the solutions file — can fail
//! in a way a caller should be able to handle.

use thiserror::Error;

/// Errors that can surface from running the pipeline end to end.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The dictionary could not be opened, stat'd, or mapped.
    #[error("could not read dictionary: {0}")]
    Io(#[from] std::io::Error),

    /// The solutions file could not be opened or written.
    #[error("could not write solutions file: {0}")]
    OutputWrite(std::io::Error),

    /// A fixed-size table filled up. This means the static capacities in
    /// `context.rs` are too small for the input dictionary, not that the
    /// input itself is malformed.
    #[error("capacity exceeded: {0}")]
    CapacityExceeded(&'static str),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
