//! Engine error types

use brc_core::CoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort the aggregation pipeline.
///
/// Malformed records never surface here; workers drop them and count them.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("Chunk queue closed before the input was fully read")]
    QueueClosed,

    #[error("Parser worker {0} panicked")]
    WorkerPanicked(usize),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
