//! Error types for brc-core

use crate::decimal::DecimalError;
use thiserror::Error;

/// Core error types
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid value: {0}")]
    Parse(#[from] DecimalError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
