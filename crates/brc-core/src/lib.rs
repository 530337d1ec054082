//! brc Core - Core types for the brc aggregation engine
//!
//! This crate provides the fundamental data types used throughout brc:
//! - `ScaledValue`: A one-decimal fixed-point value stored as tenths
//! - `parse_scaled`: The allocation-free decimal parser for record values
//! - `KeyStats`: Running min/max/sum/count for a single key
//! - `StatsTable`: Key to `KeyStats` mapping, used for both worker-local
//!   partial tables and the merged global table
//! - `ParallelConfig`: Worker, queue and read-buffer sizing

pub mod decimal;
pub mod error;
pub mod parallel;
pub mod types;

pub use decimal::{parse_scaled, DecimalError};
pub use error::{CoreError, Result};
pub use parallel::{ParallelConfig, DEFAULT_CHUNK_SIZE};
pub use types::*;
