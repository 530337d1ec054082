//! Parallel pipeline sizing.
//!
//! This module provides the knobs that shape the producer/worker pipeline:
//! how many parser workers run, how many chunks may wait in the queue ahead
//! of them, and how many bytes each read pulls from the input.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// Default read buffer size (1 MiB)
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;

/// Configuration for the parallel aggregation pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelConfig {
    /// Number of parser workers.
    /// Set to 0 to use the number of CPU cores minus one (at least 1).
    /// Default: 0
    pub workers: usize,

    /// Number of chunks that may wait in the queue before the reader blocks.
    /// Set to 0 to use the effective worker count minus one (at least 1).
    /// Default: 0
    pub queue_capacity: usize,

    /// Bytes requested from the input per read.
    /// Default: 1 MiB
    pub chunk_size: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            queue_capacity: 0,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl ParallelConfig {
    /// Creates a new ParallelConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration with a single worker and a single queue slot.
    pub fn sequential() -> Self {
        Self {
            workers: 1,
            queue_capacity: 1,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Returns the effective number of parser workers.
    /// One core is left for the reader when `workers` is 0.
    pub fn effective_workers(&self) -> usize {
        if self.workers == 0 {
            num_cpus::get().saturating_sub(1).max(1)
        } else {
            self.workers
        }
    }

    /// Returns the effective queue capacity.
    pub fn effective_queue_capacity(&self) -> usize {
        if self.queue_capacity == 0 {
            self.effective_workers().saturating_sub(1).max(1)
        } else {
            self.queue_capacity
        }
    }

    /// Checks that the configuration can drive a pipeline.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(CoreError::InvalidConfig(
                "chunk_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Builder method to set the worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Builder method to set the queue capacity.
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Builder method to set the read buffer size.
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ParallelConfig::default();
        assert_eq!(config.workers, 0);
        assert_eq!(config.queue_capacity, 0);
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_auto_sizing_never_drops_below_one() {
        let config = ParallelConfig::default();
        let workers = config.effective_workers();
        assert!(workers >= 1);
        assert_eq!(workers, num_cpus::get().saturating_sub(1).max(1));
        assert_eq!(
            config.effective_queue_capacity(),
            workers.saturating_sub(1).max(1)
        );
    }

    #[test]
    fn test_explicit_sizing() {
        let config = ParallelConfig::new().with_workers(8);
        assert_eq!(config.effective_workers(), 8);
        assert_eq!(config.effective_queue_capacity(), 7);

        let config = config.with_queue_capacity(32);
        assert_eq!(config.effective_queue_capacity(), 32);

        let config = ParallelConfig::new().with_workers(1);
        assert_eq!(config.effective_queue_capacity(), 1);
    }

    #[test]
    fn test_sequential_config() {
        let config = ParallelConfig::sequential();
        assert_eq!(config.effective_workers(), 1);
        assert_eq!(config.effective_queue_capacity(), 1);
    }

    #[test]
    fn test_zero_chunk_size_is_rejected() {
        let config = ParallelConfig::new().with_chunk_size(0);
        assert!(matches!(config.validate(), Err(CoreError::InvalidConfig(_))));
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: ParallelConfig = serde_yaml::from_str("workers: 3").unwrap();
        assert_eq!(config.workers, 3);
        assert_eq!(config.queue_capacity, 0);
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
    }
}
