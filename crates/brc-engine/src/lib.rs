//! brc Engine - Parallel aggregation of `key;value` record files
//!
//! This crate provides:
//! - Line-aligned chunking of an input stream (`ChunkSplitter`, `ChunkReader`)
//! - Parser workers accumulating per-key min/max/sum/count (`ParseWorker`)
//! - Order-independent merging of worker tables (`merge_partials`)
//! - Rendering of the sorted `{key=min/mean/max, ...}` summary (`render`)
//! - The pipeline entry points tying them together (`process`, `run`)
//!
//! ## Usage
//!
//! ```no_run
//! use brc_engine::{process, EngineConfig};
//!
//! fn main() -> brc_engine::Result<()> {
//!     let config = EngineConfig::new("measurements.txt");
//!     println!("{}", process(&config)?);
//!     Ok(())
//! }
//! ```

pub mod chunk;
pub mod error;
pub mod format;
pub mod merge;
pub mod pipeline;
pub mod worker;

pub use chunk::{ChunkReader, ChunkSplitter, RawChunk, ReaderStats};
pub use error::{EngineError, Result};
pub use format::{render, Report};
pub use merge::{merge_outputs, merge_partials};
pub use pipeline::{process, run, run_reader, EngineConfig, Summary};
pub use worker::{parse_record, ParseWorker, RecordError, WorkerOutput, WorkerStats};
