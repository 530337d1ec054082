//! Pipeline orchestration.
//!
//! One reader (the calling thread) feeds a bounded queue; a fixed pool of
//! parser workers drains it into private tables. Once the reader is done the
//! queue is closed, every worker is joined, and only then are the partial
//! tables merged. The join is what makes the lock-free merge safe: no table
//! is read while its worker might still be writing it.

use crate::chunk::{ChunkReader, RawChunk, ReaderStats};
use crate::error::{EngineError, Result};
use crate::format::render;
use crate::merge::merge_outputs;
use crate::worker::{ParseWorker, WorkerOutput};
use brc_core::{ParallelConfig, StatsTable};
use crossbeam_channel::bounded;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Resolved configuration for one aggregation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Input file of `key;value` records
    pub input: PathBuf,

    /// Log every dropped record
    #[serde(default)]
    pub debug: bool,

    /// Worker pool and read sizing
    #[serde(default)]
    pub parallel: ParallelConfig,
}

impl EngineConfig {
    /// Create a configuration for `input` with default sizing
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            debug: false,
            parallel: ParallelConfig::default(),
        }
    }

    /// Builder method to enable debug logging of dropped records.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Builder method to set pipeline sizing.
    pub fn with_parallel(mut self, parallel: ParallelConfig) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Outcome of a run: the merged table plus counters
#[derive(Debug, Clone, Default)]
pub struct Summary {
    /// Global table
    pub table: StatsTable,
    /// Bytes read from the input
    pub bytes_read: u64,
    /// Chunks dispatched to workers
    pub chunks: u64,
    /// Records aggregated
    pub records: u64,
    /// Records dropped as malformed
    pub skipped: u64,
    /// Workers that ran
    pub workers: usize,
    /// Wall time of the run
    pub elapsed: Duration,
}

impl Summary {
    /// Render the `{key=min/mean/max, ...}` line
    pub fn render(&self) -> String {
        render(&self.table)
    }
}

/// Aggregate the configured input file and render the summary line.
pub fn process(config: &EngineConfig) -> Result<String> {
    Ok(run(config)?.render())
}

/// Aggregate the configured input file.
pub fn run(config: &EngineConfig) -> Result<Summary> {
    config.parallel.validate()?;

    let file = File::open(&config.input).map_err(|source| EngineError::Open {
        path: config.input.clone(),
        source,
    })?;
    debug!(path = %config.input.display(), "Opened input");

    run_reader(file, &config.parallel, config.debug)
}

/// Aggregate any byte stream.
///
/// The stream is read only by the calling thread. An I/O error aborts the
/// run after the workers have drained what was already queued; no partial
/// result is returned.
pub fn run_reader<R: Read>(reader: R, parallel: &ParallelConfig, debug: bool) -> Result<Summary> {
    parallel.validate()?;

    let workers = parallel.effective_workers();
    let capacity = parallel.effective_queue_capacity();
    let start = Instant::now();
    debug!(
        workers,
        queue_capacity = capacity,
        chunk_size = parallel.chunk_size,
        "Starting pipeline"
    );

    let (tx, rx) = bounded::<RawChunk>(capacity);

    let (read_result, joined) = thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|id| {
                let rx = rx.clone();
                scope.spawn(move || ParseWorker::new(id, debug).run(rx))
            })
            .collect();
        drop(rx);

        let read_result = ChunkReader::new(reader, parallel.chunk_size).run(&tx);
        // Closing the queue lets workers exit once it is drained
        drop(tx);

        let joined: Vec<Result<WorkerOutput>> = handles
            .into_iter()
            .enumerate()
            .map(|(id, handle)| handle.join().map_err(|_| EngineError::WorkerPanicked(id)))
            .collect();
        (read_result, joined)
    });

    let outputs = joined.into_iter().collect::<Result<Vec<_>>>()?;
    let ReaderStats { bytes, chunks } = read_result?;

    let (table, totals) = merge_outputs(outputs);
    let elapsed = start.elapsed();

    info!(
        bytes,
        chunks,
        records = totals.records,
        skipped = totals.skipped,
        keys = table.len(),
        elapsed_ms = elapsed.as_millis() as u64,
        "Aggregation complete"
    );

    Ok(Summary {
        table,
        bytes_read: bytes,
        chunks,
        records: totals.records,
        skipped: totals.skipped,
        workers,
        elapsed,
    })
}
