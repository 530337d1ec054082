//! Parser workers.
//!
//! Each worker owns a private [`StatsTable`] for its whole lifetime, so the
//! hot loop never takes a lock. Chunks are scanned record by record: the key
//! runs up to the first `;`, the value from there to the line break (or the
//! end of the chunk for an unterminated final record).

use crate::chunk::RawChunk;
use brc_core::{parse_scaled, DecimalError, ScaledValue, StatsTable};
use crossbeam_channel::Receiver;
use thiserror::Error;
use tracing::debug;

/// Initial capacity of a worker's table; real inputs have a few hundred keys
const INITIAL_KEYS: usize = 1024;

/// Why a record was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("blank line")]
    Blank,

    #[error("missing ';' separator")]
    MissingSeparator,

    #[error("empty key")]
    EmptyKey,

    #[error("invalid value: {0}")]
    Value(#[from] DecimalError),
}

/// Split one record (without its line break) into key and scaled value.
#[inline]
pub fn parse_record(line: &[u8]) -> Result<(&[u8], ScaledValue), RecordError> {
    if line.is_empty() {
        return Err(RecordError::Blank);
    }
    let sep = line
        .iter()
        .position(|&b| b == b';')
        .ok_or(RecordError::MissingSeparator)?;
    let (key, value) = (&line[..sep], &line[sep + 1..]);
    if key.is_empty() {
        return Err(RecordError::EmptyKey);
    }
    Ok((key, parse_scaled(value)?))
}

/// Counters for one worker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    /// Chunks consumed
    pub chunks: u64,
    /// Records folded into the table
    pub records: u64,
    /// Records dropped as malformed
    pub skipped: u64,
}

impl WorkerStats {
    /// Add another worker's counters
    pub fn absorb(&mut self, other: &WorkerStats) {
        self.chunks += other.chunks;
        self.records += other.records;
        self.skipped += other.skipped;
    }
}

/// What a worker hands to the merger when the queue is drained
#[derive(Debug)]
pub struct WorkerOutput {
    pub id: usize,
    pub table: StatsTable,
    pub stats: WorkerStats,
}

/// A single parser worker
pub struct ParseWorker {
    id: usize,
    debug: bool,
    table: StatsTable,
    stats: WorkerStats,
}

impl ParseWorker {
    /// Create a worker with an empty partial table.
    ///
    /// With `debug` set every dropped record is logged.
    pub fn new(id: usize, debug: bool) -> Self {
        Self {
            id,
            debug,
            table: StatsTable::with_capacity(INITIAL_KEYS),
            stats: WorkerStats::default(),
        }
    }

    /// Parse every record in a chunk into the partial table
    pub fn parse_chunk(&mut self, chunk: &[u8]) {
        self.stats.chunks += 1;

        let mut rest = chunk;
        while !rest.is_empty() {
            let (line, next) = match rest.iter().position(|&b| b == b'\n') {
                Some(end) => (&rest[..end], &rest[end + 1..]),
                None => (rest, &rest[rest.len()..]),
            };
            rest = next;

            match parse_record(line) {
                Ok((key, value)) => {
                    self.table.record(key, value);
                    self.stats.records += 1;
                }
                Err(e) => {
                    self.stats.skipped += 1;
                    if self.debug {
                        debug!(
                            worker = self.id,
                            error = %e,
                            line = %String::from_utf8_lossy(line),
                            "Skipping malformed record"
                        );
                    }
                }
            }
        }
    }

    /// Consume chunks until the queue is closed and drained
    pub fn run(mut self, queue: Receiver<RawChunk>) -> WorkerOutput {
        for chunk in queue.iter() {
            self.parse_chunk(chunk.bytes());
        }
        debug!(
            worker = self.id,
            chunks = self.stats.chunks,
            records = self.stats.records,
            skipped = self.stats.skipped,
            keys = self.table.len(),
            "Worker finished"
        );
        self.finish()
    }

    /// Hand over the partial table
    pub fn finish(self) -> WorkerOutput {
        WorkerOutput {
            id: self.id,
            table: self.table,
            stats: self.stats,
        }
    }
}
