//! Line-aligned chunking of the input stream.
//!
//! The reader pulls fixed-size buffers from the input. A buffer almost never
//! ends exactly on a record boundary, so everything after its last `\n` is
//! held back as carry-over and prepended to the next chunk. Every chunk handed
//! to a worker therefore holds whole records only.

use crate::error::{EngineError, Result};
use crossbeam_channel::Sender;
use std::io::{ErrorKind, Read};
use tracing::{debug, trace};

/// A run of complete records, owned by whichever worker dequeues it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawChunk {
    seq: u64,
    bytes: Vec<u8>,
}

impl RawChunk {
    /// Create a chunk
    pub fn new(seq: u64, bytes: Vec<u8>) -> Self {
        Self { seq, bytes }
    }

    /// Position of this chunk in read order
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Chunk contents
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Chunk length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True for a zero-length chunk
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Take the contents
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Splits read buffers at their last line break, carrying the remainder over
#[derive(Debug, Default)]
pub struct ChunkSplitter {
    carry: Vec<u8>,
}

impl ChunkSplitter {
    /// Create a splitter with no carry-over
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes currently held back waiting for their line break
    pub fn carry(&self) -> &[u8] {
        &self.carry
    }

    /// Split one read buffer.
    ///
    /// Returns the carry-over followed by every complete record in `buf`, or
    /// `None` when `buf` holds no line break at all, in which case the whole
    /// buffer joins the carry-over.
    pub fn split(&mut self, buf: &[u8]) -> Option<Vec<u8>> {
        let Some(last_newline) = buf.iter().rposition(|&b| b == b'\n') else {
            self.carry.extend_from_slice(buf);
            return None;
        };
        let (complete, rest) = buf.split_at(last_newline + 1);

        let mut chunk = Vec::with_capacity(self.carry.len() + complete.len());
        chunk.extend_from_slice(&self.carry);
        chunk.extend_from_slice(complete);

        self.carry.clear();
        self.carry.extend_from_slice(rest);
        Some(chunk)
    }

    /// Flush the final, unterminated record at end of stream
    pub fn finish(&mut self) -> Option<Vec<u8>> {
        if self.carry.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.carry))
        }
    }
}

/// Counters gathered by the reader
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderStats {
    /// Bytes read from the input
    pub bytes: u64,
    /// Chunks produced
    pub chunks: u64,
}

/// Produces line-aligned chunks from a byte stream.
///
/// Iterating yields chunks in read order; [`ChunkReader::run`] publishes them
/// onto a bounded queue instead.
pub struct ChunkReader<R> {
    reader: R,
    buf: Vec<u8>,
    splitter: ChunkSplitter,
    stats: ReaderStats,
    finished: bool,
}

impl<R: Read> ChunkReader<R> {
    /// Create a reader that requests `chunk_size` bytes per read
    pub fn new(reader: R, chunk_size: usize) -> Self {
        Self {
            reader,
            buf: vec![0; chunk_size.max(1)],
            splitter: ChunkSplitter::new(),
            stats: ReaderStats::default(),
            finished: false,
        }
    }

    /// Counters so far
    pub fn stats(&self) -> ReaderStats {
        self.stats
    }

    /// Read until the next chunk is ready.
    ///
    /// Returns `Ok(None)` once the stream and the carry-over are exhausted.
    pub fn next_chunk(&mut self) -> Result<Option<RawChunk>> {
        while !self.finished {
            let n = match self.reader.read(&mut self.buf) {
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.finished = true;
                    return Err(EngineError::Io(e));
                }
            };

            if n == 0 {
                self.finished = true;
                if let Some(tail) = self.splitter.finish() {
                    trace!(bytes = tail.len(), "Flushing unterminated final record");
                    return Ok(Some(self.emit(tail)));
                }
                break;
            }

            self.stats.bytes += n as u64;
            if let Some(chunk) = self.splitter.split(&self.buf[..n]) {
                return Ok(Some(self.emit(chunk)));
            }
        }
        Ok(None)
    }

    fn emit(&mut self, bytes: Vec<u8>) -> RawChunk {
        let chunk = RawChunk::new(self.stats.chunks, bytes);
        self.stats.chunks += 1;
        chunk
    }

    /// Publish every chunk onto `queue`, blocking while it is full.
    ///
    /// Returns once the input is exhausted. Dropping the sender afterwards is
    /// what tells workers no more chunks are coming.
    pub fn run(mut self, queue: &Sender<RawChunk>) -> Result<ReaderStats> {
        while let Some(chunk) = self.next_chunk()? {
            trace!(seq = chunk.seq(), bytes = chunk.len(), "Publishing chunk");
            queue.send(chunk).map_err(|_| EngineError::QueueClosed)?;
        }
        debug!(
            bytes = self.stats.bytes,
            chunks = self.stats.chunks,
            "Input exhausted"
        );
        Ok(self.stats)
    }
}

impl<R: Read> Iterator for ChunkReader<R> {
    type Item = Result<RawChunk>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_chunk().transpose()
    }
}
