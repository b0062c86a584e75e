//! Part buffer — coalesces undersized chunks into protocol-legal parts.

use bytes::{Bytes, BytesMut};

pub use partflow_core::types::part::MIN_PART_SIZE;

/// Accumulates incoming bytes until the minimum part size is reached,
/// then yields a full part's worth of bytes.
///
/// Between calls the pending length is always below the threshold; a
/// single input chunk larger than the threshold is forwarded whole as
/// one part (oversized chunks are never split).
#[derive(Debug)]
pub struct PartBuffer {
    /// Bytes not yet large enough to flush.
    pending: BytesMut,
    /// Threshold at which accumulated bytes are emitted as a part.
    min_part_size: usize,
}

impl PartBuffer {
    /// Create a buffer with the protocol-minimum part size (5 MiB).
    pub fn new() -> Self {
        Self::with_min_part_size(MIN_PART_SIZE)
    }

    /// Create a buffer with a custom threshold.
    ///
    /// Thresholds below 5 MiB are only valid against stores with smaller
    /// limits (or in tests).
    pub fn with_min_part_size(min_part_size: usize) -> Self {
        Self {
            pending: BytesMut::new(),
            min_part_size,
        }
    }

    /// Append a chunk, returning the accumulated bytes once they reach
    /// the threshold.
    ///
    /// The chunk may be any length, including zero. When the pending
    /// length reaches or exceeds the threshold everything accumulated so
    /// far is returned as one part and the buffer is emptied.
    pub fn append(&mut self, chunk: &[u8]) -> Option<Bytes> {
        self.pending.extend_from_slice(chunk);
        if self.pending.len() >= self.min_part_size {
            Some(self.pending.split().freeze())
        } else {
            None
        }
    }

    /// Drain the residual bytes at end-of-stream.
    ///
    /// The last part of a multipart upload is exempt from the minimum
    /// size rule, so whatever remains is emitted as-is. Returns `None`
    /// when nothing is pending.
    pub fn flush(&mut self) -> Option<Bytes> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.split().freeze())
        }
    }

    /// Number of bytes currently pending.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

impl Default for PartBuffer {
    fn default() -> Self {
        Self::new()
    }
}
