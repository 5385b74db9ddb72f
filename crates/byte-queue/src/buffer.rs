//! Fixed-Capacity Byte Queue Implementation

use crate::error::QueueError;
use crate::{OverflowPolicy, DEFAULT_CAPACITY};

/// Outcome of writing one byte into the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enqueued {
    /// Byte stored in a free slot
    Stored,
    /// Queue was full; the returned oldest byte was evicted to make room
    Evicted(u8),
    /// Queue was full; the incoming byte was dropped
    Rejected,
}

impl Enqueued {
    /// Whether the incoming byte is now in the queue
    pub fn accepted(&self) -> bool {
        !matches!(self, Enqueued::Rejected)
    }

    /// Whether the write hit a full queue
    pub fn overflowed(&self) -> bool {
        !matches!(self, Enqueued::Stored)
    }
}

/// Circular FIFO of bytes with a capacity fixed at construction
///
/// Storage is allocated once; `push`, `dequeue` and `peek` never allocate.
#[derive(Debug)]
pub struct ByteQueue {
    /// Pre-allocated storage
    storage: Box<[u8]>,
    /// Next read position
    head: usize,
    /// Next write position
    tail: usize,
    /// Occupancy, 0..=capacity
    count: usize,
    /// Behavior when full
    policy: OverflowPolicy,
    /// Total bytes accepted (for statistics)
    total_written: usize,
}

impl ByteQueue {
    /// Create a new queue holding at most `capacity` bytes
    pub fn new(capacity: usize, policy: OverflowPolicy) -> Result<Self, QueueError> {
        if capacity == 0 {
            return Err(QueueError::ZeroCapacity);
        }
        Ok(Self::with_storage(capacity, policy))
    }

    /// Create a reject-on-full queue with the default capacity (16 bytes)
    pub fn with_default_capacity() -> Self {
        Self::with_storage(DEFAULT_CAPACITY, OverflowPolicy::RejectOnFull)
    }

    /// Empty queue over fresh storage; `capacity` must be non-zero
    fn with_storage(capacity: usize, policy: OverflowPolicy) -> Self {
        Self {
            storage: vec![0u8; capacity].into_boxed_slice(),
            head: 0,
            tail: 0,
            count: 0,
            policy,
            total_written: 0,
        }
    }

    /// Write one byte, applying the overflow policy when full
    pub fn push(&mut self, byte: u8) -> Enqueued {
        let mut outcome = Enqueued::Stored;
        if self.is_full() {
            match self.policy {
                OverflowPolicy::RejectOnFull => return Enqueued::Rejected,
                OverflowPolicy::OverwriteOldest => {
                    // Count is N here, so dequeue cannot fail
                    if let Some(old) = self.dequeue() {
                        outcome = Enqueued::Evicted(old);
                    }
                }
            }
        }

        self.storage[self.tail] = byte;
        self.tail = (self.tail + 1) % self.capacity();
        self.count += 1;
        self.total_written += 1;
        outcome
    }

    /// Write one byte; `false` means it was dropped by a full reject-on-full queue
    pub fn enqueue(&mut self, byte: u8) -> bool {
        self.push(byte).accepted()
    }

    /// Remove and return the oldest byte
    pub fn dequeue(&mut self) -> Option<u8> {
        if self.count == 0 {
            return None;
        }
        let byte = self.storage[self.head];
        self.head = (self.head + 1) % self.capacity();
        self.count -= 1;
        Some(byte)
    }

    /// Read the byte `offset` positions after the head without removing it
    pub fn peek(&self, offset: usize) -> Option<u8> {
        if offset >= self.count {
            return None;
        }
        Some(self.storage[(self.head + offset) % self.capacity()])
    }

    /// Drop up to `n` bytes from the head, returning how many were dropped
    pub fn discard(&mut self, n: usize) -> usize {
        let n = n.min(self.count);
        self.head = (self.head + n) % self.capacity();
        self.count -= n;
        n
    }

    /// Move every buffered byte into `out`, oldest first
    ///
    /// Returns the number of bytes written. Stops early if `out` is shorter
    /// than the occupancy; the remainder stays queued.
    pub fn drain_into(&mut self, out: &mut [u8]) -> usize {
        let mut written = 0;
        while written < out.len() {
            match self.dequeue() {
                Some(byte) => {
                    out[written] = byte;
                    written += 1;
                }
                None => break,
            }
        }
        written
    }

    /// Get the number of bytes currently queued
    pub fn len(&self) -> usize {
        self.count
    }

    /// Check if queue is empty
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Check if queue is full
    pub fn is_full(&self) -> bool {
        self.count == self.capacity()
    }

    /// Get the queue capacity
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Get the overflow policy
    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    /// Get total bytes accepted (for statistics)
    pub fn total_written(&self) -> usize {
        self.total_written
    }

    /// Iterate over the queued bytes, oldest first
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..self.count).filter_map(move |i| self.peek(i))
    }
}

impl Default for ByteQueue {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}
