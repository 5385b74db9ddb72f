//! Transmit Queue
//!
//! Outgoing lines are written byte by byte into a reject-on-full queue that
//! the TX interrupt (or the host simulation) drains.

use crate::error::FirmwareError;
use byte_queue::{OverflowPolicy, SharedQueue};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::warn;

/// TX side of the serial link
#[derive(Debug, Clone)]
pub struct Transmitter {
    queue: Arc<SharedQueue>,
    dropped: Arc<AtomicU64>,
}

impl Transmitter {
    /// Create a transmitter with its own queue
    pub fn new(capacity: usize) -> Result<Self, FirmwareError> {
        let queue = SharedQueue::new(capacity, OverflowPolicy::RejectOnFull)?;
        Ok(Self {
            queue: Arc::new(queue),
            dropped: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Queue one line; returns the number of bytes that did not fit
    pub fn send_line(&self, line: &str) -> usize {
        let lost = line
            .bytes()
            .filter(|&b| !self.queue.on_byte_received(b).accepted())
            .count();
        if lost > 0 {
            self.dropped.fetch_add(lost as u64, Ordering::Relaxed);
            warn!(
                "TX queue full: dropped {} of {} bytes of {:?}",
                lost,
                line.len(),
                line.trim_end()
            );
        }
        lost
    }

    /// Move pending bytes into `out`
    pub fn drain_into(&self, out: &mut [u8]) -> usize {
        self.queue.drain_into(out)
    }

    /// Bytes waiting to be sent
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Queue capacity
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// Total bytes lost to a full queue
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
