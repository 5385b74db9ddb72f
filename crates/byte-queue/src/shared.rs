//! Interrupt-Safe Queue Wrapper
//!
//! Every access to head/tail/count runs inside a critical section, so the
//! RX interrupt can never observe (or produce) a half-updated queue.

use crate::buffer::{ByteQueue, Enqueued};
use crate::error::QueueError;
use crate::OverflowPolicy;
use critical_section::Mutex;
use std::cell::RefCell;
use std::sync::atomic::{AtomicU32, Ordering};

/// Byte queue shared between the RX interrupt and the polling loop
pub struct SharedQueue {
    /// Queue state, only reachable inside a critical section
    inner: Mutex<RefCell<ByteQueue>>,
    /// Capacity, cached so readers need no critical section
    capacity: usize,
    /// Policy, cached for the same reason
    policy: OverflowPolicy,
    /// Writes that hit a full queue (rejected or evicting)
    overflow_events: AtomicU32,
}

impl SharedQueue {
    /// Create a new shared queue
    pub fn new(capacity: usize, policy: OverflowPolicy) -> Result<Self, QueueError> {
        Ok(Self::from_queue(ByteQueue::new(capacity, policy)?))
    }

    /// Wrap an existing queue
    pub fn from_queue(queue: ByteQueue) -> Self {
        Self {
            capacity: queue.capacity(),
            policy: queue.policy(),
            inner: Mutex::new(RefCell::new(queue)),
            overflow_events: AtomicU32::new(0),
        }
    }

    /// Producer entry point: store one byte (safe to call from an ISR)
    ///
    /// Never blocks or allocates; a full queue is counted, not reported.
    pub fn on_byte_received(&self, byte: u8) -> Enqueued {
        let outcome = critical_section::with(|cs| self.inner.borrow_ref_mut(cs).push(byte));
        if outcome.overflowed() {
            self.overflow_events.fetch_add(1, Ordering::Relaxed);
        }
        outcome
    }

    /// Run `f` against the queue inside one critical section
    ///
    /// Keep `f` short: the producer is locked out for its whole duration.
    pub fn with<R>(&self, f: impl FnOnce(&mut ByteQueue) -> R) -> R {
        critical_section::with(|cs| f(&mut self.inner.borrow_ref_mut(cs)))
    }

    /// Remove one byte
    pub fn dequeue(&self) -> Option<u8> {
        self.with(|queue| queue.dequeue())
    }

    /// Move all buffered bytes (up to `out.len()`) into `out`
    pub fn drain_into(&self, out: &mut [u8]) -> usize {
        self.with(|queue| queue.drain_into(out))
    }

    /// Snapshot of the occupancy
    pub fn len(&self) -> usize {
        self.with(|queue| queue.len())
    }

    /// Check if queue is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the queue capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get the overflow policy
    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    /// Number of writes that found the queue full
    pub fn overflow_events(&self) -> u32 {
        self.overflow_events.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for SharedQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedQueue")
            .field("capacity", &self.capacity)
            .field("policy", &self.policy)
            .field("overflow_events", &self.overflow_events())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_overflow_counted_on_reject() {
        let queue = SharedQueue::new(2, OverflowPolicy::RejectOnFull).unwrap();
        for b in b"abcd" {
            queue.on_byte_received(*b);
        }
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.overflow_events(), 2);
        assert_eq!(queue.dequeue(), Some(b'a'));
    }

    #[test]
    fn test_overflow_counted_on_evict() {
        let queue = SharedQueue::new(4, OverflowPolicy::OverwriteOldest).unwrap();
        for b in b"ABCDEF" {
            assert!(queue.on_byte_received(*b).accepted());
        }
        assert_eq!(queue.overflow_events(), 2);

        let mut out = [0u8; 8];
        let n = queue.drain_into(&mut out);
        assert_eq!(&out[..n], b"CDEF");
        assert!(queue.is_empty());
    }

    #[test]
    fn test_concurrent_producer_preserves_order() {
        let queue = Arc::new(SharedQueue::new(64, OverflowPolicy::RejectOnFull).unwrap());
        let producer = Arc::clone(&queue);

        let handle = std::thread::spawn(move || {
            let mut sent = 0u32;
            while sent < 2000 {
                if producer.on_byte_received((sent % 251) as u8).accepted() {
                    sent += 1;
                } else {
                    std::thread::yield_now();
                }
            }
        });

        let mut received = Vec::with_capacity(2000);
        while received.len() < 2000 {
            match queue.dequeue() {
                Some(b) => received.push(b),
                None => std::thread::yield_now(),
            }
        }
        handle.join().unwrap();

        let expected: Vec<u8> = (0..2000u32).map(|i| (i % 251) as u8).collect();
        assert_eq!(received, expected);
        assert!(queue.is_empty());
    }
}
