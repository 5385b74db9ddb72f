//! Byte Sources for the Consume-on-Match Scanner

use byte_queue::ByteQueue;

/// A FIFO the scanner can look into and consume from
pub trait ByteSource {
    /// Bytes currently available
    fn available(&self) -> usize;

    /// Byte at `offset` from the head, `None` past the end
    fn peek_at(&self, offset: usize) -> Option<u8>;

    /// Drop `n` bytes from the head, returning how many were dropped
    fn consume(&mut self, n: usize) -> usize;
}

impl ByteSource for ByteQueue {
    fn available(&self) -> usize {
        self.len()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.peek(offset)
    }

    fn consume(&mut self, n: usize) -> usize {
        self.discard(n)
    }
}

impl ByteSource for &[u8] {
    fn available(&self) -> usize {
        self.len()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.get(offset).copied()
    }

    fn consume(&mut self, n: usize) -> usize {
        let rest = *self;
        let n = n.min(rest.len());
        *self = &rest[n..];
        n
    }
}
