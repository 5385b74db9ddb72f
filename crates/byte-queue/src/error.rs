//! Queue Error Types

use thiserror::Error;

/// Errors raised while constructing a queue
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    /// A queue must be able to hold at least one byte
    #[error("Queue capacity must be at least 1")]
    ZeroCapacity,
}
