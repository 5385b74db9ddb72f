//! Bounded Byte Queue
//!
//! Provides a fixed-capacity circular byte store written by a single
//! producer (a serial RX interrupt) and drained by a single cooperative
//! consumer (the polling loop).

mod buffer;
mod error;
mod shared;

pub use buffer::{ByteQueue, Enqueued};
pub use error::QueueError;
pub use shared::SharedQueue;

use serde::{Deserialize, Serialize};

/// Default queue capacity (matches the 16-byte RX buffer of the firmware)
pub const DEFAULT_CAPACITY: usize = 16;

/// What a full queue does with a newly arriving byte
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Drop the incoming byte and leave the queue untouched
    #[default]
    RejectOnFull,
    /// Evict the oldest byte to make room for the incoming one
    OverwriteOldest,
}
