//! Link Error Types

use byte_queue::QueueError;
use command_matcher::PatternError;
use thiserror::Error;

/// Errors constructing a command link
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    /// Invalid queue configuration
    #[error("Queue configuration error: {0}")]
    Queue(#[from] QueueError),

    /// Invalid pattern set
    #[error("Pattern configuration error: {0}")]
    Pattern(#[from] PatternError),
}
