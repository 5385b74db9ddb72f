//! Pattern Registration Errors

use thiserror::Error;

/// Invalid pattern set supplied at initialization
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// No patterns registered
    #[error("Pattern set is empty")]
    Empty,

    /// Zero-length pattern
    #[error("Pattern {index} is empty")]
    EmptyPattern { index: usize },

    /// Pattern contains a byte outside printable ASCII
    #[error("Pattern {index} contains non-printable byte {byte:#04X}")]
    NonPrintable { index: usize, byte: u8 },

    /// Pattern longer than the fixed per-pattern storage
    #[error("Pattern {index} is {len} bytes long, maximum is {max}")]
    TooLong { index: usize, len: usize, max: usize },

    /// More patterns than slots
    #[error("{count} patterns registered, maximum is {max}")]
    TooMany { count: usize, max: usize },
}
