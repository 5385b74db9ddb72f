//! Streaming Command Recognizer
//!
//! Detects a fixed, ordered set of ASCII command tokens in an unbounded
//! byte stream using bounded memory. Two disciplines are provided:
//!
//! - **consume-on-match**: scans the head of a byte queue, consuming whole
//!   matches and dropping unmatched bytes one at a time
//! - **carryover**: scans chunks ("passes") without consuming anything,
//!   carrying partial-match progress from one pass into the next
//!
//! A deployment picks one discipline; they are never mixed on one stream.

mod carryover;
mod consume;
mod error;
mod pattern;
mod recognizer;
mod source;

pub use consume::Step;
pub use error::PatternError;
pub use pattern::{Pattern, PatternId, PatternSet, PatternState, MAX_PATTERNS, MAX_PATTERN_LEN};
pub use recognizer::{Completed, Match, Recognizer};
pub use source::ByteSource;

use serde::{Deserialize, Serialize};

/// Matching discipline used to drain the input stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Discipline {
    /// Consume matched bytes, discard unmatched ones
    #[default]
    ConsumeOnMatch,
    /// Keep per-pattern progress across passes
    Carryover,
}
