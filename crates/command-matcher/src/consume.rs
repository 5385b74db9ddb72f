//! Consume-on-Match Scanner
//!
//! One call to [`step`] makes exactly one decision about the byte at the
//! head of the source. Callers that share the source with an interrupt
//! run each step inside its own critical section.

use crate::pattern::{PatternId, PatternSet};
use crate::source::ByteSource;

/// Result of one head decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A pattern matched at the head and its bytes were consumed
    Matched(PatternId),
    /// Nothing matched at the head; this byte was dropped
    Dropped(u8),
    /// Too few bytes to decide and the buffered bytes may still complete a pattern
    Waiting,
    /// Source is empty
    Empty,
}

enum Comparison {
    /// Every pattern byte matched
    Full,
    /// All available bytes matched but the source ran out
    Prefix,
    Mismatch,
}

fn compare<S: ByteSource>(pattern: &[u8], source: &S) -> Comparison {
    for (offset, &expected) in pattern.iter().enumerate() {
        match source.peek_at(offset) {
            None => return Comparison::Prefix,
            Some(byte) if byte != expected => return Comparison::Mismatch,
            Some(_) => {}
        }
    }
    Comparison::Full
}

/// Decide the fate of the head byte
///
/// Patterns are tried in registration order and the first full match wins,
/// even when a later pattern would match more bytes.
pub fn step<S: ByteSource>(patterns: &PatternSet, source: &mut S) -> Step {
    let available = source.available();
    if available == 0 {
        return Step::Empty;
    }

    let mut viable = false;
    for (id, pattern) in patterns.iter() {
        match compare(pattern.as_bytes(), source) {
            Comparison::Full => {
                source.consume(pattern.len());
                return Step::Matched(id);
            }
            Comparison::Prefix => viable = true,
            Comparison::Mismatch => {}
        }
    }

    if viable && available < patterns.min_len() {
        return Step::Waiting;
    }

    // available > 0, so the head byte exists
    match source.peek_at(0) {
        Some(byte) => {
            source.consume(1);
            Step::Dropped(byte)
        }
        None => Step::Empty,
    }
}
