//! Recognized Commands in Stream Order

use command_matcher::PatternId;

/// One recognized command occurrence
///
/// Offsets count bytes from the start of the stream the link has scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// Pattern that matched
    pub id: PatternId,
    /// Offset of the first matched byte
    pub start: u64,
    /// Offset just past the last matched byte
    pub end: u64,
}

/// Turns overlapping carryover completions into one command per position
///
/// Completions sharing a start offset are the same bytes read as patterns
/// of different length; the lowest id among them wins, as it would when
/// consume-on-match sees all the bytes at once. A winner is held back while
/// a higher-priority pattern is still mid-match from the same start.
#[derive(Debug, Default)]
pub(crate) struct Resolver {
    /// Completions not yet decided, kept across polls
    pending: Vec<Token>,
    /// End of the last emitted token; earlier starts are already spoken for
    resolved_end: u64,
}

impl Resolver {
    /// Decide what can be decided, appending winners to `out` in stream order
    ///
    /// `blocked(token)` reports whether a pattern with a lower id than
    /// `token.id` is still mid-match from `token.start`.
    pub(crate) fn resolve<B>(&mut self, hits: &[Token], blocked: B, out: &mut Vec<Token>)
    where
        B: Fn(&Token) -> bool,
    {
        self.pending.extend_from_slice(hits);
        self.pending.sort_unstable_by_key(|t| (t.start, t.id));

        let mut decided = 0;
        for token in &self.pending {
            if token.start < self.resolved_end {
                decided += 1;
                continue;
            }
            if blocked(token) {
                break;
            }
            out.push(*token);
            self.resolved_end = token.end;
            decided += 1;
        }
        self.pending.drain(..decided);
    }

    /// Completions waiting for more input
    pub(crate) fn pending(&self) -> usize {
        self.pending.len()
    }
}
