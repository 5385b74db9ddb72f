//! Recognizer: Pattern Set plus Match State

use crate::carryover::scan_pass;
use crate::consume::{self, Step};
use crate::pattern::{PatternId, PatternSet, PatternState, MAX_PATTERNS};
use crate::source::ByteSource;

/// Patterns that completed at least once during one call, in completion order
pub type Completed = heapless::Vec<PatternId, MAX_PATTERNS>;

/// One completed carryover match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Pattern that completed
    pub id: PatternId,
    /// Offset just past the last matched byte, relative to the pass input
    pub end: usize,
}

fn mark(completed: &mut Completed, id: PatternId) {
    if !completed.contains(&id) {
        // One slot per pattern, so this cannot overflow
        let _ = completed.push(id);
    }
}

/// Streaming recognizer for a fixed pattern set
#[derive(Debug, Clone)]
pub struct Recognizer {
    patterns: PatternSet,
    states: heapless::Vec<PatternState, MAX_PATTERNS>,
}

impl Recognizer {
    /// Create a recognizer with zeroed match state
    pub fn new(patterns: PatternSet) -> Self {
        let mut states = heapless::Vec::new();
        for _ in 0..patterns.len() {
            let _ = states.push(PatternState::default());
        }
        Self { patterns, states }
    }

    /// Registered patterns
    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    /// Match state of one pattern
    pub fn state(&self, id: PatternId) -> Option<&PatternState> {
        self.states.get(id.index())
    }

    /// Completed matches observed for one pattern
    pub fn activations(&self, id: PatternId) -> u32 {
        self.state(id).map(PatternState::activations).unwrap_or(0)
    }

    /// Activation counters in registration order
    pub fn activation_counts(&self) -> impl Iterator<Item = (PatternId, u32)> + '_ {
        self.patterns.ids().zip(self.states.iter().map(PatternState::activations))
    }

    /// Make one consume-on-match decision at the head of `source`
    pub fn consume_step<S: ByteSource>(&mut self, source: &mut S) -> Step {
        let step = consume::step(&self.patterns, source);
        if let Step::Matched(id) = step {
            if let Some(state) = self.states.get_mut(id.index()) {
                state.activate();
            }
        }
        step
    }

    /// Consume-on-match over a source nobody else touches
    ///
    /// Runs until the source is empty or holds only a possible prefix
    /// shorter than the shortest pattern.
    pub fn drain<S: ByteSource>(&mut self, source: &mut S) -> Completed {
        let mut completed = Completed::new();
        loop {
            match self.consume_step(source) {
                Step::Matched(id) => mark(&mut completed, id),
                Step::Dropped(_) => {}
                Step::Waiting | Step::Empty => break,
            }
        }
        completed
    }

    /// Run one carryover pass over `input`
    ///
    /// Nothing is consumed; partial progress at the end of `input` carries
    /// into the next call. An empty pass changes nothing.
    pub fn feed(&mut self, input: &[u8]) -> Completed {
        let mut completed = Completed::new();
        self.feed_with(input, |hit| mark(&mut completed, hit.id));
        completed
    }

    /// Carryover pass reporting every completed match
    ///
    /// Matches arrive grouped by pattern in registration order, each
    /// pattern's matches in stream order.
    pub fn feed_with<F>(&mut self, input: &[u8], mut on_match: F)
    where
        F: FnMut(Match),
    {
        if input.is_empty() {
            return;
        }

        for state in self.states.iter_mut() {
            state.suspended = false;
        }

        for ((id, pattern), state) in self.patterns.iter().zip(self.states.iter_mut()) {
            scan_pass(pattern.as_bytes(), state, input, |end| {
                on_match(Match { id, end })
            });
        }
    }
}
