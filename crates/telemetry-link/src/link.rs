//! Command Link Implementation

use crate::config::LinkConfig;
use crate::error::LinkError;
use crate::token::{Resolver, Token};
use byte_queue::{ByteQueue, SharedQueue};
use command_matcher::{Completed, Discipline, Pattern, PatternId, PatternSet, Recognizer, Step};
use std::sync::Arc;
use tracing::{debug, info};

/// Producer handle given to the RX interrupt
///
/// Only enqueues; never touches the recognizer, blocks, allocates or logs.
#[derive(Debug, Clone)]
pub struct Producer {
    queue: Arc<SharedQueue>,
}

impl Producer {
    /// RX hook: store one received byte, `false` if it was dropped
    pub fn on_byte_received(&self, byte: u8) -> bool {
        self.queue.on_byte_received(byte).accepted()
    }
}

fn record(completed: &mut Completed, id: PatternId) {
    if !completed.contains(&id) {
        let _ = completed.push(id);
    }
}

/// One consume-on-match decision; a full queue never waits
///
/// A full queue can never receive the bytes it is waiting for, so the head
/// byte is dropped instead.
fn head_step(recognizer: &mut Recognizer, queue: &mut ByteQueue) -> Step {
    match recognizer.consume_step(queue) {
        Step::Waiting if queue.is_full() => queue.dequeue().map(Step::Dropped).unwrap_or(Step::Empty),
        step => step,
    }
}

/// Whether a pattern ranked above `token` is mid-match from `token.start`
fn mid_match_before(recognizer: &Recognizer, position: u64, token: &Token) -> bool {
    recognizer
        .patterns()
        .ids()
        .take_while(|id| *id < token.id)
        .any(|id| {
            recognizer.state(id).map_or(false, |state| {
                let carried = state.save_index() as u64;
                carried > 0 && position.checked_sub(carried) == Some(token.start)
            })
        })
}

/// RX queue plus recognizer, owned by the polling loop
pub struct CommandLink {
    /// Queue shared with the producer
    queue: Arc<SharedQueue>,
    /// Pattern set and match state (consumer only)
    recognizer: Recognizer,
    /// Matching discipline for this deployment
    discipline: Discipline,
    /// Pass buffer for the carryover discipline, sized to the queue
    scratch: Box<[u8]>,
    /// Residue of chunks given to `feed` in consume-on-match mode
    staging: ByteQueue,
    /// Stream offset of the next byte the recognizer will see from the RX queue
    position: u64,
    /// Raw matches of the current poll
    hits: Vec<Token>,
    /// Carryover completions awaiting a decision
    resolver: Resolver,
    /// Number of completed polls
    polls: u64,
}

impl CommandLink {
    /// Create a link, validating capacity and patterns up front
    pub fn new(config: &LinkConfig) -> Result<Self, LinkError> {
        let queue = SharedQueue::new(config.capacity, config.overflow_policy)?;
        let staging = ByteQueue::new(config.capacity, config.overflow_policy)?;
        let patterns = PatternSet::new(&config.patterns)?;

        info!(
            "Command link ready: capacity={} policy={:?} discipline={:?} patterns={}",
            config.capacity,
            config.overflow_policy,
            config.discipline,
            patterns.len()
        );

        Ok(Self {
            queue: Arc::new(queue),
            recognizer: Recognizer::new(patterns),
            discipline: config.discipline,
            scratch: vec![0u8; config.capacity].into_boxed_slice(),
            staging,
            position: 0,
            hits: Vec::with_capacity(config.capacity),
            resolver: Resolver::default(),
            polls: 0,
        })
    }

    /// Handle for the RX interrupt
    pub fn producer(&self) -> Producer {
        Producer {
            queue: Arc::clone(&self.queue),
        }
    }

    /// Same as `producer().on_byte_received(byte)`
    pub fn on_byte_received(&self, byte: u8) -> bool {
        self.queue.on_byte_received(byte).accepted()
    }

    /// Drain buffered bytes through the recognizer
    ///
    /// Returns the patterns that completed during this call.
    pub fn poll(&mut self) -> Completed {
        self.scan();
        let mut completed = Completed::new();
        for hit in &self.hits {
            record(&mut completed, hit.id);
        }
        self.log_completed(&completed);
        completed
    }

    /// Drain buffered bytes and append the recognized commands to `out`
    ///
    /// Commands come out in stream order, one per position. Consume-on-match
    /// reports each match as it is consumed. Carryover reads completions that
    /// share a start offset as one command (the lowest pattern id) and holds
    /// it back while a higher-priority pattern is still mid-match from there.
    pub fn poll_commands(&mut self, out: &mut Vec<Token>) {
        self.scan();
        let first = out.len();
        match self.discipline {
            Discipline::ConsumeOnMatch => out.extend_from_slice(&self.hits),
            Discipline::Carryover => {
                let recognizer = &self.recognizer;
                let position = self.position;
                self.resolver.resolve(
                    &self.hits,
                    |token| mid_match_before(recognizer, position, token),
                    out,
                );
            }
        }

        for token in &out[first..] {
            debug!(
                "Command {} at {}..{}",
                self.pattern_text(token.id).unwrap_or("?"),
                token.start,
                token.end
            );
        }
    }

    /// Recognize an already materialized chunk
    ///
    /// The RX queue is not touched. Carryover runs one pass over `bytes`
    /// directly; consume-on-match stages the bytes in a private queue whose
    /// residue carries into the next call.
    pub fn feed(&mut self, bytes: &[u8]) -> Completed {
        let mut completed = Completed::new();
        match self.discipline {
            Discipline::Carryover => {
                completed = self.recognizer.feed(bytes);
                self.position += bytes.len() as u64;
            }
            Discipline::ConsumeOnMatch => {
                for &byte in bytes {
                    if self.staging.is_full() {
                        self.drain_staging(&mut completed);
                    }
                    self.staging.enqueue(byte);
                }
                self.drain_staging(&mut completed);
            }
        }
        self.log_completed(&completed);
        completed
    }

    /// Run the configured discipline over the RX queue, filling `hits`
    fn scan(&mut self) {
        self.hits.clear();
        match self.discipline {
            Discipline::ConsumeOnMatch => self.drain_queue(),
            Discipline::Carryover => {
                let n = self.queue.drain_into(&mut self.scratch);
                let base = self.position;
                let hits = &mut self.hits;
                self.recognizer.feed_with(&self.scratch[..n], |hit| {
                    hits.push(Token {
                        id: hit.id,
                        start: base,
                        end: base + hit.end as u64,
                    })
                });

                let patterns = self.recognizer.patterns();
                for hit in self.hits.iter_mut() {
                    let len = patterns.get(hit.id).map_or(0, Pattern::len) as u64;
                    hit.start = hit.end.saturating_sub(len);
                }
                self.position += n as u64;
            }
        }
        self.polls += 1;
    }

    /// One head decision per critical section, until empty or waiting
    fn drain_queue(&mut self) {
        loop {
            let recognizer = &mut self.recognizer;
            let step = self.queue.with(|queue| head_step(recognizer, queue));

            match step {
                Step::Matched(id) => {
                    let len = self.recognizer.patterns().get(id).map_or(0, Pattern::len) as u64;
                    self.hits.push(Token {
                        id,
                        start: self.position,
                        end: self.position + len,
                    });
                    self.position += len;
                }
                Step::Dropped(_) => self.position += 1,
                Step::Waiting | Step::Empty => break,
            }
        }
    }

    fn drain_staging(&mut self, completed: &mut Completed) {
        loop {
            match head_step(&mut self.recognizer, &mut self.staging) {
                Step::Matched(id) => record(completed, id),
                Step::Dropped(_) => {}
                Step::Waiting | Step::Empty => break,
            }
        }
    }

    fn log_completed(&self, completed: &Completed) {
        for id in completed {
            if let Some(pattern) = self.recognizer.patterns().get(*id) {
                debug!(
                    "Recognized {} (total {})",
                    pattern,
                    self.recognizer.activations(*id)
                );
            }
        }
    }

    /// Matching discipline in use
    pub fn discipline(&self) -> Discipline {
        self.discipline
    }

    /// Registered patterns
    pub fn patterns(&self) -> &PatternSet {
        self.recognizer.patterns()
    }

    /// Text of a pattern
    pub fn pattern_text(&self, id: PatternId) -> Option<&str> {
        self.recognizer.patterns().get(id).map(|p| p.as_str())
    }

    /// Completed matches observed for one pattern
    pub fn activations(&self, id: PatternId) -> u32 {
        self.recognizer.activations(id)
    }

    /// Activation counters in registration order
    pub fn activation_counts(&self) -> impl Iterator<Item = (PatternId, u32)> + '_ {
        self.recognizer.activation_counts()
    }

    /// Writes that found the RX queue full
    pub fn overflow_events(&self) -> u32 {
        self.queue.overflow_events()
    }

    /// Bytes currently waiting in the RX queue
    pub fn buffered(&self) -> usize {
        self.queue.len()
    }

    /// RX queue capacity
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// Number of completed polls
    pub fn polls(&self) -> u64 {
        self.polls
    }
}

impl std::fmt::Debug for CommandLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandLink")
            .field("queue", &self.queue)
            .field("discipline", &self.discipline)
            .field("patterns", &self.recognizer.patterns().len())
            .field("position", &self.position)
            .field("pending", &self.resolver.pending())
            .field("polls", &self.polls)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byte_queue::OverflowPolicy;
    use command_matcher::PatternError;

    fn link(patterns: &[&str], discipline: Discipline) -> CommandLink {
        let config = LinkConfig {
            discipline,
            ..LinkConfig::with_patterns(patterns.iter().copied())
        };
        CommandLink::new(&config).unwrap()
    }

    fn id(link: &CommandLink, text: &str) -> PatternId {
        link.patterns().position(text).unwrap()
    }

    #[test]
    fn test_rejects_bad_config() {
        let config = LinkConfig {
            capacity: 0,
            ..LinkConfig::default()
        };
        assert!(matches!(CommandLink::new(&config), Err(LinkError::Queue(_))));

        let config = LinkConfig::with_patterns(Vec::<String>::new());
        assert_eq!(
            CommandLink::new(&config).unwrap_err(),
            LinkError::Pattern(PatternError::Empty)
        );

        let config = LinkConfig::with_patterns(["$A", ""]);
        assert!(matches!(
            CommandLink::new(&config),
            Err(LinkError::Pattern(PatternError::EmptyPattern { index: 1 }))
        ));
    }

    #[test]
    fn test_poll_without_input() {
        let mut link = link(&["$A"], Discipline::ConsumeOnMatch);
        assert!(link.poll().is_empty());
        assert_eq!(link.polls(), 1);
    }

    #[test]
    fn test_producer_handle_feeds_same_queue() {
        let mut link = link(&["$A"], Discipline::ConsumeOnMatch);
        let producer = link.producer();
        assert!(producer.on_byte_received(b'$'));
        assert!(producer.on_byte_received(b'A'));
        assert_eq!(link.buffered(), 2);

        assert_eq!(link.poll().as_slice(), &[id(&link, "$A")]);
        assert_eq!(link.buffered(), 0);
    }

    #[test]
    fn test_full_queue_with_viable_prefix_does_not_stall() {
        // Capacity below the pattern length: the prefix can never complete
        let config = LinkConfig {
            capacity: 4,
            ..LinkConfig::with_patterns(["$RATE,1"])
        };
        let mut link = CommandLink::new(&config).unwrap();
        for b in b"$RAT" {
            link.on_byte_received(*b);
        }
        link.poll();
        assert_eq!(link.buffered(), 0);
    }

    #[test]
    fn test_carryover_poll_across_calls() {
        let mut link = link(&["$RATE,0", "$RATE,1"], Discipline::Carryover);
        for b in b"$RAT" {
            link.on_byte_received(*b);
        }
        assert!(link.poll().is_empty());
        assert_eq!(link.buffered(), 0);

        for b in b"E,1" {
            link.on_byte_received(*b);
        }
        assert_eq!(link.poll().as_slice(), &[id(&link, "$RATE,1")]);
    }

    #[test]
    fn test_feed_consume_larger_than_queue() {
        let mut link = link(&["$A", "$B"], Discipline::ConsumeOnMatch);
        let input = b"$A..$B..$A..$B..$A..$B..$A..$B..";
        assert!(input.len() > link.capacity());

        let completed = link.feed(input);
        assert_eq!(completed.as_slice(), &[id(&link, "$A"), id(&link, "$B")]);
        assert_eq!(link.activations(id(&link, "$A")), 4);
        assert_eq!(link.activations(id(&link, "$B")), 4);
        assert_eq!(link.overflow_events(), 0);
    }

    #[test]
    fn test_feed_carryover() {
        let mut link = link(&["$A"], Discipline::Carryover);
        assert!(link.feed(b"xx$").is_empty());
        assert_eq!(link.feed(b"A").as_slice(), &[id(&link, "$A")]);
    }

    #[test]
    fn test_overflow_events_exposed() {
        let config = LinkConfig {
            capacity: 4,
            overflow_policy: OverflowPolicy::RejectOnFull,
            ..LinkConfig::with_patterns(["$A"])
        };
        let link = CommandLink::new(&config).unwrap();
        for b in b"abcdef" {
            link.on_byte_received(*b);
        }
        assert_eq!(link.overflow_events(), 2);
        assert_eq!(link.buffered(), 4);
    }

    #[test]
    fn test_feed_leaves_rx_queue_alone() {
        let mut link = link(&["$RATE,0", "$RATE,1"], Discipline::ConsumeOnMatch);
        for b in b"$RA" {
            link.on_byte_received(*b);
        }

        assert_eq!(link.feed(b"$RATE,1").as_slice(), &[id(&link, "$RATE,1")]);
        assert_eq!(link.buffered(), 3);
        assert_eq!(link.overflow_events(), 0);

        for b in b"TE,0" {
            link.on_byte_received(*b);
        }
        assert_eq!(link.poll().as_slice(), &[id(&link, "$RATE,0")]);
    }

    #[test]
    fn test_feed_consume_residue_carries_between_calls() {
        let mut link = link(&["$RATE,0", "$RATE,1"], Discipline::ConsumeOnMatch);
        assert!(link.feed(b"xx$RAT").is_empty());
        assert_eq!(link.feed(b"E,1").as_slice(), &[id(&link, "$RATE,1")]);
        assert_eq!(link.buffered(), 0);
    }

    #[test]
    fn test_poll_commands_consume_stream_order() {
        let mut link = link(&["$A", "$B"], Discipline::ConsumeOnMatch);
        for b in b"$B..$A..$B" {
            link.on_byte_received(*b);
        }

        let mut tokens = Vec::new();
        link.poll_commands(&mut tokens);
        let (a, b) = (id(&link, "$A"), id(&link, "$B"));
        assert_eq!(
            tokens,
            vec![
                Token { id: b, start: 0, end: 2 },
                Token { id: a, start: 4, end: 6 },
                Token { id: b, start: 8, end: 10 },
            ]
        );
    }

    #[test]
    fn test_poll_commands_carryover_one_command_per_start() {
        let mut link = link(&["$RATE,2", "$RATE,5", "$RATE,"], Discipline::Carryover);
        for b in b"$RATE,2\n$RATE,5\n" {
            link.on_byte_received(*b);
        }

        let mut tokens = Vec::new();
        link.poll_commands(&mut tokens);
        let ids: Vec<_> = tokens.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![id(&link, "$RATE,2"), id(&link, "$RATE,5")]);
        assert_eq!(tokens[1].start, 8);
    }

    #[test]
    fn test_poll_commands_carryover_waits_for_longer_pattern() {
        let mut link = link(&["$RATE,10", "$RATE,1", "$RATE,"], Discipline::Carryover);
        let mut tokens = Vec::new();

        for b in b"$RATE,1" {
            link.on_byte_received(*b);
        }
        link.poll_commands(&mut tokens);
        assert!(tokens.is_empty());

        link.on_byte_received(b'0');
        link.poll_commands(&mut tokens);
        assert_eq!(tokens, vec![Token { id: id(&link, "$RATE,10"), start: 0, end: 8 }]);

        tokens.clear();
        for b in b"$RATE,1\n" {
            link.on_byte_received(*b);
        }
        link.poll_commands(&mut tokens);
        assert_eq!(tokens, vec![Token { id: id(&link, "$RATE,1"), start: 8, end: 15 }]);
    }
}
