//! Link Configuration

use byte_queue::{OverflowPolicy, DEFAULT_CAPACITY};
use command_matcher::Discipline;
use serde::{Deserialize, Serialize};

/// Legacy rate command table, in its original priority order
///
/// `$RATE,1` ranks above `$RATE,10`, so `$RATE,10` is read as `$RATE,1`
/// followed by a stray `0`. The bare `$RATE,` prefix comes last and catches
/// unsupported rates.
pub const RATE_COMMANDS: [&str; 7] = [
    "$RATE,0", "$RATE,1", "$RATE,2", "$RATE,4", "$RATE,5", "$RATE,10", "$RATE,",
];

/// Command link configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// RX queue capacity in bytes
    pub capacity: usize,
    /// What a full RX queue does with new bytes
    pub overflow_policy: OverflowPolicy,
    /// How the recognizer drains the queue
    pub discipline: Discipline,
    /// Command tokens in priority order
    pub patterns: Vec<String>,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            overflow_policy: OverflowPolicy::RejectOnFull,
            discipline: Discipline::ConsumeOnMatch,
            patterns: RATE_COMMANDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl LinkConfig {
    /// Config with a custom pattern list and default queue settings
    pub fn with_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Carryover variant of this config
    pub fn carryover(self) -> Self {
        Self {
            discipline: Discipline::Carryover,
            ..self
        }
    }
}
