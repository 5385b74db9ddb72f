//! Pattern Set and Per-Pattern Match State

use crate::error::PatternError;
use std::fmt;
use tracing::debug;

/// Maximum number of registered patterns
pub const MAX_PATTERNS: usize = 10;

/// Maximum length of a single pattern in bytes
pub const MAX_PATTERN_LEN: usize = 32;

/// Index of a pattern in registration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatternId(usize);

impl PatternId {
    /// Position in the pattern set (0 = highest priority)
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A registered command token (printable ASCII, non-empty)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    text: heapless::String<MAX_PATTERN_LEN>,
}

impl Pattern {
    fn parse(index: usize, text: &str) -> Result<Self, PatternError> {
        if text.is_empty() {
            return Err(PatternError::EmptyPattern { index });
        }
        if let Some(&byte) = text.as_bytes().iter().find(|b| !(0x20..=0x7E).contains(*b)) {
            return Err(PatternError::NonPrintable { index, byte });
        }
        let mut stored = heapless::String::new();
        stored.push_str(text).map_err(|_| PatternError::TooLong {
            index,
            len: text.len(),
            max: MAX_PATTERN_LEN,
        })?;
        Ok(Self { text: stored })
    }

    /// Pattern bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    /// Pattern text
    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    /// Length in bytes (always >= 1)
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered, read-only set of patterns fixed at initialization
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: heapless::Vec<Pattern, MAX_PATTERNS>,
    min_len: usize,
    max_len: usize,
}

impl PatternSet {
    /// Register patterns in priority order
    pub fn new<I, S>(patterns: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = heapless::Vec::new();
        let mut count = 0;
        for (index, text) in patterns.into_iter().enumerate() {
            count += 1;
            let pattern = Pattern::parse(index, text.as_ref())?;
            // Keep counting past the limit so the error reports the real total
            let _ = set.push(pattern);
        }

        if count == 0 {
            return Err(PatternError::Empty);
        }
        if count > MAX_PATTERNS {
            return Err(PatternError::TooMany {
                count,
                max: MAX_PATTERNS,
            });
        }

        let min_len = set.iter().map(Pattern::len).min().unwrap_or(0);
        let max_len = set.iter().map(Pattern::len).max().unwrap_or(0);
        debug!(
            "Registered {} patterns (length {}..={})",
            set.len(),
            min_len,
            max_len
        );

        Ok(Self {
            patterns: set,
            min_len,
            max_len,
        })
    }

    /// Number of registered patterns
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Always false for a constructed set
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Length of the shortest pattern
    pub fn min_len(&self) -> usize {
        self.min_len
    }

    /// Length of the longest pattern
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Look up a pattern by id
    pub fn get(&self, id: PatternId) -> Option<&Pattern> {
        self.patterns.get(id.0)
    }

    /// Find the id of a pattern by its text
    pub fn position(&self, text: &str) -> Option<PatternId> {
        self.patterns
            .iter()
            .position(|p| p.as_str() == text)
            .map(PatternId)
    }

    /// Iterate in registration (priority) order
    pub fn iter(&self) -> impl Iterator<Item = (PatternId, &Pattern)> + '_ {
        self.patterns
            .iter()
            .enumerate()
            .map(|(i, p)| (PatternId(i), p))
    }

    /// All pattern ids in priority order
    pub fn ids(&self) -> impl Iterator<Item = PatternId> {
        (0..self.patterns.len()).map(PatternId)
    }
}

/// Match progress of one pattern, owned by the consumer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatternState {
    /// Characters of the tracked prefix matched so far, across passes
    pub(crate) save_index: usize,
    /// Pattern sits out the rest of the current pass
    pub(crate) suspended: bool,
    /// Completed matches observed
    pub(crate) activations: u32,
}

impl PatternState {
    /// Characters of the pattern already matched
    pub fn save_index(&self) -> usize {
        self.save_index
    }

    /// Whether the pattern is waiting for the next pass
    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Completed matches observed
    pub fn activations(&self) -> u32 {
        self.activations
    }

    pub(crate) fn activate(&mut self) {
        self.activations = self.activations.wrapping_add(1);
        self.save_index = 0;
    }
}
