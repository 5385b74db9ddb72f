//! Partial-Match Carryover Scanner
//!
//! Scans one pass of input for a single pattern without consuming it.
//! Progress that reaches the end of the pass is stored in `save_index`
//! so the next pass resumes mid-pattern.

use crate::pattern::PatternState;

/// Run one pass of `input` against `pattern`, returning completed matches
///
/// `on_match` receives the offset just past each completed match. The
/// caller clears `suspended` at the start of each non-empty pass.
pub(crate) fn scan_pass<F>(
    pattern: &[u8],
    state: &mut PatternState,
    input: &[u8],
    mut on_match: F,
) -> u32
where
    F: FnMut(usize),
{
    let mut completed = 0;
    let mut start = 0;

    while start < input.len() && !state.suspended {
        let carried = state.save_index;
        let remaining = &pattern[carried..];
        let window = &input[start..];
        let matched = remaining
            .iter()
            .zip(window)
            .take_while(|(expected, received)| expected == received)
            .count();

        if matched == remaining.len() {
            state.activate();
            completed += 1;
            start += matched;
            on_match(start);
        } else if matched == window.len() {
            // Pass ended mid-pattern; resume here next pass
            state.save_index += matched;
            state.suspended = true;
        } else if carried > 0 {
            // Prefix from an earlier pass broke; retry this position fresh
            state.save_index = 0;
        } else {
            start += 1;
        }
    }

    completed
}
