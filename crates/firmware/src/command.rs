//! Command Payload Extraction and Rate Decisions

/// Magnetometer report rates the firmware accepts (Hz)
pub const VALID_RATES: [u32; 6] = [0, 1, 2, 4, 5, 10];

/// A recognized command split into type and payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command<'a> {
    /// Text between `$` and the first comma
    pub kind: &'a str,
    /// Text after the first comma (may be empty)
    pub payload: &'a str,
}

impl<'a> Command<'a> {
    /// Split a `$TYPE,payload` token; `None` without the leading `$`
    pub fn parse(text: &'a str) -> Option<Self> {
        let body = text.strip_prefix('$')?;
        let (kind, payload) = body.split_once(',').unwrap_or((body, ""));
        Some(Self { kind, payload })
    }

    /// Whether this is a `$RATE` command
    pub fn is_rate(&self) -> bool {
        self.kind == "RATE"
    }
}

/// Parse the leading decimal digits of a payload
pub fn extract_integer(payload: &str) -> Option<u32> {
    let end = payload
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(payload.len());
    payload[..end].parse().ok()
}

/// Outcome of a `$RATE` command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    /// New report rate (Hz)
    Accepted(u32),
    /// Missing or unsupported rate
    Rejected,
}

/// Decide what a `$RATE` payload asks for
pub fn decide_rate(payload: &str) -> RateDecision {
    match extract_integer(payload) {
        Some(rate) if VALID_RATES.contains(&rate) => RateDecision::Accepted(rate),
        _ => RateDecision::Rejected,
    }
}
