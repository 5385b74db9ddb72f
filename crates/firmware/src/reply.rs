//! Outgoing Telemetry and Reply Lines
//!
//! Every line has the form `$<TYPE>,<fields>*\n` and is formatted into a
//! fixed-size buffer, the way the firmware formats into its 35-byte scratch.

use crate::error::FirmwareError;
use mag_sensor::RawSample;
use std::fmt::{self, Write};

/// Capacity of one formatted line, newline included
pub const LINE_CAPACITY: usize = 35;

/// One formatted line
pub type Line = heapless::String<LINE_CAPACITY>;

/// Error code sent for an unsupported rate
pub const ERR_INVALID_RATE: u8 = 1;

/// A line the firmware sends to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Report<'a> {
    /// Smoothed magnetometer sample
    Mag(RawSample),
    /// Heading in degrees
    Yaw(i32),
    /// Echo of a recognized command
    Echo { kind: &'a str, payload: &'a str },
    /// Acknowledged rate change
    NewRate(u32),
    /// Command rejected
    Error(u8),
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Mag(s) => write!(f, "$MAG,{},{},{}*", s.x, s.y, s.z),
            Report::Yaw(deg) => write!(f, "$YAW,{}*", deg),
            Report::Echo { kind, payload } => write!(f, "$MSG,{},{}*", kind, payload),
            Report::NewRate(rate) => write!(f, "$NEW_RATE,{}*", rate),
            Report::Error(code) => write!(f, "$ERR,{}*", code),
        }
    }
}

impl Report<'_> {
    /// Format into a fixed buffer with the trailing newline
    pub fn to_line(&self) -> Result<Line, FirmwareError> {
        let mut line = Line::new();
        writeln!(line, "{}", self).map_err(|_| FirmwareError::LineTooLong {
            max: LINE_CAPACITY,
        })?;
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mag_line() {
        let line = Report::Mag(RawSample { x: 12, y: -40, z: 7 }).to_line().unwrap();
        assert_eq!(line.as_str(), "$MAG,12,-40,7*\n");
    }

    #[test]
    fn test_mag_line_extremes_fit() {
        let sample = RawSample {
            x: i16::MIN,
            y: i16::MIN,
            z: i16::MIN,
        };
        assert!(Report::Mag(sample).to_line().is_ok());
    }

    #[test]
    fn test_replies() {
        assert_eq!(Report::Yaw(-90).to_line().unwrap().as_str(), "$YAW,-90*\n");
        assert_eq!(Report::NewRate(10).to_line().unwrap().as_str(), "$NEW_RATE,10*\n");
        assert_eq!(
            Report::Error(ERR_INVALID_RATE).to_line().unwrap().as_str(),
            "$ERR,1*\n"
        );
        assert_eq!(
            Report::Echo { kind: "RATE", payload: "5" }.to_line().unwrap().as_str(),
            "$MSG,RATE,5*\n"
        );
    }

    #[test]
    fn test_overlong_echo_rejected() {
        let payload = "0123456789012345678901234567890";
        assert!(matches!(
            Report::Echo { kind: "RATE", payload }.to_line(),
            Err(FirmwareError::LineTooLong { max: LINE_CAPACITY })
        ));
    }
}
