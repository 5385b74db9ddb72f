//! Register Block Decoding

use serde::{Deserialize, Serialize};

/// Bytes in one X/Y/Z data block (low/high pairs)
pub const NUM_READINGS: usize = 6;

/// Magnetometer axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Low-byte mask and scale divisor for this axis
    ///
    /// X and Y carry 13 significant bits, Z carries 15.
    fn layout(&self) -> (u8, i16) {
        match self {
            Axis::X | Axis::Y => (0xF8, 8),
            Axis::Z => (0xFE, 2),
        }
    }
}

/// One decoded magnetometer sample
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSample {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

/// Assemble one axis value from its low/high register pair
pub fn decode_axis(low: u8, high: u8, axis: Axis) -> i16 {
    let (mask, divisor) = axis.layout();
    let raw = i16::from_be_bytes([high, low & mask]);
    raw / divisor
}

/// Inverse of [`decode_axis`] for values in the axis range
pub fn encode_axis(value: i16, axis: Axis) -> (u8, u8) {
    let (_, divisor) = axis.layout();
    let [high, low] = value.wrapping_mul(divisor).to_be_bytes();
    (low, high)
}

/// Decode a register block laid out as X_L, X_H, Y_L, Y_H, Z_L, Z_H
pub fn decode_sample(readings: &[u8; NUM_READINGS]) -> RawSample {
    RawSample {
        x: decode_axis(readings[0], readings[1], Axis::X),
        y: decode_axis(readings[2], readings[3], Axis::Y),
        z: decode_axis(readings[4], readings[5], Axis::Z),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_decode_xy_drops_low_bits() {
        // 0x0107 -> masked 0x0100 = 256 -> 256 / 8 = 32
        assert_eq!(decode_axis(0x07, 0x01, Axis::X), 32);
        assert_eq!(decode_axis(0xFF, 0x00, Axis::Y), 0xF8 / 8);
    }

    #[test]
    fn test_decode_negative() {
        // 0xFFF8 = -8 -> -1
        assert_eq!(decode_axis(0xF8, 0xFF, Axis::X), -1);
        // 0x8000 = -32768 -> -4096
        assert_eq!(decode_axis(0x00, 0x80, Axis::Y), -4096);
        // 0xFFFE = -2 -> -1
        assert_eq!(decode_axis(0xFF, 0xFF, Axis::Z), -1);
    }

    #[test]
    fn test_decode_z_keeps_fifteen_bits() {
        assert_eq!(decode_axis(0x03, 0x00, Axis::Z), 1);
        assert_eq!(decode_axis(0x00, 0x40, Axis::Z), 8192);
    }

    #[test]
    fn test_decode_sample_layout() {
        let sample = decode_sample(&[0x08, 0x00, 0x10, 0x00, 0x04, 0x00]);
        assert_eq!(sample, RawSample { x: 1, y: 2, z: 2 });
    }

    proptest! {
        #[test]
        fn prop_encode_decode_xy(value in -4096i16..4096) {
            let (low, high) = encode_axis(value, Axis::X);
            prop_assert_eq!(decode_axis(low, high, Axis::X), value);
        }

        #[test]
        fn prop_encode_decode_z(value in -16384i16..16384) {
            let (low, high) = encode_axis(value, Axis::Z);
            prop_assert_eq!(decode_axis(low, high, Axis::Z), value);
        }
    }
}
