//! Magnetometer Data Sources

use crate::decode::{encode_axis, Axis, NUM_READINGS};
use crate::error::SensorError;
use tracing::debug;

/// Bus-side collaborator that reads the raw X/Y/Z register block
pub trait MagnetometerSource {
    /// Read the six data registers, X_L first
    fn read_block(&mut self) -> Result<[u8; NUM_READINGS], SensorError>;
}

/// Deterministic field that rotates a fixed step per sample (no hardware required)
#[derive(Debug, Clone)]
pub struct SimulatedMagnetometer {
    /// Horizontal field strength in decoded units
    magnitude: f64,
    /// Constant vertical component
    z: i16,
    /// Rotation per read, degrees
    step_deg: f64,
    /// Current angle, degrees
    angle_deg: f64,
}

impl SimulatedMagnetometer {
    /// Create a simulated sensor
    pub fn new(magnitude: i16, z: i16, step_deg: f64) -> Self {
        debug!(
            "Creating simulated magnetometer: |B|={} z={} step={}deg",
            magnitude, z, step_deg
        );
        Self {
            magnitude: f64::from(magnitude),
            z,
            step_deg,
            angle_deg: 0.0,
        }
    }

    /// Current field angle in degrees
    pub fn angle_deg(&self) -> f64 {
        self.angle_deg
    }
}

impl Default for SimulatedMagnetometer {
    fn default() -> Self {
        Self::new(400, -120, 1.0)
    }
}

impl MagnetometerSource for SimulatedMagnetometer {
    fn read_block(&mut self) -> Result<[u8; NUM_READINGS], SensorError> {
        let rad = self.angle_deg.to_radians();
        let x = (self.magnitude * rad.cos()).round() as i16;
        let y = (self.magnitude * rad.sin()).round() as i16;

        let (x_l, x_h) = encode_axis(x, Axis::X);
        let (y_l, y_h) = encode_axis(y, Axis::Y);
        let (z_l, z_h) = encode_axis(self.z, Axis::Z);

        self.angle_deg = (self.angle_deg + self.step_deg) % 360.0;
        Ok([x_l, x_h, y_l, y_h, z_l, z_h])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode_sample;
    use crate::heading::heading_degrees;

    #[test]
    fn test_first_block_points_north() {
        let mut mag = SimulatedMagnetometer::new(400, -120, 90.0);
        let sample = decode_sample(&mag.read_block().unwrap());
        assert_eq!(sample.x, 400);
        assert_eq!(sample.y, 0);
        assert_eq!(sample.z, -120);
    }

    #[test]
    fn test_field_rotates() {
        let mut mag = SimulatedMagnetometer::new(400, 0, 90.0);
        mag.read_block().unwrap();
        let sample = decode_sample(&mag.read_block().unwrap());
        assert_eq!(heading_degrees(sample.x, sample.y), 90);
        assert!((mag.angle_deg() - 180.0).abs() < 1e-9);
    }
}
