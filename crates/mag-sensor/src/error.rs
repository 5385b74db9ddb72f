//! Sensor Error Types

use thiserror::Error;

/// Errors reading the magnetometer
#[derive(Debug, Clone, Error)]
pub enum SensorError {
    /// Bus transfer failed
    #[error("Bus error: {0}")]
    Bus(String),
}
