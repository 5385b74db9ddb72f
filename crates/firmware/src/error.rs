//! Firmware Error Types

use mag_sensor::SensorError;
use telemetry_link::LinkError;
use thiserror::Error;

/// Errors raised by the firmware loop and its setup
#[derive(Debug, Error)]
pub enum FirmwareError {
    /// Command link could not be built
    #[error("Command link error: {0}")]
    Link(#[from] LinkError),

    /// Transmit queue could not be built
    #[error("Transmit queue error: {0}")]
    Queue(#[from] byte_queue::QueueError),

    /// Configuration file or environment could not be read
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Magnetometer read failed
    #[error("Sensor error: {0}")]
    Sensor(#[from] SensorError),

    /// Outgoing line does not fit the fixed line buffer
    #[error("Line too long for {max}-byte buffer")]
    LineTooLong { max: usize },
}
