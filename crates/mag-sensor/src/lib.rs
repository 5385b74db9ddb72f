//! Magnetometer Processing
//!
//! Decodes raw magnetometer register blocks, smooths each axis with a
//! moving average, and derives a compass heading.

mod average;
mod decode;
mod error;
mod heading;
mod source;

pub use average::{MovingAverage, Smoother, MOVING_AVERAGE_SIZE};
pub use decode::{decode_axis, decode_sample, encode_axis, Axis, RawSample, NUM_READINGS};
pub use error::SensorError;
pub use heading::heading_degrees;
pub use source::{MagnetometerSource, SimulatedMagnetometer};
