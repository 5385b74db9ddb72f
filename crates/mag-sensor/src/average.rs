//! Moving Average Filter for Magnetometer Smoothing

use crate::decode::RawSample;

/// Samples in each axis window
pub const MOVING_AVERAGE_SIZE: usize = 5;

/// Fixed-window moving average over signed 16-bit samples
///
/// The window starts zero-filled, so the first outputs ramp up toward the
/// input instead of echoing it.
#[derive(Debug, Clone, Default)]
pub struct MovingAverage {
    window: [i16; MOVING_AVERAGE_SIZE],
    position: usize,
}

impl MovingAverage {
    /// Create a new zero-filled filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value and get the truncated mean of the window
    pub fn filter(&mut self, value: i16) -> i16 {
        self.window[self.position] = value;
        self.position = (self.position + 1) % MOVING_AVERAGE_SIZE;

        let sum: i32 = self.window.iter().map(|&v| i32::from(v)).sum();
        // Mean of i16 values always fits in i16
        (sum / MOVING_AVERAGE_SIZE as i32) as i16
    }
}

/// One moving average per axis
#[derive(Debug, Clone, Default)]
pub struct Smoother {
    x: MovingAverage,
    y: MovingAverage,
    z: MovingAverage,
}

impl Smoother {
    /// Create a new smoother
    pub fn new() -> Self {
        Self::default()
    }

    /// Smooth one sample
    pub fn update(&mut self, sample: RawSample) -> RawSample {
        RawSample {
            x: self.x.filter(sample.x),
            y: self.y.filter(sample.y),
            z: self.z.filter(sample.z),
        }
    }
}
