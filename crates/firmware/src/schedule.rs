//! Report Scheduler
//!
//! Advances elapsed-time counters by one loop period per tick and says which
//! periodic reports are due.

use tracing::debug;

/// Reports due on one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Due {
    /// Send `$MAG`
    pub mag: bool,
    /// Send `$YAW`
    pub yaw: bool,
}

/// Tick-driven scheduler for magnetometer and heading reports
#[derive(Debug, Clone)]
pub struct ReportScheduler {
    /// Loop period (milliseconds)
    tick_ms: u64,
    /// Magnetometer report rate (Hz, 0 disables)
    rate_hz: u32,
    /// Heading report period (milliseconds)
    yaw_period_ms: u64,
    /// Milliseconds since the last MAG report
    mag_elapsed_ms: u64,
    /// Milliseconds since the last YAW report
    yaw_elapsed_ms: u64,
}

impl ReportScheduler {
    /// Create a new scheduler
    pub fn new(tick_ms: u64, rate_hz: u32, yaw_period_ms: u64) -> Self {
        Self {
            tick_ms,
            rate_hz,
            yaw_period_ms,
            mag_elapsed_ms: 0,
            yaw_elapsed_ms: 0,
        }
    }

    /// MAG report period, `None` while reports are disabled
    pub fn mag_period_ms(&self) -> Option<u64> {
        (self.rate_hz != 0).then(|| 1000 / u64::from(self.rate_hz))
    }

    /// Advance one loop period
    pub fn tick(&mut self) -> Due {
        self.mag_elapsed_ms += self.tick_ms;
        self.yaw_elapsed_ms += self.tick_ms;

        let mut due = Due::default();
        if let Some(period) = self.mag_period_ms() {
            if self.mag_elapsed_ms >= period {
                self.mag_elapsed_ms = 0;
                due.mag = true;
            }
        }
        if self.yaw_elapsed_ms >= self.yaw_period_ms {
            self.yaw_elapsed_ms = 0;
            due.yaw = true;
        }
        due
    }

    /// Change the MAG report rate; the elapsed counter keeps running
    pub fn set_rate(&mut self, rate_hz: u32) {
        debug!("MAG report rate {} Hz -> {} Hz", self.rate_hz, rate_hz);
        self.rate_hz = rate_hz;
    }

    /// Current MAG report rate (Hz)
    pub fn rate(&self) -> u32 {
        self.rate_hz
    }
}
