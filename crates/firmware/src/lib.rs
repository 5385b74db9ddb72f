//! Magnetometer Telemetry Firmware
//!
//! Samples the magnetometer every loop period, streams `$MAG`/`$YAW` reports
//! over the serial link and answers `$RATE` commands recognized on the RX
//! side. The host build runs the same loop against a simulated sensor.

mod app;
mod command;
mod config;
mod error;
mod reply;
mod schedule;
mod transmit;

pub use app::{Firmware, Reaction, StepReport};
pub use command::{decide_rate, extract_integer, Command, RateDecision, VALID_RATES};
pub use config::{FirmwareConfig, SimulationConfig, ENV_PREFIX, FIRMWARE_COMMANDS};
pub use error::FirmwareError;
pub use reply::{Line, Report, ERR_INVALID_RATE, LINE_CAPACITY};
pub use schedule::{Due, ReportScheduler};
pub use transmit::Transmitter;

use tracing::subscriber::SetGlobalDefaultError;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Install the global log subscriber (stderr, so stdout carries only telemetry)
///
/// Unknown level names fall back to `info`.
pub fn init_logging(level: &str) -> Result<(), SetGlobalDefaultError> {
    let level = level.parse::<Level>().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
}
