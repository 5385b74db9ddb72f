//! Firmware Configuration

use crate::error::FirmwareError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use telemetry_link::LinkConfig;
use tracing::info;

/// Environment variable prefix (`MAGLINK__LINK__CAPACITY=32`)
pub const ENV_PREFIX: &str = "MAGLINK";

/// Rate commands the firmware listens for, in priority order
///
/// `$RATE,10` ranks above `$RATE,1` so a 10 Hz request is not cut short.
/// Under carryover a completed `$RATE,1` is answered once the next byte
/// rules out `$RATE,10`.
pub const FIRMWARE_COMMANDS: [&str; 7] = [
    "$RATE,0", "$RATE,10", "$RATE,1", "$RATE,2", "$RATE,4", "$RATE,5", "$RATE,",
];

/// Simulated magnetometer settings for the host build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Horizontal field strength
    pub magnitude: i16,
    /// Vertical field component
    pub z: i16,
    /// Field rotation per sample (degrees)
    pub step_deg: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            magnitude: 400,
            z: -120,
            step_deg: 1.0,
        }
    }
}

/// Firmware configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirmwareConfig {
    /// RX command link
    pub link: LinkConfig,
    /// Main loop period (milliseconds)
    pub tick_ms: u64,
    /// Magnetometer report rate at startup (Hz)
    pub default_rate_hz: u32,
    /// Heading report period (milliseconds)
    pub yaw_period_ms: u64,
    /// Transmit queue capacity (bytes)
    pub tx_capacity: usize,
    /// Log level for the simulation binary
    pub log_level: String,
    /// Simulated sensor
    pub simulation: SimulationConfig,
}

impl Default for FirmwareConfig {
    fn default() -> Self {
        Self {
            link: LinkConfig::with_patterns(FIRMWARE_COMMANDS).carryover(),
            tick_ms: 10,
            default_rate_hz: 5,
            yaw_period_ms: 200,
            tx_capacity: 256,
            log_level: "info".to_string(),
            simulation: SimulationConfig::default(),
        }
    }
}

impl FirmwareConfig {
    /// Load from an optional file plus `MAGLINK__*` environment overrides
    ///
    /// Without a path, `maglink.toml` in the working directory is used if present.
    pub fn load(path: Option<&Path>) -> Result<Self, FirmwareError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("maglink").required(false),
        };

        let settings = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(";")
                    .with_list_parse_key("link.patterns")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: Self = settings.try_deserialize()?;
        info!("Loaded configuration: {:?}", loaded);
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use telemetry_link::{Discipline, OverflowPolicy};

    #[test]
    fn test_defaults() {
        let config = FirmwareConfig::default();
        assert_eq!(config.tick_ms, 10);
        assert_eq!(config.default_rate_hz, 5);
        assert_eq!(config.yaw_period_ms, 200);
        assert_eq!(config.link.discipline, Discipline::Carryover);
        assert_eq!(config.link.capacity, LinkConfig::default().capacity);
        assert_eq!(config.link.patterns[1], "$RATE,10");
        assert_eq!(config.link.patterns[2], "$RATE,1");
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = std::env::temp_dir().join(format!("maglink-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("firmware.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
tick_ms = 20
default_rate_hz = 2

[link]
capacity = 32
overflow_policy = "overwrite_oldest"
discipline = "carryover"
patterns = ["$RATE,1", "$RATE,2"]
"#
        )
        .unwrap();

        let config = FirmwareConfig::load(Some(&path)).unwrap();
        assert_eq!(config.tick_ms, 20);
        assert_eq!(config.default_rate_hz, 2);
        assert_eq!(config.yaw_period_ms, 200);
        assert_eq!(config.link.capacity, 32);
        assert_eq!(config.link.overflow_policy, OverflowPolicy::OverwriteOldest);
        assert_eq!(config.link.discipline, Discipline::Carryover);
        assert_eq!(config.link.patterns, vec!["$RATE,1".to_string(), "$RATE,2".to_string()]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let path = std::env::temp_dir().join("maglink-does-not-exist.toml");
        assert!(matches!(
            FirmwareConfig::load(Some(&path)),
            Err(FirmwareError::Config(_))
        ));
    }
}
