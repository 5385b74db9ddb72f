//! Magnetometer Telemetry Firmware - Host Simulation
//!
//! stdin plays the RX line, stdout the TX line. Usage:
//! `maglink-sim [config.toml]`

use firmware::{init_logging, Firmware, FirmwareConfig};
use mag_sensor::SimulatedMagnetometer;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = std::env::args().nth(1).map(PathBuf::from);
    let config = FirmwareConfig::load(path.as_deref())?;
    init_logging(&config.log_level)?;

    info!("=== Magnetometer Telemetry v{} ===", env!("CARGO_PKG_VERSION"));

    let sim = &config.simulation;
    let mag = SimulatedMagnetometer::new(sim.magnitude, sim.z, sim.step_deg);
    let mut firmware = Firmware::new(&config, mag)?;

    // RX: every stdin byte goes through the interrupt hook
    let producer = firmware.producer();
    tokio::spawn(async move {
        let mut stdin = tokio::io::stdin();
        let mut buf = [0u8; 64];
        loop {
            match stdin.read(&mut buf).await {
                Ok(0) => {
                    debug!("RX closed");
                    break;
                }
                Ok(n) => {
                    for &byte in &buf[..n] {
                        producer.on_byte_received(byte);
                    }
                }
                Err(e) => {
                    warn!("RX read failed: {}", e);
                    break;
                }
            }
        }
    });

    let tx = firmware.transmitter();
    let mut out = vec![0u8; tx.capacity()];
    let mut stdout = tokio::io::stdout();
    let mut ticker = tokio::time::interval(Duration::from_millis(config.tick_ms.max(1)));

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                firmware.step()?;
                let n = tx.drain_into(&mut out);
                if n > 0 {
                    stdout.write_all(&out[..n]).await?;
                    stdout.flush().await?;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
        }
    }

    let link = firmware.link();
    for (id, count) in link.activation_counts() {
        info!(
            "{}: {} activations",
            link.pattern_text(id).unwrap_or("?"),
            count
        );
    }
    info!(
        "Ticks: {}, RX overflow events: {}, TX dropped bytes: {}",
        firmware.ticks(),
        link.overflow_events(),
        tx.dropped()
    );

    Ok(())
}
