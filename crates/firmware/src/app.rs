//! Firmware Main Loop
//!
//! One `step()` per loop period: sample and smooth the magnetometer, emit the
//! reports that are due, then poll the command link and react to commands.

use crate::command::{decide_rate, Command, RateDecision};
use crate::config::FirmwareConfig;
use crate::error::FirmwareError;
use crate::reply::{Report, ERR_INVALID_RATE};
use crate::schedule::{Due, ReportScheduler};
use crate::transmit::Transmitter;
use mag_sensor::{decode_sample, heading_degrees, MagnetometerSource, RawSample, Smoother};
use telemetry_link::{CommandLink, Producer, Token};
use tracing::{debug, info, warn};

/// What one loop iteration did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Periodic reports sent
    pub due: Due,
    /// Commands reacted to
    pub commands: usize,
    /// Whether the magnetometer read succeeded
    pub sensor_ok: bool,
}

/// How the firmware answered one command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    /// Echoed only (not a `$RATE` command)
    Echoed,
    /// Rate command answered
    Rate(RateDecision),
}

/// Sensor, scheduler, command link and TX queue of one device
pub struct Firmware<M> {
    mag: M,
    smoother: Smoother,
    last_sample: RawSample,
    scheduler: ReportScheduler,
    link: CommandLink,
    tx: Transmitter,
    /// Commands recognized by the current poll
    tokens: Vec<Token>,
    ticks: u64,
}

impl<M: MagnetometerSource> Firmware<M> {
    /// Build the firmware from configuration and a magnetometer
    pub fn new(config: &FirmwareConfig, mag: M) -> Result<Self, FirmwareError> {
        let link = CommandLink::new(&config.link)?;
        let tx = Transmitter::new(config.tx_capacity)?;

        info!(
            "Firmware ready: tick={}ms rate={}Hz yaw={}ms tx_capacity={}",
            config.tick_ms, config.default_rate_hz, config.yaw_period_ms, config.tx_capacity
        );

        Ok(Self {
            mag,
            smoother: Smoother::new(),
            last_sample: RawSample::default(),
            scheduler: ReportScheduler::new(
                config.tick_ms,
                config.default_rate_hz,
                config.yaw_period_ms,
            ),
            tokens: Vec::with_capacity(config.link.capacity),
            link,
            tx,
            ticks: 0,
        })
    }

    /// RX interrupt handle
    pub fn producer(&self) -> Producer {
        self.link.producer()
    }

    /// TX interrupt handle
    pub fn transmitter(&self) -> Transmitter {
        self.tx.clone()
    }

    /// Run one loop iteration
    pub fn step(&mut self) -> Result<StepReport, FirmwareError> {
        let sensor_ok = self.sample();

        let due = self.scheduler.tick();
        if due.mag {
            self.send(&Report::Mag(self.last_sample))?;
        }
        if due.yaw {
            let heading = heading_degrees(self.last_sample.x, self.last_sample.y);
            self.send(&Report::Yaw(heading))?;
        }

        self.tokens.clear();
        self.link.poll_commands(&mut self.tokens);

        let mut commands = 0;
        for token in &self.tokens {
            let Some(text) = self.link.pattern_text(token.id) else {
                continue;
            };
            match react(text, &self.tx, &mut self.scheduler) {
                Ok(_) => commands += 1,
                Err(e) => warn!("Failed to answer {}: {}", text, e),
            }
        }

        self.ticks += 1;
        Ok(StepReport {
            due,
            commands,
            sensor_ok,
        })
    }

    /// Read, decode and smooth one sample; keeps the last sample on failure
    fn sample(&mut self) -> bool {
        match self.mag.read_block() {
            Ok(block) => {
                self.last_sample = self.smoother.update(decode_sample(&block));
                true
            }
            Err(e) => {
                warn!("Magnetometer read failed, reusing last sample: {}", e);
                false
            }
        }
    }

    fn send(&self, report: &Report<'_>) -> Result<(), FirmwareError> {
        let line = report.to_line()?;
        self.tx.send_line(&line);
        Ok(())
    }

    /// Current MAG report rate (Hz)
    pub fn rate(&self) -> u32 {
        self.scheduler.rate()
    }

    /// Last smoothed sample
    pub fn last_sample(&self) -> RawSample {
        self.last_sample
    }

    /// Command link (counters, patterns)
    pub fn link(&self) -> &CommandLink {
        &self.link
    }

    /// Loop iterations run so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

/// Echo a command and apply it if it is a rate change
fn react(
    text: &str,
    tx: &Transmitter,
    scheduler: &mut ReportScheduler,
) -> Result<Reaction, FirmwareError> {
    let Some(command) = Command::parse(text) else {
        return Ok(Reaction::Echoed);
    };

    let echo = Report::Echo {
        kind: command.kind,
        payload: command.payload,
    };
    tx.send_line(&echo.to_line()?);

    if !command.is_rate() {
        return Ok(Reaction::Echoed);
    }

    let decision = decide_rate(command.payload);
    match decision {
        RateDecision::Accepted(rate) => {
            tx.send_line(&Report::NewRate(rate).to_line()?);
            scheduler.set_rate(rate);
        }
        RateDecision::Rejected => {
            debug!("Rejected rate payload {:?}", command.payload);
            tx.send_line(&Report::Error(ERR_INVALID_RATE).to_line()?);
        }
    }
    Ok(Reaction::Rate(decision))
}

impl<M> std::fmt::Debug for Firmware<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Firmware")
            .field("scheduler", &self.scheduler)
            .field("link", &self.link)
            .field("tx", &self.tx)
            .field("ticks", &self.ticks)
            .finish()
    }
}
