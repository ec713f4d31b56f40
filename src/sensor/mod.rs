//! Sensor link adapters.
//!
//! A [`SensorLink`] wraps one hardware board connection. After [`open`], a call
//! to [`start_ranging`] registers a callback that the adapter invokes from its
//! own thread, once per completed ranging cycle. Readings never come back as
//! return values. [`shutdown`] releases the board and is called exactly once
//! by the owner, on both the normal and the error exit path.
//!
//! Implementations:
//! - [`telemetrix::TelemetrixLink`]: HC-SR04 on an Arduino running Telemetrix, over serial.
//! - [`simulated::SimulatedLink`]: synthetic sweep for demos without a board.
//! - [`scripted::ScriptedSensorLink`]: test double driven by the caller.
//!
//! [`open`]: SensorLink::open
//! [`start_ranging`]: SensorLink::start_ranging
//! [`shutdown`]: SensorLink::shutdown

pub mod scripted;
pub mod simulated;
pub mod telemetrix;

use std::time::Instant;

use crate::config::{SensorConfig, SensorMode};
use crate::error::HardwareLinkError;

pub use scripted::{ScriptHandle, ScriptedSensorLink};
pub use simulated::SimulatedLink;
pub use telemetrix::TelemetrixLink;

/// One completed ranging cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SonarReport {
    pub trigger_pin: u8,
    pub distance_cm: f64,
    pub received_at: Instant,
}

/// What an adapter delivers to the registered callback.
#[derive(Debug, Clone, PartialEq)]
pub enum SonarEvent {
    Reading(SonarReport),
    /// The link failed after ranging started. No further events follow.
    LinkLost(String),
}

/// Callback invoked on the adapter's thread.
pub type RangingCallback = Box<dyn FnMut(SonarEvent) + Send + 'static>;

/// Capability interface of a board connection.
pub trait SensorLink: Send {
    /// Human-readable name for logs, e.g. the serial port.
    fn describe(&self) -> String;

    /// Connect to the board. Failure is fatal for live acquisition.
    fn open(&mut self) -> Result<(), HardwareLinkError>;

    /// Configure the sensor and start delivering readings to `on_reading`.
    fn start_ranging(
        &mut self,
        trigger_pin: u8,
        echo_pin: u8,
        on_reading: RangingCallback,
    ) -> Result<(), HardwareLinkError>;

    /// Stop reports and release the board. Blocks until the adapter thread has
    /// exited, so no callback runs after this returns.
    fn shutdown(&mut self) -> Result<(), HardwareLinkError>;
}

/// Build the adapter selected by the configuration. `None` for CSV-only mode.
pub fn link_for_config(cfg: &SensorConfig) -> Option<Box<dyn SensorLink>> {
    match cfg.mode {
        SensorMode::Telemetrix => Some(Box::new(TelemetrixLink::new(
            cfg.port.clone(),
            cfg.baud_rate,
            cfg.handshake_timeout(),
        ))),
        SensorMode::Simulated => Some(Box::new(SimulatedLink::default())),
        SensorMode::Disabled => None,
    }
}
