//! SonarView crate root: re-exports and module wiring.
//!
//! Live HC-SR04 distance readout plus a viewer for recorded trial files,
//! built on egui/eframe:
//! - `sensor`: board link adapters (Telemetrix over serial, simulated, scripted)
//! - `reading`: last-value-wins slot written by the sensor callback
//! - `gauge`: clamp/scale a reading into the live gauge view
//! - `scheduler`: fixed-cadence task polled from the UI loop
//! - `trials`: CSV trial loader
//! - `render`: trial dataset to table rows and chart series
//! - `sink`: surface update messages, user commands, channel sink
//! - `session`: core runtime tying the above together
//! - `config`: configuration and defaults
//! - `app`, `panels`: the egui window

pub mod app;
pub mod config;
pub mod error;
pub mod gauge;
pub mod panels;
pub mod reading;
pub mod render;
pub mod scheduler;
pub mod sensor;
pub mod session;
pub mod sink;
pub mod trials;

// Public re-exports for a compact external API
pub use app::{run_sonarview, SonarApp};
pub use config::{SensorMode, SonarConfig};
pub use error::{ConfigError, HardwareLinkError, MalformedInputError};
pub use gauge::{GaugeState, GaugeUpdate};
pub use render::{render, ChartSeries, RenderedDataset};
pub use sensor::{SensorLink, SonarEvent, SonarReport};
pub use session::{SessionFlow, SonarSession};
pub use sink::{channel_surface, PresentationSurface, SurfaceSink, SurfaceState, SurfaceUpdate, UserCommand};
pub use trials::{load as load_trials, TrialDataset, TrialRow};
