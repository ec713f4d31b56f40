//! Configuration types shared by the acquisition path, the trial loader and the UI.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "SONARVIEW_CONFIG";

/// Configuration file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "sonarview.yaml";

// ─────────────────────────────────────────────────────────────────────────────
// Sensor link
// ─────────────────────────────────────────────────────────────────────────────

/// Where live readings come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorMode {
    /// HC-SR04 attached to a board running the Telemetrix firmware.
    Telemetrix,
    /// Synthetic readings, for demos without a board.
    Simulated,
    /// No live acquisition; the window is a CSV viewer only.
    Disabled,
}

/// Sensor board link settings.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    pub mode: SensorMode,
    /// Serial port name. `None` picks the first USB serial port found.
    pub port: Option<String>,
    pub baud_rate: u32,
    pub trigger_pin: u8,
    pub echo_pin: u8,
    /// Time the board gets to answer after the port is opened (it resets on open).
    pub handshake_timeout_ms: u64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            mode: SensorMode::Telemetrix,
            port: None,
            baud_rate: 115_200,
            trigger_pin: 9,
            echo_pin: 10,
            handshake_timeout_ms: 4_000,
        }
    }
}

impl SensorConfig {
    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_millis(self.handshake_timeout_ms)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Gauge
// ─────────────────────────────────────────────────────────────────────────────

/// Live gauge scaling and refresh cadence.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GaugeConfig {
    /// Upper end of the displayable range in centimetres.
    pub max_range_cm: f64,
    /// Width of a full bar in pixels.
    pub bar_pixel_width: f32,
    /// Period between two refresh ticks.
    pub refresh_period_ms: u64,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self {
            max_range_cm: 400.0,
            bar_pixel_width: 280.0,
            refresh_period_ms: 1_000,
        }
    }
}

impl GaugeConfig {
    pub fn refresh_period(&self) -> Duration {
        Duration::from_millis(self.refresh_period_ms)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Trial files
// ─────────────────────────────────────────────────────────────────────────────

/// One load button: a label and the CSV file it opens.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TrialFile {
    pub label: String,
    pub file_name: String,
}

impl TrialFile {
    pub fn new(label: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            file_name: file_name.into(),
        }
    }
}

/// Location and catalogue of historical trial files.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TrialsConfig {
    pub data_dir: PathBuf,
    pub files: Vec<TrialFile>,
}

impl Default for TrialsConfig {
    fn default() -> Self {
        let mut files = Vec::with_capacity(6);
        for n in 1..=3 {
            files.push(TrialFile::new(
                format!("Rise {n}"),
                format!("LeituraSubidaSonar{n}.csv"),
            ));
        }
        for n in 1..=3 {
            files.push(TrialFile::new(
                format!("Fall {n}"),
                format!("LeituraDescidaSonar{n}.csv"),
            ));
        }
        Self {
            data_dir: PathBuf::from("."),
            files,
        }
    }
}

impl TrialsConfig {
    /// Resolve a file name against the data directory. Absolute paths pass through.
    pub fn resolve(&self, file_name: &str) -> PathBuf {
        let p = Path::new(file_name);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.data_dir.join(p)
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SonarConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level configuration.
///
/// | Field     | Purpose |
/// |-----------|---------|
/// | `sensor`  | Board link and pin assignment |
/// | `gauge`   | Live gauge range, width and refresh cadence |
/// | `trials`  | Where the historical CSV files live |
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SonarConfig {
    /// Native window title.
    pub title: String,
    /// Optional headline rendered inside the UI.
    pub headline: Option<String>,
    pub sensor: SensorConfig,
    pub gauge: GaugeConfig,
    pub trials: TrialsConfig,
}

impl Default for SonarConfig {
    fn default() -> Self {
        Self {
            title: "HC-SR04 distance reader".to_string(),
            headline: None,
            sensor: SensorConfig::default(),
            gauge: GaugeConfig::default(),
            trials: TrialsConfig::default(),
        }
    }
}

impl SonarConfig {
    /// Parse a YAML document. Missing fields take their defaults.
    pub fn from_yaml_str(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let cfg: Self = serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        cfg.validate(origin)?;
        Ok(cfg)
    }

    /// Reject values the gauge cannot scale with.
    pub fn validate(&self, origin: &Path) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::Invalid {
            path: origin.to_path_buf(),
            reason,
        };
        let g = &self.gauge;
        if !(g.max_range_cm.is_finite() && g.max_range_cm > 0.0) {
            return Err(invalid(format!(
                "gauge.max_range_cm must be a positive number, got {}",
                g.max_range_cm
            )));
        }
        if !(g.bar_pixel_width.is_finite() && g.bar_pixel_width >= 0.0) {
            return Err(invalid(format!(
                "gauge.bar_pixel_width must be zero or more, got {}",
                g.bar_pixel_width
            )));
        }
        Ok(())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text, path)
    }

    /// Load from `$SONARVIEW_CONFIG`, else `./sonarview.yaml` if it exists, else defaults.
    pub fn discover() -> Result<Self, ConfigError> {
        if let Some(explicit) = std::env::var_os(CONFIG_ENV_VAR) {
            return Self::from_file(Path::new(&explicit));
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return Self::from_file(local);
        }
        Ok(Self::default())
    }
}
