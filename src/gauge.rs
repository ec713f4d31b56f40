//! Derivation of the live gauge view from a reading snapshot.

use crate::config::GaugeConfig;
use crate::reading::ReadingSnapshot;

/// Suffix appended to the gauge text when the reading lies outside `[0, max_range_cm]`.
pub const OUT_OF_RANGE_MARKER: &str = " - Out of range";

/// Text shown before the first reading arrives.
pub const NO_DATA_TEXT: &str = "Waiting for sensor data…";

/// Everything the surface needs to draw one reading, pushed as a unit.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeUpdate {
    /// e.g. `Distance: 123.40 cm`, with [`OUT_OF_RANGE_MARKER`] when clamped.
    pub text: String,
    /// Bar width in pixels, within `[0, bar_pixel_width]`.
    pub bar_width: f32,
    /// Short label drawn on the bar, e.g. `123.40 cm`.
    pub numeric_label: String,
    pub distance_cm: f64,
    pub out_of_range: bool,
}

/// Outcome of one refresh tick.
#[derive(Debug, Clone, PartialEq)]
pub enum GaugeState {
    /// No reading has arrived since startup. Never shown as zero.
    NoDataYet,
    /// The latest report carried no usable distance.
    InvalidReading,
    /// The sensor link failed after it was started.
    LinkLost(String),
    Reading(GaugeUpdate),
}

impl GaugeState {
    /// Text for the gauge line, whatever the state.
    pub fn text(&self) -> String {
        match self {
            GaugeState::NoDataYet => NO_DATA_TEXT.to_string(),
            GaugeState::InvalidReading => "Error obtaining the distance.".to_string(),
            GaugeState::LinkLost(msg) => format!("Sensor link lost: {msg}"),
            GaugeState::Reading(update) => update.text.clone(),
        }
    }
}

/// Clamp `distance_cm` into `[0, max_range_cm]` and scale to the bar width.
pub fn bar_width(distance_cm: f64, cfg: &GaugeConfig) -> f32 {
    let full = f64::from(cfg.bar_pixel_width.max(0.0));
    if !(cfg.max_range_cm.is_finite() && cfg.max_range_cm > 0.0) || distance_cm.is_nan() {
        return 0.0;
    }
    let clamped = distance_cm.clamp(0.0, cfg.max_range_cm);
    (clamped / cfg.max_range_cm * full) as f32
}

/// Build the gauge view for one reading.
pub fn gauge_update(distance_cm: f64, cfg: &GaugeConfig) -> GaugeUpdate {
    let out_of_range = !(0.0..=cfg.max_range_cm).contains(&distance_cm);
    let mut text = format!("Distance: {distance_cm:.2} cm");
    if out_of_range {
        text.push_str(OUT_OF_RANGE_MARKER);
    }
    GaugeUpdate {
        text,
        bar_width: bar_width(distance_cm, cfg),
        numeric_label: format!("{distance_cm:.2} cm"),
        distance_cm,
        out_of_range,
    }
}

/// Map a snapshot of the reading slot to a gauge state.
pub fn gauge_state(snapshot: &ReadingSnapshot, cfg: &GaugeConfig) -> GaugeState {
    if let Some(msg) = &snapshot.link_error {
        return GaugeState::LinkLost(msg.clone());
    }
    match snapshot.reading {
        None => GaugeState::NoDataYet,
        Some(r) => match (r.valid, r.distance_cm) {
            (true, Some(d)) => GaugeState::Reading(gauge_update(d, cfg)),
            _ => GaugeState::InvalidReading,
        },
    }
}
