//! Presentation surface contract: the messages the core pushes, the commands
//! the surface sends back, and a channel-backed sink.
//!
//! Every [`SurfaceUpdate`] is applied as a unit. A dataset update carries its
//! header labels, table rows and chart series together, and a gauge update
//! carries text, bar width and bar label together, so the surface can never
//! show a table from one file next to a chart from another, or the text of one
//! reading next to the bar of the previous one.

use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};

use crate::gauge::GaugeState;
use crate::render::{ChartSeries, RenderedDataset, TableRow};

/// Messages sent over the channel to drive the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceUpdate {
    /// Replace header labels, table rows and chart series wholesale.
    Dataset(RenderedDataset),
    /// Replace the live gauge.
    Gauge(GaugeState),
    /// Show a user-facing error. Existing table and chart stay as they are.
    Error(String),
    /// Clear a previously shown error.
    ClearError,
}

/// User-triggered commands coming back from the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// Load one of the catalogued trial files by file name.
    LoadRequested(String),
    /// Load an arbitrary CSV chosen by the user.
    LoadPath(PathBuf),
    /// Hide the error banner.
    DismissError,
    HelpRequested,
    ExitRequested,
}

/// Anything the core can push updates to. Pushes never wait for rendering.
pub trait PresentationSurface {
    fn push(&self, update: SurfaceUpdate);

    fn set_dataset(&self, dataset: RenderedDataset) {
        self.push(SurfaceUpdate::Dataset(dataset));
    }

    fn set_gauge(&self, state: GaugeState) {
        self.push(SurfaceUpdate::Gauge(state));
    }

    fn show_error(&self, message: String) {
        self.push(SurfaceUpdate::Error(message));
    }

    fn clear_error(&self) {
        self.push(SurfaceUpdate::ClearError);
    }
}

/// Convenience sender for feeding updates into the UI.
#[derive(Clone)]
pub struct SurfaceSink {
    tx: Sender<SurfaceUpdate>,
}

impl PresentationSurface for SurfaceSink {
    fn push(&self, update: SurfaceUpdate) {
        // A closed receiver means the window is gone; nothing left to draw on.
        if self.tx.send(update).is_err() {
            log::debug!("presentation surface closed, update dropped");
        }
    }
}

/// Create a new channel pair: `(SurfaceSink, Receiver<SurfaceUpdate>)`.
pub fn channel_surface() -> (SurfaceSink, Receiver<SurfaceUpdate>) {
    let (tx, rx) = std::sync::mpsc::channel();
    (SurfaceSink { tx }, rx)
}

// ─────────────────────────────────────────────────────────────────────────────
// SurfaceState – what the window currently shows
// ─────────────────────────────────────────────────────────────────────────────

/// Receiving-end model of the surface. The UI draws from this and nothing else.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceState {
    pub header_labels: Vec<String>,
    pub table_rows: Vec<TableRow>,
    pub chart_series: ChartSeries,
    pub gauge: GaugeState,
    pub error: Option<String>,
    /// Incremented on every dataset replacement.
    pub dataset_version: u64,
}

impl Default for SurfaceState {
    fn default() -> Self {
        Self {
            header_labels: Vec::new(),
            table_rows: Vec::new(),
            chart_series: ChartSeries::default(),
            gauge: GaugeState::NoDataYet,
            error: None,
            dataset_version: 0,
        }
    }
}

impl SurfaceState {
    pub fn apply(&mut self, update: SurfaceUpdate) {
        match update {
            SurfaceUpdate::Dataset(ds) => {
                self.header_labels = ds.header_labels;
                self.table_rows = ds.table_rows;
                self.chart_series = ds.chart_series;
                self.dataset_version += 1;
                self.error = None;
            }
            SurfaceUpdate::Gauge(state) => self.gauge = state,
            SurfaceUpdate::Error(msg) => self.error = Some(msg),
            SurfaceUpdate::ClearError => self.error = None,
        }
    }

    /// Apply every pending update. Returns how many were applied.
    pub fn drain(&mut self, rx: &Receiver<SurfaceUpdate>) -> usize {
        let mut n = 0;
        while let Ok(update) = rx.try_recv() {
            self.apply(update);
            n += 1;
        }
        n
    }

    pub fn header_banner(&self) -> String {
        self.header_labels.join(" | ")
    }
}
