//! Measured vs. real distance per trial.

use egui::{Color32, Ui};
use egui_plot::{Legend, Line, Plot, Points};

use super::panel_trait::Panel;
use crate::render::{MEASURED_SERIES, REAL_SERIES};
use crate::sink::{SurfaceState, UserCommand};

pub const CHART_TITLE: &str = "Distances per trial";
pub const X_AXIS_LABEL: &str = "Trial No.";
pub const Y_AXIS_LABEL: &str = "Distance (cm)";

/// Legend label and color for a series key.
pub fn series_style(key: &str) -> (&'static str, Color32) {
    match key {
        MEASURED_SERIES => ("Measured distance", Color32::RED),
        REAL_SERIES => ("Real distance", Color32::BLUE),
        _ => ("", Color32::GRAY),
    }
}

#[derive(Default)]
pub struct TrialsChartPanel {
    shown_version: u64,
}

impl Panel for TrialsChartPanel {
    fn name(&self) -> &'static str {
        CHART_TITLE
    }

    fn render(&mut self, ui: &mut Ui, view: &SurfaceState, _commands: &mut Vec<UserCommand>) {
        ui.heading(self.name());

        // Refit the axes whenever a new dataset arrives.
        let refit = self.shown_version != view.dataset_version;
        self.shown_version = view.dataset_version;

        let mut plot = Plot::new("trials_chart")
            .legend(Legend::default())
            .x_axis_label(X_AXIS_LABEL)
            .y_axis_label(Y_AXIS_LABEL)
            .allow_scroll(false);
        if refit {
            plot = plot.reset();
        }
        plot.show(ui, |plot_ui| {
            for (key, points) in view.chart_series.iter() {
                if points.is_empty() {
                    continue;
                }
                let (label, color) = series_style(key);
                plot_ui.line(Line::new(label, points.to_vec()).color(color).width(1.5));
                plot_ui.points(Points::new(label, points.to_vec()).color(color).radius(2.5));
            }
        });
    }
}
