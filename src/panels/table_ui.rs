//! Trial table: header banner, column titles and one row per trial.

use chrono::{DateTime, Local};
use egui::{Grid, ScrollArea, Ui};

use super::panel_trait::Panel;
use crate::render::TABLE_COLUMNS;
use crate::sink::{SurfaceState, UserCommand};

#[derive(Default)]
pub struct TrialsTablePanel {
    seen_version: u64,
    loaded_at: Option<DateTime<Local>>,
}

impl TrialsTablePanel {
    /// Wall-clock time at which the current dataset appeared in the window.
    pub fn loaded_at(&self) -> Option<DateTime<Local>> {
        self.loaded_at
    }

    /// Record a new dataset version. Returns `true` if it was not seen before.
    pub fn note_version(&mut self, version: u64, now: DateTime<Local>) -> bool {
        if version == self.seen_version {
            return false;
        }
        self.seen_version = version;
        self.loaded_at = Some(now);
        true
    }
}

impl Panel for TrialsTablePanel {
    fn name(&self) -> &'static str {
        "Trials"
    }

    fn render(&mut self, ui: &mut Ui, view: &SurfaceState, _commands: &mut Vec<UserCommand>) {
        self.note_version(view.dataset_version, Local::now());

        if view.table_rows.is_empty() && view.header_labels.is_empty() {
            ui.weak("No trial file loaded.");
            return;
        }
        ui.strong(view.header_banner());
        if let Some(at) = self.loaded_at {
            ui.weak(format!(
                "{} trials, loaded {}",
                view.table_rows.len(),
                at.format("%H:%M:%S")
            ));
        }
        ui.separator();

        ScrollArea::both()
            .id_salt("trials_table")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                Grid::new("trials_grid")
                    .striped(true)
                    .num_columns(TABLE_COLUMNS.len())
                    .spacing([16.0, 4.0])
                    .show(ui, |ui| {
                        for title in TABLE_COLUMNS {
                            ui.strong(title);
                        }
                        ui.end_row();
                        for row in &view.table_rows {
                            for cell in row {
                                ui.label(cell.as_str());
                            }
                            ui.end_row();
                        }
                    });
            });
    }
}
