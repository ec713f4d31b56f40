//! Button row: one button per catalogued trial file, a file picker, About and Exit.

use egui::Ui;
use egui_phosphor::regular::{FILE_CSV, FOLDER_OPEN, QUESTION, SIGN_OUT, X};

use super::panel_trait::Panel;
use crate::config::TrialFile;
use crate::sink::{SurfaceState, UserCommand};

pub struct ControlsPanel {
    files: Vec<TrialFile>,
    /// Show the "Open CSV…" picker next to the catalogued files.
    pub allow_browse: bool,
}

impl ControlsPanel {
    pub fn new(files: Vec<TrialFile>) -> Self {
        Self {
            files,
            allow_browse: true,
        }
    }

}

impl Panel for ControlsPanel {
    fn name(&self) -> &'static str {
        "Controls"
    }

    fn render(&mut self, ui: &mut Ui, view: &SurfaceState, commands: &mut Vec<UserCommand>) {
        if let Some(err) = &view.error {
            ui.horizontal(|ui| {
                ui.colored_label(ui.visuals().error_fg_color, err.as_str());
                if ui.small_button(X).on_hover_text("Dismiss").clicked() {
                    commands.push(UserCommand::DismissError);
                }
            });
        }
        ui.horizontal_wrapped(|ui| {
            for file in &self.files {
                if ui
                    .button(format!("{FILE_CSV} {}", file.label))
                    .on_hover_text(file.file_name.as_str())
                    .clicked()
                {
                    commands.push(UserCommand::LoadRequested(file.file_name.clone()));
                }
            }
            if self.allow_browse {
                ui.separator();
                if ui
                    .button(format!("{FOLDER_OPEN} Open CSV…"))
                    .on_hover_text("Load any trial file from disk")
                    .clicked()
                {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("CSV", &["csv"])
                        .pick_file()
                    {
                        commands.push(UserCommand::LoadPath(path));
                    }
                }
            }
            ui.separator();
            if ui.button(format!("{QUESTION} About")).clicked() {
                commands.push(UserCommand::HelpRequested);
            }
            if ui.button(format!("{SIGN_OUT} Exit")).clicked() {
                commands.push(UserCommand::ExitRequested);
            }
        });
    }
}
