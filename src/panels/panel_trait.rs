use egui::Ui;

use crate::sink::{SurfaceState, UserCommand};

/// One region of the window. Panels draw from the [`SurfaceState`] only and
/// report user intent by pushing [`UserCommand`]s; they never call into the
/// session directly.
pub trait Panel {
    fn name(&self) -> &'static str;

    fn render(&mut self, ui: &mut Ui, view: &SurfaceState, commands: &mut Vec<UserCommand>);
}
