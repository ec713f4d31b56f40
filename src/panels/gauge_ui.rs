//! Live distance gauge: one text line and a horizontal bar scaled to the
//! configured range.

use egui::{Align2, Color32, CornerRadius, FontId, Sense, Stroke, StrokeKind, Ui, Vec2};

use super::panel_trait::Panel;
use crate::gauge::GaugeState;
use crate::sink::{SurfaceState, UserCommand};

const BAR_HEIGHT: f32 = 22.0;
const BAR_COLOR: Color32 = Color32::from_rgb(0, 120, 255);
const OUT_OF_RANGE_COLOR: Color32 = Color32::from_rgb(220, 120, 0);

pub struct GaugePanel {
    /// Width of the bar track; matches the full-scale bar width.
    pub track_width: f32,
}

impl GaugePanel {
    pub fn new(track_width: f32) -> Self {
        Self {
            track_width: track_width.max(0.0),
        }
    }
}

impl Panel for GaugePanel {
    fn name(&self) -> &'static str {
        "Live distance"
    }

    fn render(&mut self, ui: &mut Ui, view: &SurfaceState, _commands: &mut Vec<UserCommand>) {
        let state = &view.gauge;
        let text_color = match state {
            GaugeState::LinkLost(_) | GaugeState::InvalidReading => ui.visuals().error_fg_color,
            GaugeState::Reading(u) if u.out_of_range => ui.visuals().warn_fg_color,
            _ => ui.visuals().text_color(),
        };
        ui.label(egui::RichText::new(state.text()).size(18.0).color(text_color));

        let (rect, _resp) =
            ui.allocate_exact_size(Vec2::new(self.track_width, BAR_HEIGHT), Sense::hover());
        let painter = ui.painter_at(rect);
        let radius = CornerRadius::same(4);
        painter.rect_filled(rect, radius, ui.visuals().extreme_bg_color);

        if let GaugeState::Reading(update) = state {
            let width = update.bar_width.min(self.track_width);
            if width > 0.0 {
                let mut bar = rect;
                bar.set_width(width);
                let color = if update.out_of_range {
                    OUT_OF_RANGE_COLOR
                } else {
                    BAR_COLOR
                };
                painter.rect_filled(bar, radius, color);
            }
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                &update.numeric_label,
                FontId::proportional(14.0),
                ui.visuals().strong_text_color(),
            );
        }
        painter.rect_stroke(
            rect,
            radius,
            Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color),
            StrokeKind::Inside,
        );
    }
}
