//! About/help window.

use egui::{Context, RichText, ScrollArea};

const SECTIONS: &[(&str, &str)] = &[
    (
        "About",
        "Reads an HC-SR04 ultrasonic sensor through a board running the Telemetrix \
         firmware and shows the latest distance once per second. Recorded trials \
         can be loaded from CSV files and are shown as a table and a chart.",
    ),
    (
        "Live gauge",
        "The bar spans 0 cm to the configured maximum range. Readings outside that \
         range are clamped to the nearest end and marked \"Out of range\". Until \
         the first reading arrives the gauge says so instead of showing zero.",
    ),
    (
        "Trial files",
        "Use the Rise and Fall buttons for the catalogued files, or Open CSV… for \
         any other file. The first line is a header; every other line holds the \
         trial number, the time of capture, the distance to measure and the \
         measured distance, separated by commas. A file with a malformed line is \
         rejected as a whole and the previous data stays on screen.",
    ),
    (
        "Configuration",
        "Settings are read from the file named by SONARVIEW_CONFIG, or from \
         sonarview.yaml in the working directory. Set RUST_LOG=debug for \
         verbose logs.",
    ),
];

const AUTHOR: &str = "Paulo Galvão";
const CONTACT: &str = "paulo.galvao@estsetubal.ips.pt";

/// `(label, hover text, url)` of the link row at the bottom of the window.
pub const LINKS: &[(&str, &str, &str)] = &[
    (
        "Where to find the program",
        "Open the project page",
        "https://github.com/labF212/Gui-for-Python-Flet",
    ),
    (
        "egui documentation",
        "Open the toolkit documentation",
        "https://docs.rs/egui",
    ),
];

#[derive(Default)]
pub struct HelpWindow {
    pub open: bool,
}

impl HelpWindow {
    pub fn show(&mut self, ctx: &Context) {
        if !self.open {
            return;
        }
        egui::Window::new("About")
            .open(&mut self.open)
            .collapsible(false)
            .resizable(true)
            .default_width(420.0)
            .show(ctx, |ui| {
                ScrollArea::vertical().show(ui, |ui| {
                    for (title, body) in SECTIONS {
                        ui.label(RichText::new(*title).strong());
                        ui.label(*body);
                        ui.add_space(8.0);
                    }
                    ui.label(RichText::new("Author").strong());
                    ui.label(format!("Name: {AUTHOR}"));
                    ui.label(format!("Version: {}", env!("CARGO_PKG_VERSION")));
                    ui.horizontal(|ui| {
                        ui.label("Contact:");
                        ui.hyperlink_to(CONTACT, format!("mailto:{CONTACT}"));
                    });
                    ui.separator();
                    ui.horizontal_wrapped(|ui| {
                        for (label, hover, url) in LINKS {
                            ui.hyperlink_to(*label, *url).on_hover_text(*hover);
                        }
                    });
                });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_are_absolute_web_urls() {
        assert!(!LINKS.is_empty());
        for (label, _, url) in LINKS {
            assert!(!label.is_empty());
            assert!(url.starts_with("https://"), "{url}");
        }
    }
}
