//! Top-level entry point for running SonarView as a native window.

use std::time::Instant;

use eframe::egui;
use log::{error, info};

use crate::config::SonarConfig;
use crate::sensor::link_for_config;
use crate::session::SonarSession;
use crate::sink::channel_surface;

use super::sonar_app::SonarApp;

/// Launch SonarView in a native window.
///
/// 1. Builds the session on a channel-backed surface.
/// 2. Opens the configured sensor link, if any. A link that fails to open is
///    reported on the gauge and in the log; the trial viewer stays usable.
/// 3. Opens the window and enters the eframe event loop.
///
/// The call blocks until the window is closed. The sensor link is released
/// when the app, and with it the session, is dropped.
pub fn run_sonarview(cfg: SonarConfig) -> eframe::Result<()> {
    let (sink, rx) = channel_surface();
    let title = cfg.title.clone();
    let sensor_link = link_for_config(&cfg.sensor);
    let mut session = SonarSession::new(cfg, sink);

    let live = match sensor_link {
        Some(link) => {
            if let Err(e) = session.start_acquisition(link, Instant::now()) {
                error!("live acquisition unavailable: {e}");
            }
            true
        }
        None => {
            info!("sensor disabled, running as trial viewer only");
            false
        }
    };

    let app = SonarApp::new(session, rx, live);

    let opts = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(title.as_str())
            .with_inner_size(egui::vec2(1300.0, 860.0))
            .with_min_inner_size(egui::vec2(800.0, 500.0)),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        opts,
        Box::new(|cc| {
            // Install Phosphor icon font before creating the app.
            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);
            Ok(Box::new(app))
        }),
    )
}
