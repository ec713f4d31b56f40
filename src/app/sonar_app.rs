//! Standalone application wrapper.
//!
//! [`SonarApp`] owns the [`SonarSession`] and is the cooperative loop it runs
//! on: every frame polls the refresh task, drains surface updates into the
//! [`SurfaceState`], draws the panels and hands the resulting user commands
//! back to the session.

use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use eframe::egui;

use crate::panels::{
    ControlsPanel, GaugePanel, HelpWindow, Panel, TrialsChartPanel, TrialsTablePanel,
};
use crate::session::{SessionFlow, SonarSession};
use crate::sink::{SurfaceState, SurfaceSink, SurfaceUpdate, UserCommand};

/// Repaint cadence when no refresh tick is pending (CSV-only mode).
const IDLE_REPAINT: Duration = Duration::from_millis(250);

pub struct SonarApp {
    session: SonarSession<SurfaceSink>,
    rx: Receiver<SurfaceUpdate>,
    view: SurfaceState,
    /// Show the live gauge. Off when the sensor is disabled.
    pub live: bool,
    /// Optional heading text shown at the top of the window.
    pub headline: Option<String>,
    gauge: GaugePanel,
    table: TrialsTablePanel,
    chart: TrialsChartPanel,
    controls: ControlsPanel,
    help: HelpWindow,
}

impl SonarApp {
    pub fn new(session: SonarSession<SurfaceSink>, rx: Receiver<SurfaceUpdate>, live: bool) -> Self {
        let cfg = session.config();
        let gauge = GaugePanel::new(cfg.gauge.bar_pixel_width);
        let controls = ControlsPanel::new(cfg.trials.files.clone());
        let headline = cfg.headline.clone();
        Self {
            session,
            rx,
            view: SurfaceState::default(),
            live,
            headline,
            gauge,
            table: TrialsTablePanel::default(),
            chart: TrialsChartPanel::default(),
            controls,
            help: HelpWindow::default(),
        }
    }

    fn apply_commands(&mut self, ctx: &egui::Context, commands: Vec<UserCommand>) {
        for command in commands {
            match self.session.handle_command(command) {
                SessionFlow::Continue => {}
                SessionFlow::ShowHelp => self.help.open = true,
                SessionFlow::Exit => {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    return;
                }
            }
        }
    }
}

impl eframe::App for SonarApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Window close button: release the board before the viewport goes away.
        if ctx.input(|i| i.viewport().close_requested()) {
            self.session.shutdown();
        }

        let next_tick = self.session.poll(Instant::now());
        self.view.drain(&self.rx);

        let mut commands = Vec::new();

        if let Some(headline) = &self.headline {
            egui::TopBottomPanel::top("headline").show(ctx, |ui| {
                ui.heading(headline.as_str());
            });
        }
        if self.live {
            egui::TopBottomPanel::top(self.gauge.name())
                .resizable(false)
                .show(ctx, |ui| {
                    ui.add_space(4.0);
                    self.gauge.render(ui, &self.view, &mut commands);
                    ui.add_space(4.0);
                });
        }
        egui::TopBottomPanel::bottom(self.controls.name()).show(ctx, |ui| {
            ui.add_space(4.0);
            self.controls.render(ui, &self.view, &mut commands);
            ui.add_space(4.0);
        });
        egui::SidePanel::left(self.table.name())
            .resizable(true)
            .default_width(560.0)
            .show(ctx, |ui| {
                self.table.render(ui, &self.view, &mut commands);
            });
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart.render(ui, &self.view, &mut commands);
        });
        self.help.show(ctx);

        if !commands.is_empty() {
            self.apply_commands(ctx, commands);
            ctx.request_repaint();
        }
        ctx.request_repaint_after(next_tick.unwrap_or(IDLE_REPAINT));
    }
}
