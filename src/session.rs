//! Core runtime: live acquisition, refresh ticks, trial loads and shutdown.
//!
//! A [`SonarSession`] is driven by a single cooperative loop. The owner calls
//! [`SonarSession::poll`] from that loop and forwards user commands to
//! [`SonarSession::handle_command`]; refresh ticks and trial loads therefore run
//! one at a time and each push to the surface completes before the next task
//! starts. The only thing shared with another thread is the reading slot,
//! written by the sensor callback.
//!
//! Shutdown order: stop the refresh task, then release the sensor link. The
//! link's own shutdown joins its reader thread, so no callback can run after
//! the session has let go of the board.

use std::path::Path;
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};

use crate::config::SonarConfig;
use crate::error::{HardwareLinkError, MalformedInputError};
use crate::gauge::{gauge_state, GaugeState};
use crate::reading::{Reading, ReadingReader, SharedReading};
use crate::render::render;
use crate::scheduler::PeriodicTask;
use crate::sensor::{SensorLink, SonarEvent};
use crate::sink::{PresentationSurface, UserCommand};
use crate::trials;

/// What the surface should do after a command was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionFlow {
    Continue,
    ShowHelp,
    Exit,
}

pub struct SonarSession<S: PresentationSurface> {
    config: SonarConfig,
    surface: S,
    reading: SharedReading,
    reader: ReadingReader,
    link: Option<Box<dyn SensorLink>>,
    refresh: PeriodicTask,
    shut_down: bool,
}

impl<S: PresentationSurface> SonarSession<S> {
    pub fn new(config: SonarConfig, surface: S) -> Self {
        let reading = SharedReading::new();
        let reader = reading.reader();
        let refresh = PeriodicTask::new(config.gauge.refresh_period());
        Self {
            config,
            surface,
            reading,
            reader,
            link: None,
            refresh,
            shut_down: false,
        }
    }

    pub fn config(&self) -> &SonarConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// `true` while a sensor link is held and the refresh task is armed.
    pub fn is_acquiring(&self) -> bool {
        self.link.is_some() && self.refresh.is_running()
    }

    pub fn refresh_task(&self) -> &PeriodicTask {
        &self.refresh
    }

    /// Open `link`, register the reading callback and arm the refresh task.
    ///
    /// Errors are returned to the caller and also shown on the gauge. They are
    /// never retried. On failure the link is shut down before returning, so
    /// every link handed to the session is shut down exactly once.
    pub fn start_acquisition(
        &mut self,
        mut link: Box<dyn SensorLink>,
        now: Instant,
    ) -> Result<(), HardwareLinkError> {
        if self.shut_down || self.link.is_some() {
            warn!("acquisition already started or session closed");
            return Ok(());
        }
        let name = link.describe();
        if let Err(e) = link.open() {
            Self::release_unused(&name, link.as_mut());
            return Err(self.acquisition_failed(&name, e));
        }
        let Some(writer) = self.reading.take_writer() else {
            Self::release_unused(&name, link.as_mut());
            return Err(HardwareLinkError::NotOpen);
        };
        let callback = Box::new(move |event: SonarEvent| match event {
            SonarEvent::Reading(report) => {
                writer.publish_reading(Reading::new(report.distance_cm, report.received_at))
            }
            SonarEvent::LinkLost(msg) => writer.report_link_error(msg),
        });
        let sensor = &self.config.sensor;
        if let Err(e) = link.start_ranging(sensor.trigger_pin, sensor.echo_pin, callback) {
            Self::release_unused(&name, link.as_mut());
            return Err(self.acquisition_failed(&name, e));
        }
        info!("acquisition started on {name}");
        self.link = Some(link);
        self.refresh.start(now);
        Ok(())
    }

    /// Shut down a link the session is not going to keep.
    fn release_unused(name: &str, link: &mut dyn SensorLink) {
        if let Err(e) = link.shutdown() {
            warn!("{name}: shutdown after failed start: {e}");
        }
    }

    fn acquisition_failed(&mut self, name: &str, e: HardwareLinkError) -> HardwareLinkError {
        error!("{name}: {e}");
        let state = GaugeState::LinkLost(e.to_string());
        self.surface.set_gauge(state);
        e
    }

    /// Run the refresh tick if it is due. Returns the time until the next one.
    pub fn poll(&mut self, now: Instant) -> Option<Duration> {
        if self.refresh.poll(now) {
            self.refresh_tick();
        }
        self.refresh.time_until_due(now)
    }

    /// Snapshot the reading slot and push the derived gauge to the surface.
    pub fn refresh_tick(&mut self) -> GaugeState {
        let snapshot = self.reader.snapshot();
        let state = gauge_state(&snapshot, &self.config.gauge);
        self.surface.set_gauge(state.clone());
        if let GaugeState::LinkLost(msg) = &state {
            if self.link.is_some() {
                error!("{}", HardwareLinkError::LinkLost(msg.clone()));
            }
            self.release_link();
        }
        state
    }

    pub fn handle_command(&mut self, command: UserCommand) -> SessionFlow {
        match command {
            UserCommand::LoadRequested(file_name) => {
                let path = self.config.trials.resolve(&file_name);
                self.load_from_command(&path);
                SessionFlow::Continue
            }
            UserCommand::LoadPath(path) => {
                self.load_from_command(&path);
                SessionFlow::Continue
            }
            UserCommand::DismissError => {
                self.surface.clear_error();
                SessionFlow::Continue
            }
            UserCommand::HelpRequested => SessionFlow::ShowHelp,
            UserCommand::ExitRequested => {
                self.shutdown();
                SessionFlow::Exit
            }
        }
    }

    /// Button-triggered load. The failure is already on the surface.
    fn load_from_command(&mut self, path: &Path) {
        if let Err(e) = self.load_trials(path) {
            debug!("load of {} left the previous dataset in place: {e}", path.display());
        }
    }

    /// Load a trial file and replace the table and chart in one push. On
    /// failure only an error message is pushed; what is on screen stays.
    pub fn load_trials(&mut self, path: &Path) -> Result<(), MalformedInputError> {
        match trials::load(path) {
            Ok(dataset) => {
                self.surface.set_dataset(render(&dataset));
                Ok(())
            }
            Err(e) => {
                warn!("trial load failed: {e}");
                self.surface.show_error(format!("Error reading file: {e}"));
                Err(e)
            }
        }
    }

    fn release_link(&mut self) {
        self.refresh.stop();
        if let Some(mut link) = self.link.take() {
            let name = link.describe();
            match link.shutdown() {
                Ok(()) => info!("{name} released"),
                Err(e) => error!("{name}: shutdown failed: {e}"),
            }
        }
    }

    /// Stop refreshing and release the sensor link. Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        self.release_link();
    }
}

impl<S: PresentationSurface> Drop for SonarSession<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
