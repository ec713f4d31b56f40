//! Caller-driven sensor link for tests and headless runs.
//!
//! [`ScriptedSensorLink::new`] returns the link and a [`ScriptHandle`]. Queued
//! distances are delivered synchronously as soon as ranging starts; after that
//! the handle can push further readings (or a link failure) from any thread.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use super::{RangingCallback, SensorLink, SonarEvent, SonarReport};
use crate::error::HardwareLinkError;

#[derive(Default)]
struct ScriptState {
    callback: Option<RangingCallback>,
    trigger_pin: u8,
    echo_pin: u8,
    shut_down: bool,
}

/// Fake board link.
pub struct ScriptedSensorLink {
    queued: Vec<f64>,
    fail_open: bool,
    opened: bool,
    state: Arc<Mutex<ScriptState>>,
    opens: Arc<AtomicUsize>,
    shutdowns: Arc<AtomicUsize>,
}

/// Test-side handle of a [`ScriptedSensorLink`].
#[derive(Clone)]
pub struct ScriptHandle {
    state: Arc<Mutex<ScriptState>>,
    opens: Arc<AtomicUsize>,
    shutdowns: Arc<AtomicUsize>,
}

impl ScriptedSensorLink {
    pub fn new(queued: impl Into<Vec<f64>>) -> (Self, ScriptHandle) {
        let state = Arc::new(Mutex::new(ScriptState::default()));
        let opens = Arc::new(AtomicUsize::new(0));
        let shutdowns = Arc::new(AtomicUsize::new(0));
        let handle = ScriptHandle {
            state: Arc::clone(&state),
            opens: Arc::clone(&opens),
            shutdowns: Arc::clone(&shutdowns),
        };
        let link = Self {
            queued: queued.into(),
            fail_open: false,
            opened: false,
            state,
            opens,
            shutdowns,
        };
        (link, handle)
    }

    /// Make `open` fail the way an absent board does.
    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }
}

impl SensorLink for ScriptedSensorLink {
    fn describe(&self) -> String {
        "scripted sensor".to_string()
    }

    fn open(&mut self) -> Result<(), HardwareLinkError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        if self.fail_open {
            return Err(HardwareLinkError::NoPortFound);
        }
        self.opened = true;
        Ok(())
    }

    fn start_ranging(
        &mut self,
        trigger_pin: u8,
        echo_pin: u8,
        mut on_reading: RangingCallback,
    ) -> Result<(), HardwareLinkError> {
        if !self.opened {
            return Err(HardwareLinkError::NotOpen);
        }
        for d in self.queued.drain(..) {
            on_reading(SonarEvent::Reading(SonarReport {
                trigger_pin,
                distance_cm: d,
                received_at: Instant::now(),
            }));
        }
        let mut st = self.state.lock().map_err(|_| HardwareLinkError::NotOpen)?;
        st.callback = Some(on_reading);
        st.trigger_pin = trigger_pin;
        st.echo_pin = echo_pin;
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), HardwareLinkError> {
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut st) = self.state.lock() {
            st.callback = None;
            st.shut_down = true;
        }
        self.opened = false;
        Ok(())
    }
}

impl ScriptHandle {
    fn fire(&self, event: SonarEvent) -> bool {
        let mut st = self.state.lock().unwrap_or_else(|p| p.into_inner());
        match st.callback.as_mut() {
            Some(cb) => {
                cb(event);
                true
            }
            None => false,
        }
    }

    /// Deliver one reading. Returns `false` if ranging is not active.
    pub fn emit(&self, distance_cm: f64) -> bool {
        self.emit_at(distance_cm, Instant::now())
    }

    /// Deliver one reading stamped with `received_at`.
    pub fn emit_at(&self, distance_cm: f64, received_at: Instant) -> bool {
        let trigger_pin = self.pins().0;
        self.fire(SonarEvent::Reading(SonarReport {
            trigger_pin,
            distance_cm,
            received_at,
        }))
    }

    /// Simulate the board disappearing.
    pub fn lose_link(&self, message: &str) -> bool {
        self.fire(SonarEvent::LinkLost(message.to_string()))
    }

    /// `(trigger, echo)` pins passed to `start_ranging`.
    pub fn pins(&self) -> (u8, u8) {
        let st = self.state.lock().unwrap_or_else(|p| p.into_inner());
        (st.trigger_pin, st.echo_pin)
    }

    pub fn open_calls(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn shutdown_calls(&self) -> usize {
        self.shutdowns.load(Ordering::SeqCst)
    }

    pub fn is_shut_down(&self) -> bool {
        self.state.lock().map(|st| st.shut_down).unwrap_or(true)
    }
}
