//! Synthetic sensor: a slow back-and-forth sweep that briefly leaves the
//! gauge range on every pass.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use log::{error, info};

use super::{RangingCallback, SensorLink, SonarEvent, SonarReport};
use crate::error::HardwareLinkError;

pub struct SimulatedLink {
    interval: Duration,
    min_cm: f64,
    max_cm: f64,
    opened: bool,
    worker: Option<JoinHandle<()>>,
    stop: Arc<AtomicBool>,
}

impl Default for SimulatedLink {
    fn default() -> Self {
        Self::new(Duration::from_millis(200), 5.0, 450.0)
    }
}

impl SimulatedLink {
    pub fn new(interval: Duration, min_cm: f64, max_cm: f64) -> Self {
        Self {
            interval,
            min_cm,
            max_cm,
            opened: false,
            worker: None,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }
}

/// Triangle wave between `min` and `max` with a 20 s period.
fn sweep(t_secs: f64, min: f64, max: f64) -> f64 {
    let phase = (t_secs / 20.0).fract();
    let tri = if phase < 0.5 { phase * 2.0 } else { 2.0 - phase * 2.0 };
    min + (max - min) * tri
}

impl SensorLink for SimulatedLink {
    fn describe(&self) -> String {
        "simulated sensor".to_string()
    }

    fn open(&mut self) -> Result<(), HardwareLinkError> {
        self.opened = true;
        info!("simulated sensor ready");
        Ok(())
    }

    fn start_ranging(
        &mut self,
        trigger_pin: u8,
        _echo_pin: u8,
        mut on_reading: RangingCallback,
    ) -> Result<(), HardwareLinkError> {
        if !self.opened {
            return Err(HardwareLinkError::NotOpen);
        }
        let stop = Arc::clone(&self.stop);
        let (interval, min, max) = (self.interval, self.min_cm, self.max_cm);
        let handle = std::thread::Builder::new()
            .name("simulated-sonar".into())
            .spawn(move || {
                let start = Instant::now();
                while !stop.load(Ordering::SeqCst) {
                    let d = sweep(start.elapsed().as_secs_f64(), min, max);
                    on_reading(SonarEvent::Reading(SonarReport {
                        trigger_pin,
                        distance_cm: d.round(),
                        received_at: Instant::now(),
                    }));
                    std::thread::sleep(interval);
                }
            })?;
        self.worker = Some(handle);
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), HardwareLinkError> {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                error!("simulated sensor thread panicked");
            }
        }
        self.opened = false;
        Ok(())
    }
}
