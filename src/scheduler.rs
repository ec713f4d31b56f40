//! Fixed-cadence periodic task driven by the owner's event loop.
//!
//! The task never runs on its own thread. The owner polls it from its loop
//! (the UI frame in the application, a plain loop in tests) and runs the tick
//! body when [`PeriodicTask::poll`] says it is due. Because the body runs to
//! completion inside that call, two ticks can never overlap. A tick that is
//! late by more than one period does not cause catch-up ticks: missed
//! deadlines are skipped and the schedule realigns to the original phase.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskState {
    Idle,
    Running { next_due: Instant },
    Stopped,
}

/// Periodic schedule with explicit start and stop.
#[derive(Debug, Clone)]
pub struct PeriodicTask {
    period: Duration,
    state: TaskState,
    ticks: u64,
    skipped: u64,
}

impl PeriodicTask {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            state: TaskState::Idle,
            ticks: 0,
            skipped: 0,
        }
    }

    /// Arm the task. The first tick is due immediately.
    pub fn start(&mut self, now: Instant) {
        if self.state == TaskState::Idle {
            self.state = TaskState::Running { next_due: now };
        }
    }

    /// Disarm the task. A stopped task never becomes due again.
    pub fn stop(&mut self) {
        self.state = TaskState::Stopped;
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, TaskState::Running { .. })
    }

    /// Number of ticks that have been due so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Number of deadlines dropped because the loop was late.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Returns `true` when a tick is due at `now` and advances the schedule.
    pub fn poll(&mut self, now: Instant) -> bool {
        let TaskState::Running { next_due } = self.state else {
            return false;
        };
        if now < next_due {
            return false;
        }
        let missed = now.duration_since(next_due).as_nanos() / self.period.as_nanos();
        self.skipped = self
            .skipped
            .saturating_add(u64::try_from(missed).unwrap_or(u64::MAX));
        // Keep the original phase when the step is representable, else realign to `now`.
        let next_due = u32::try_from(missed + 1)
            .ok()
            .and_then(|steps| next_due.checked_add(self.period.checked_mul(steps)?))
            .unwrap_or(now + self.period);
        self.state = TaskState::Running { next_due };
        self.ticks += 1;
        true
    }

    /// Time left until the next tick, `None` when not running.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        match self.state {
            TaskState::Running { next_due } => Some(next_due.saturating_duration_since(now)),
            _ => None,
        }
    }
}
