//! Single-slot, last-value-wins buffer for the most recent sensor reading.
//!
//! The sensor callback holds the only [`ReadingWriter`]; the refresh tick reads
//! through a [`ReadingReader`]. Both wrap the same slot. A write replaces the
//! previous value in place and a read takes a copy without consuming it, so
//! consecutive ticks see the same reading until a newer one arrives. Readings
//! that arrive between two ticks and are superseded are simply lost.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

/// One distance sample as delivered by the sensor link.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// `None` when the report carried no usable distance.
    pub distance_cm: Option<f64>,
    pub captured_at: Instant,
    pub valid: bool,
}

impl Reading {
    pub fn new(distance_cm: f64, captured_at: Instant) -> Self {
        if distance_cm.is_finite() {
            Self {
                distance_cm: Some(distance_cm),
                captured_at,
                valid: true,
            }
        } else {
            Self {
                distance_cm: None,
                captured_at,
                valid: false,
            }
        }
    }
}

/// Copy of the slot taken by a refresh tick.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReadingSnapshot {
    pub reading: Option<Reading>,
    /// Set when the link reported a failure after it was started.
    pub link_error: Option<String>,
}

#[derive(Default)]
struct ReadingSlot {
    reading: Option<Reading>,
    link_error: Option<String>,
}

/// Process-scoped owner of the reading slot. Hands out exactly one writer.
pub struct SharedReading {
    inner: Arc<Mutex<ReadingSlot>>,
    writer_taken: bool,
}

impl SharedReading {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(ReadingSlot::default())),
            writer_taken: false,
        }
    }

    /// The single writer for this slot. Returns `None` once it has been handed out.
    pub fn take_writer(&mut self) -> Option<ReadingWriter> {
        if self.writer_taken {
            return None;
        }
        self.writer_taken = true;
        Some(ReadingWriter {
            inner: Arc::clone(&self.inner),
        })
    }

    pub fn reader(&self) -> ReadingReader {
        ReadingReader {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Default for SharedReading {
    fn default() -> Self {
        Self::new()
    }
}

fn lock(inner: &Mutex<ReadingSlot>) -> MutexGuard<'_, ReadingSlot> {
    // A panicking writer cannot leave the slot half-written: every write is a
    // single field assignment.
    inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Write side, moved into the sensor callback.
pub struct ReadingWriter {
    inner: Arc<Mutex<ReadingSlot>>,
}

impl ReadingWriter {
    /// Replace the current reading. Clears any earlier link error.
    pub fn publish_reading(&self, reading: Reading) {
        let mut slot = lock(&self.inner);
        slot.reading = Some(reading);
        slot.link_error = None;
    }

    /// Record that the link failed. The last reading is kept but flagged stale.
    pub fn report_link_error(&self, message: impl Into<String>) {
        lock(&self.inner).link_error = Some(message.into());
    }
}

/// Read side, used by the refresh tick.
#[derive(Clone)]
pub struct ReadingReader {
    inner: Arc<Mutex<ReadingSlot>>,
}

impl ReadingReader {
    pub fn snapshot(&self) -> ReadingSnapshot {
        let slot = lock(&self.inner);
        ReadingSnapshot {
            reading: slot.reading,
            link_error: slot.link_error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_until_first_publish() {
        let mut shared = SharedReading::new();
        let reader = shared.reader();
        assert_eq!(reader.snapshot().reading, None);

        let writer = shared.take_writer().unwrap();
        writer.publish_reading(Reading::new(42.0, Instant::now()));
        assert_eq!(reader.snapshot().reading.unwrap().distance_cm, Some(42.0));
    }

    #[test]
    fn only_one_writer() {
        let mut shared = SharedReading::new();
        assert!(shared.take_writer().is_some());
        assert!(shared.take_writer().is_none());
    }

    #[test]
    fn last_write_wins_and_reads_do_not_consume() {
        let mut shared = SharedReading::new();
        let writer = shared.take_writer().unwrap();
        let reader = shared.reader();
        writer.publish_reading(Reading::new(10.0, Instant::now()));
        writer.publish_reading(Reading::new(20.0, Instant::now()));
        assert_eq!(reader.snapshot().reading.unwrap().distance_cm, Some(20.0));
        assert_eq!(reader.snapshot().reading.unwrap().distance_cm, Some(20.0));
    }

    #[test]
    fn non_finite_distance_is_invalid() {
        let r = Reading::new(f64::NAN, Instant::now());
        assert!(!r.valid);
        assert_eq!(r.distance_cm, None);
    }

    #[test]
    fn publish_clears_link_error() {
        let mut shared = SharedReading::new();
        let writer = shared.take_writer().unwrap();
        let reader = shared.reader();
        writer.publish_reading(Reading::new(5.0, Instant::now()));
        writer.report_link_error("unplugged");
        let snap = reader.snapshot();
        assert_eq!(snap.link_error.as_deref(), Some("unplugged"));
        assert!(snap.reading.is_some());
        writer.publish_reading(Reading::new(6.0, Instant::now()));
        assert_eq!(reader.snapshot().link_error, None);
    }

    #[test]
    fn writer_on_another_thread() {
        let mut shared = SharedReading::new();
        let writer = shared.take_writer().unwrap();
        let reader = shared.reader();
        std::thread::spawn(move || writer.publish_reading(Reading::new(123.0, Instant::now())))
            .join()
            .unwrap();
        assert_eq!(reader.snapshot().reading.unwrap().distance_cm, Some(123.0));
    }
}
