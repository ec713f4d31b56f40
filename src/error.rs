//! Error taxonomy shared by the acquisition path and the trial loader.
//!
//! Two families matter to callers:
//! - [`HardwareLinkError`] is fatal for the live acquisition path. It is never
//!   retried; the session reports it and keeps the historical viewer usable.
//! - [`MalformedInputError`] is local to a single CSV load attempt and leaves
//!   every other piece of state untouched.
//!
//! Informational conditions (no data yet, out-of-range reading) are not errors;
//! see [`crate::gauge::GaugeState`].

use std::path::PathBuf;

use thiserror::Error;

/// Failures of the sensor board link.
#[derive(Error, Debug)]
pub enum HardwareLinkError {
    /// No serial port was configured and none could be detected.
    #[error("no serial port found for the sensor board")]
    NoPortFound,

    /// The serial port could not be opened.
    #[error("failed to open {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: serialport::Error,
    },

    /// The board did not identify itself in time after the port was opened.
    #[error("board on {port} did not answer the handshake within {timeout_ms} ms")]
    HandshakeTimeout { port: String, timeout_ms: u64 },

    /// Low-level I/O failure while talking to the board.
    #[error("I/O error on sensor link: {0}")]
    Io(#[from] std::io::Error),

    /// The reader side of the link stopped because the board went away.
    #[error("sensor link lost: {0}")]
    LinkLost(String),

    /// `start_ranging` was called before `open`, or after `shutdown`.
    #[error("sensor link is not open")]
    NotOpen,
}

/// Reasons a CSV trial file is rejected. The whole load fails; no partial
/// dataset is ever produced.
#[derive(Error, Debug)]
pub enum MalformedInputError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: expected two header lines, found {found}")]
    MissingHeader { path: PathBuf, found: usize },

    #[error("{path}:{line}: expected at least 4 fields, found {found}")]
    ShortRow {
        path: PathBuf,
        line: u64,
        found: usize,
    },

    #[error("{path}:{line}: invalid trial index {value:?}")]
    BadTrialIndex {
        path: PathBuf,
        line: u64,
        value: String,
    },

    #[error("{path}:{line}: invalid {column} {value:?}")]
    BadDistance {
        path: PathBuf,
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("{path}:{line}: trial index {index} does not follow {previous}")]
    NonIncreasingIndex {
        path: PathBuf,
        line: u64,
        index: u32,
        previous: u32,
    },

    #[error("{path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Configuration file problems.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid config {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}
