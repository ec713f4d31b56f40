//! Telemetrix serial protocol, HC-SR04 subset.
//!
//! Every message in both directions is a length-prefixed packet:
//!
//! ```text
//! [len, id, payload...]      len = number of bytes after the length byte
//! ```
//!
//! Host commands used here:
//! - `ARE_U_THERE (6)` answered by report `I_AM_HERE (6) instance_id`
//! - `SONAR_NEW (13) trigger_pin echo_pin`
//! - `STOP_ALL_REPORTS (15)`
//!
//! The board then streams `SONAR_DISTANCE (11) trigger_pin metres centimetres`
//! reports; the distance in centimetres is `metres * 100 + centimetres`.
//!
//! Opening the port resets most Arduino boards, so the handshake repeats
//! `ARE_U_THERE` until the board answers or the timeout elapses.

use std::io::{ErrorKind, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};
use serialport::{SerialPort, SerialPortType};

use super::{RangingCallback, SensorLink, SonarEvent, SonarReport};
use crate::error::HardwareLinkError;

// Host → board
const ARE_U_THERE: u8 = 6;
const SONAR_NEW: u8 = 13;
const STOP_ALL_REPORTS: u8 = 15;

// Board → host
const I_AM_HERE: u8 = 6;
const SONAR_DISTANCE: u8 = 11;
const DEBUG_PRINT: u8 = 99;

/// Serial read timeout; bounds how long the reader thread takes to notice a stop.
const READ_TIMEOUT: Duration = Duration::from_millis(100);
const HANDSHAKE_RETRY: Duration = Duration::from_millis(500);

/// Frame a command as `[len, id, args...]`.
pub fn encode_command(id: u8, args: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(args.len() + 2);
    out.push((args.len() + 1) as u8);
    out.push(id);
    out.extend_from_slice(args);
    out
}

/// Incremental splitter for length-prefixed report packets.
#[derive(Debug, Default)]
pub struct PacketDecoder {
    buf: Vec<u8>,
}

impl PacketDecoder {
    pub fn feed(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Next complete packet body (without the length byte), if any.
    pub fn next_packet(&mut self) -> Option<Vec<u8>> {
        loop {
            let len = *self.buf.first()? as usize;
            if len == 0 {
                self.buf.remove(0);
                continue;
            }
            if self.buf.len() < len + 1 {
                return None;
            }
            let body = self.buf[1..=len].to_vec();
            self.buf.drain(..=len);
            return Some(body);
        }
    }
}

/// Decode a `SONAR_DISTANCE` report body. `None` for any other packet.
pub fn decode_sonar_report(body: &[u8], received_at: Instant) -> Option<SonarReport> {
    match body {
        [SONAR_DISTANCE, trigger_pin, metres, centimetres, ..] => Some(SonarReport {
            trigger_pin: *trigger_pin,
            distance_cm: f64::from(*metres) * 100.0 + f64::from(*centimetres),
            received_at,
        }),
        _ => None,
    }
}

/// Pick the first USB serial port, which is where Arduino boards enumerate.
fn detect_port() -> Option<String> {
    let ports = serialport::available_ports().ok()?;
    ports
        .into_iter()
        .find(|p| matches!(p.port_type, SerialPortType::UsbPort(_)))
        .map(|p| p.port_name)
}

/// Board connection over a serial port.
pub struct TelemetrixLink {
    configured_port: Option<String>,
    port_name: Option<String>,
    baud_rate: u32,
    handshake_timeout: Duration,
    port: Option<Box<dyn SerialPort>>,
    reader: Option<JoinHandle<()>>,
    stop: Arc<AtomicBool>,
}

impl TelemetrixLink {
    pub fn new(port: Option<String>, baud_rate: u32, handshake_timeout: Duration) -> Self {
        Self {
            configured_port: port,
            port_name: None,
            baud_rate,
            handshake_timeout,
            port: None,
            reader: None,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    fn send(&mut self, id: u8, args: &[u8]) -> Result<(), HardwareLinkError> {
        let port = self.port.as_mut().ok_or(HardwareLinkError::NotOpen)?;
        let packet = encode_command(id, args);
        debug!("telemetrix tx {:?}", packet);
        port.write_all(&packet)?;
        port.flush()?;
        Ok(())
    }

    fn handshake(&mut self, port_name: &str) -> Result<u8, HardwareLinkError> {
        let deadline = Instant::now() + self.handshake_timeout;
        let mut decoder = PacketDecoder::default();
        let mut tmp = [0u8; 64];
        let mut next_hello = Instant::now();
        while Instant::now() < deadline {
            if Instant::now() >= next_hello {
                self.send(ARE_U_THERE, &[])?;
                next_hello = Instant::now() + HANDSHAKE_RETRY;
            }
            let port = self.port.as_mut().ok_or(HardwareLinkError::NotOpen)?;
            match port.read(&mut tmp) {
                Ok(n) => decoder.feed(&tmp[..n]),
                Err(e) if e.kind() == ErrorKind::TimedOut => {}
                Err(e) => return Err(e.into()),
            }
            while let Some(body) = decoder.next_packet() {
                if let [I_AM_HERE, instance_id, ..] = body.as_slice() {
                    return Ok(*instance_id);
                }
                debug!("telemetrix: ignoring {:?} during handshake", body);
            }
        }
        Err(HardwareLinkError::HandshakeTimeout {
            port: port_name.to_string(),
            timeout_ms: self.handshake_timeout.as_millis() as u64,
        })
    }
}

impl SensorLink for TelemetrixLink {
    fn describe(&self) -> String {
        match (&self.port_name, &self.configured_port) {
            (Some(name), _) | (None, Some(name)) => format!("Telemetrix on {name}"),
            (None, None) => "Telemetrix (port auto-detect)".to_string(),
        }
    }

    fn open(&mut self) -> Result<(), HardwareLinkError> {
        let name = match self.configured_port.clone() {
            Some(name) => name,
            None => detect_port().ok_or(HardwareLinkError::NoPortFound)?,
        };
        let port = serialport::new(&name, self.baud_rate)
            .timeout(READ_TIMEOUT)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .flow_control(serialport::FlowControl::None)
            .open()
            .map_err(|source| HardwareLinkError::Open {
                port: name.clone(),
                source,
            })?;
        self.port = Some(port);
        self.port_name = Some(name.clone());

        match self.handshake(&name) {
            Ok(instance_id) => {
                info!("Telemetrix board on {name} answered (instance {instance_id})");
                Ok(())
            }
            Err(e) => {
                self.port = None;
                Err(e)
            }
        }
    }

    fn start_ranging(
        &mut self,
        trigger_pin: u8,
        echo_pin: u8,
        mut on_reading: RangingCallback,
    ) -> Result<(), HardwareLinkError> {
        if self.reader.is_some() {
            warn!("ranging already started on {}", self.describe());
            return Ok(());
        }
        let mut rx_port = self
            .port
            .as_ref()
            .ok_or(HardwareLinkError::NotOpen)?
            .try_clone()
            .map_err(|source| HardwareLinkError::Open {
                port: self.describe(),
                source,
            })?;
        self.send(SONAR_NEW, &[trigger_pin, echo_pin])?;
        info!("sonar registered: trigger={trigger_pin} echo={echo_pin}");

        self.stop.store(false, Ordering::SeqCst);
        let stop = Arc::clone(&self.stop);
        let handle = std::thread::Builder::new()
            .name("telemetrix-reader".into())
            .spawn(move || {
                let mut decoder = PacketDecoder::default();
                let mut tmp = [0u8; 256];
                while !stop.load(Ordering::SeqCst) {
                    match rx_port.read(&mut tmp) {
                        Ok(0) => continue,
                        Ok(n) => decoder.feed(&tmp[..n]),
                        Err(e) if e.kind() == ErrorKind::TimedOut => continue,
                        Err(e) => {
                            error!("telemetrix read failed: {e}");
                            on_reading(SonarEvent::LinkLost(e.to_string()));
                            return;
                        }
                    }
                    while let Some(body) = decoder.next_packet() {
                        if let Some(report) = decode_sonar_report(&body, Instant::now()) {
                            on_reading(SonarEvent::Reading(report));
                        } else if body.first() == Some(&DEBUG_PRINT) {
                            debug!("telemetrix debug print {:?}", &body[1..]);
                        }
                    }
                }
            })?;
        self.reader = Some(handle);
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), HardwareLinkError> {
        let stop_result = if self.port.is_some() {
            self.send(STOP_ALL_REPORTS, &[])
        } else {
            Ok(())
        };
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.reader.take() {
            if handle.join().is_err() {
                error!("telemetrix reader thread panicked");
            }
        }
        self.port = None;
        info!("{} closed", self.describe());
        stop_result
    }
}
