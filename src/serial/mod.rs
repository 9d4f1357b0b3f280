//! # Serial Communication Module
//!
//! Opens the physical link to the telemetry device.
//!
//! This module handles:
//! - Opening the serial port at the configured baud rate (8N1)
//! - Auto-detecting the device across common paths
//! - Exposing the port as a [`ByteSource`] for the capture core
//!
//! Everything downstream of [`ByteSource`] is transport-agnostic; this is
//! the only place that knows about baud rates or device paths.

use std::io::Read;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{CaptureError, Result};

pub mod byte_source;

pub use byte_source::ByteSource;

/// Default micro:bit UART baud rate
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Default device paths to try (in order of preference)
const DEFAULT_DEVICE_PATHS: &[&str] = &[
    "/dev/ttyACM0", // USB CDC devices (micro:bit enumerates as one)
    "/dev/ttyUSB0", // USB-to-serial adapters
];

/// Serial port handler for the telemetry device
pub struct TelemetryPort {
    /// Serial port handle
    port: Box<dyn serialport::SerialPort>,
    /// Device path (e.g., /dev/ttyACM0)
    device_path: String,
}

impl std::fmt::Debug for TelemetryPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryPort")
            .field("device_path", &self.device_path)
            .finish_non_exhaustive()
    }
}

impl TelemetryPort {
    /// Open a connection to the telemetry device
    ///
    /// Auto-detects the device by trying common paths.
    ///
    /// # Arguments
    ///
    /// * `baud_rate` - Line rate the firmware is flashed with
    /// * `timeout` - Per-read timeout; reads retry on expiry so the
    ///   [`ByteSource`] contract stays blocking
    ///
    /// # Errors
    ///
    /// Returns error if no device is found or the connection fails
    pub fn open(baud_rate: u32, timeout: Duration) -> Result<Self> {
        Self::open_with_paths(DEFAULT_DEVICE_PATHS, baud_rate, timeout)
    }

    /// Open a connection trying custom device paths
    ///
    /// # Arguments
    ///
    /// * `paths` - Device paths to try (e.g., &["/dev/ttyACM0"])
    /// * `baud_rate` - Line rate the firmware is flashed with
    /// * `timeout` - Per-read timeout
    pub fn open_with_paths(paths: &[&str], baud_rate: u32, timeout: Duration) -> Result<Self> {
        for path in paths {
            debug!("trying to open serial port: {}", path);

            match Self::open_port(path, baud_rate, timeout) {
                Ok(port) => {
                    info!("opened telemetry device at {}", path);
                    return Ok(Self {
                        port,
                        device_path: path.to_string(),
                    });
                }
                Err(e) => {
                    warn!("failed to open {}: {}", path, e);
                    continue;
                }
            }
        }

        Err(CaptureError::SerialPortNotFound(paths.join(", ")))
    }

    /// Open a specific serial port with 8N1 settings
    fn open_port(
        path: &str,
        baud_rate: u32,
        timeout: Duration,
    ) -> Result<Box<dyn serialport::SerialPort>> {
        let port = serialport::new(path, baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .flow_control(serialport::FlowControl::None)
            .timeout(timeout)
            .open()
            .map_err(|e| CaptureError::Serial(format!("failed to open {}: {}", path, e)))?;

        Ok(port)
    }

    /// Get the device path of the opened serial port
    pub fn device_path(&self) -> &str {
        &self.device_path
    }
}

impl ByteSource for TelemetryPort {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        // serialport surfaces its read timeout as an error; the device sends
        // continuously once it is up, so expiry just means "no data yet" and
        // the blocking contract is kept by retrying.
        loop {
            match self.port.read(buf) {
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => continue,
                Err(e) => return Err(e),
            }
        }
    }
}
