//! # Wire Layout Constants and Types
//!
//! Core definitions for the micro:bit telemetry wire format.
//!
//! A frame on the wire is a fixed run of big-endian fields followed by the
//! two-byte terminator:
//!
//! ```text
//! timestamp(f64) sample_count(u8) accel_x/y/z(f64) mag_x/y/z(f64) [temperature(f64)] \r\n
//! ```
//!
//! The terminator is stripped by the frame reader before decoding; the
//! lengths below describe the payload only.

use serde::Deserialize;

/// Frame terminator on the wire (`\r\n`)
pub const FRAME_TERMINATOR: [u8; 2] = [0x0D, 0x0A];

/// Payload length of a legacy frame: 7 × f64 + 1 × u8
pub const LEGACY_FRAME_LEN: usize = 57;

/// Payload length of a frame carrying temperature: 8 × f64 + 1 × u8
pub const WITH_TEMPERATURE_FRAME_LEN: usize = 65;

/// Configured wire layout
///
/// A fixed build/run-time choice, never auto-detected per frame: both layouts
/// can accidentally satisfy "parses without error" on malformed input of the
/// right length, so detection would be unsound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum Layout {
    /// 8-field layout: timestamp, sample count, accelerometer and
    /// magnetometer axes
    #[default]
    #[serde(rename = "legacy-8-field")]
    Legacy,

    /// 9-field layout: legacy fields plus a trailing temperature reading
    #[serde(rename = "with-temperature-9-field")]
    WithTemperature,
}

impl Layout {
    /// Exact payload length (terminator excluded) a frame must have to
    /// decode under this layout
    pub const fn expected_len(self) -> usize {
        match self {
            Layout::Legacy => LEGACY_FRAME_LEN,
            Layout::WithTemperature => WITH_TEMPERATURE_FRAME_LEN,
        }
    }

    /// Whether frames carry the trailing temperature field
    pub const fn has_temperature(self) -> bool {
        matches!(self, Layout::WithTemperature)
    }
}

/// A decoded telemetry sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    /// Seconds since the device clock started (monotonic on the device)
    pub timestamp: f64,

    /// Number of raw sensor reads averaged into this sample
    pub sample_count: u8,

    /// Accelerometer axes in g
    pub accel_x: f64,
    pub accel_y: f64,
    pub accel_z: f64,

    /// Magnetometer axes in µT
    pub mag_x: f64,
    pub mag_y: f64,
    pub mag_z: f64,

    /// Die temperature in °C; `None` under [`Layout::Legacy`]
    pub temperature: Option<f64>,
}

/// Outcome of decoding one frame
///
/// Rejections are expected traffic (device banners, line noise at startup)
/// and must never be mistaken for a crash; the capture loop discards them
/// and continues.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeOutcome {
    /// Frame matched the layout exactly and decoded into a record
    Accepted(Record),

    /// Frame did not match; carries the reason for diagnostics only
    Rejected(RejectReason),
}

/// Why a frame was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Frame length did not match the configured layout
    ShapeMismatch { expected: usize, actual: usize },
}
