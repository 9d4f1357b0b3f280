//! # Packet Encoder
//!
//! Serializes a [`Record`] into the exact wire bytes the firmware sends.
//! The capture pipeline itself never re-encodes (it persists raw frame
//! bytes); the encoder exists for tests and instrument simulators.

use super::layout::{Layout, Record};

/// Encode a record into a frame payload (terminator not included)
///
/// Produces exactly `layout.expected_len()` bytes in firmware field order.
/// Under [`Layout::WithTemperature`] a record without a temperature reading
/// encodes the field as `0.0`.
///
/// # Arguments
///
/// * `record` - Sample to serialize
/// * `layout` - Wire layout to serialize for
pub fn encode(record: &Record, layout: Layout) -> Vec<u8> {
    let mut frame = Vec::with_capacity(layout.expected_len());

    frame.extend_from_slice(&record.timestamp.to_be_bytes());
    frame.push(record.sample_count);
    frame.extend_from_slice(&record.accel_x.to_be_bytes());
    frame.extend_from_slice(&record.accel_y.to_be_bytes());
    frame.extend_from_slice(&record.accel_z.to_be_bytes());
    frame.extend_from_slice(&record.mag_x.to_be_bytes());
    frame.extend_from_slice(&record.mag_y.to_be_bytes());
    frame.extend_from_slice(&record.mag_z.to_be_bytes());

    if layout.has_temperature() {
        frame.extend_from_slice(&record.temperature.unwrap_or(0.0).to_be_bytes());
    }

    frame
}
