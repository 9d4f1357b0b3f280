//! # Packet Decoder
//!
//! Decodes a delimited frame into a [`Record`] under a configured
//! [`Layout`].

use super::layout::{DecodeOutcome, Layout, Record, RejectReason};

/// Decode one frame (terminator already stripped)
///
/// Decoding is strict and all-or-nothing: a frame whose length does not
/// exactly match `layout.expected_len()` is rejected, and no partially
/// populated record is ever produced. Pure and deterministic: identical
/// bytes and layout always yield the identical outcome.
///
/// # Arguments
///
/// * `frame` - Frame payload bytes, without the `\r\n` terminator
/// * `layout` - Wire layout the device is configured with
///
/// # Returns
///
/// * `DecodeOutcome` - `Accepted(Record)` on an exact match, otherwise
///   `Rejected(ShapeMismatch)`
pub fn decode(frame: &[u8], layout: Layout) -> DecodeOutcome {
    let expected = layout.expected_len();
    if frame.len() != expected {
        return DecodeOutcome::Rejected(RejectReason::ShapeMismatch {
            expected,
            actual: frame.len(),
        });
    }

    // Field order fixed by the firmware: timestamp, sample count, then the
    // axis readings, temperature last when present. All floats big-endian.
    let timestamp = read_f64(frame, 0);
    let sample_count = frame[8];
    let accel_x = read_f64(frame, 9);
    let accel_y = read_f64(frame, 17);
    let accel_z = read_f64(frame, 25);
    let mag_x = read_f64(frame, 33);
    let mag_y = read_f64(frame, 41);
    let mag_z = read_f64(frame, 49);

    let temperature = if layout.has_temperature() {
        Some(read_f64(frame, 57))
    } else {
        None
    };

    DecodeOutcome::Accepted(Record {
        timestamp,
        sample_count,
        accel_x,
        accel_y,
        accel_z,
        mag_x,
        mag_y,
        mag_z,
        temperature,
    })
}

/// Read a big-endian f64 at `offset`
///
/// Callers guarantee `offset + 8 <= frame.len()` via the length check above.
fn read_f64(frame: &[u8], offset: usize) -> f64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&frame[offset..offset + 8]);
    f64::from_be_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::encoder::encode;
    use crate::packet::layout::{LEGACY_FRAME_LEN, WITH_TEMPERATURE_FRAME_LEN};

    fn sample_record(temperature: Option<f64>) -> Record {
        Record {
            timestamp: 12.5,
            sample_count: 4,
            accel_x: 0.012,
            accel_y: -0.98,
            accel_z: 1.002,
            mag_x: -23.4,
            mag_y: 15.0,
            mag_z: -44.25,
            temperature,
        }
    }

    #[test]
    fn test_decode_legacy_frame() {
        let record = sample_record(None);
        let frame = encode(&record, Layout::Legacy);
        assert_eq!(frame.len(), LEGACY_FRAME_LEN);

        let outcome = decode(&frame, Layout::Legacy);
        assert_eq!(outcome, DecodeOutcome::Accepted(record));
    }

    #[test]
    fn test_decode_with_temperature_frame() {
        let record = sample_record(Some(21.75));
        let frame = encode(&record, Layout::WithTemperature);
        assert_eq!(frame.len(), WITH_TEMPERATURE_FRAME_LEN);

        let outcome = decode(&frame, Layout::WithTemperature);
        assert_eq!(outcome, DecodeOutcome::Accepted(record));
    }

    #[test]
    fn test_decode_field_positions() {
        // Hand-built frame so the positional parse is checked against known
        // byte offsets, not just against the encoder.
        let mut frame = Vec::new();
        frame.extend_from_slice(&100.5f64.to_be_bytes());
        frame.push(7u8);
        for value in [1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0] {
            frame.extend_from_slice(&value.to_be_bytes());
        }

        match decode(&frame, Layout::Legacy) {
            DecodeOutcome::Accepted(record) => {
                assert_eq!(record.timestamp, 100.5);
                assert_eq!(record.sample_count, 7);
                assert_eq!(record.accel_x, 1.0);
                assert_eq!(record.accel_y, 2.0);
                assert_eq!(record.accel_z, 3.0);
                assert_eq!(record.mag_x, 4.0);
                assert_eq!(record.mag_y, 5.0);
                assert_eq!(record.mag_z, 6.0);
                assert_eq!(record.temperature, None);
            }
            other => panic!("expected acceptance, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        // A device banner is the common case
        let banner = b"setup v1.0";
        match decode(banner, Layout::Legacy) {
            DecodeOutcome::Rejected(RejectReason::ShapeMismatch { expected, actual }) => {
                assert_eq!(expected, 57);
                assert_eq!(actual, 10);
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_off_by_one() {
        let short = vec![0u8; LEGACY_FRAME_LEN - 1];
        assert!(matches!(decode(&short, Layout::Legacy), DecodeOutcome::Rejected(_)));

        let long = vec![0u8; LEGACY_FRAME_LEN + 1];
        assert!(matches!(decode(&long, Layout::Legacy), DecodeOutcome::Rejected(_)));
    }

    #[test]
    fn test_decode_rejects_other_layouts_frame() {
        // A 65-byte temperature frame must not decode under the legacy
        // layout, and vice versa.
        let temp_frame = encode(&sample_record(Some(20.0)), Layout::WithTemperature);
        assert!(matches!(decode(&temp_frame, Layout::Legacy), DecodeOutcome::Rejected(_)));

        let legacy_frame = encode(&sample_record(None), Layout::Legacy);
        assert!(matches!(
            decode(&legacy_frame, Layout::WithTemperature),
            DecodeOutcome::Rejected(_)
        ));
    }

    #[test]
    fn test_decode_empty_frame() {
        assert!(matches!(decode(&[], Layout::Legacy), DecodeOutcome::Rejected(_)));
    }

    #[test]
    fn test_decode_is_deterministic() {
        let frame = encode(&sample_record(None), Layout::Legacy);
        assert_eq!(decode(&frame, Layout::Legacy), decode(&frame, Layout::Legacy));
    }
}
