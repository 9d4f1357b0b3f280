//! # Frame Reader
//!
//! Groups raw link bytes into `\r\n`-delimited frames.
//!
//! The reader owns an accumulation buffer so that sources may return any
//! number of bytes per read: bytes past a terminator are retained for the
//! next frame, and a terminator split across two reads is still detected.
//! Frames are bounded by a configurable maximum length so a broken or
//! adversarial source cannot grow the buffer without limit.

use bytes::{Bytes, BytesMut};
use tracing::debug;

use crate::error::{CaptureError, Result};
use crate::packet::FRAME_TERMINATOR;
use crate::serial::byte_source::ByteSource;

/// Default cap on accumulated bytes while waiting for a terminator
pub const DEFAULT_MAX_FRAME_LEN: usize = 256;

/// Read granularity per source call
const READ_CHUNK: usize = 64;

/// One observation from the frame reader
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameEvent {
    /// A complete frame, terminator stripped. Never contains the terminator
    /// internally: the split happens at its first occurrence.
    Frame(Bytes),

    /// The accumulation cap was hit before a terminator arrived; buffered
    /// bytes were discarded and the stream resynchronized at the next
    /// terminator
    Oversize { discarded: usize },

    /// The source reported end of stream
    Eof,
}

/// Delimits frames in an unstructured byte stream
#[derive(Debug)]
pub struct FrameReader {
    buf: BytesMut,
    max_frame_len: usize,
    /// Set while skipping garbage after an overflow, until the next
    /// terminator restores frame alignment
    resyncing: bool,
    discarded: usize,
}

impl FrameReader {
    /// Create a reader with the given accumulation cap
    pub fn new(max_frame_len: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(READ_CHUNK * 2),
            max_frame_len,
            resyncing: false,
            discarded: 0,
        }
    }

    /// Pull bytes from `source` until a frame boundary is seen
    ///
    /// Blocks for as long as the source does. Source I/O errors are fatal
    /// and surface as [`CaptureError::Link`]; a short read of zero bytes is
    /// treated as the link closing.
    ///
    /// # Arguments
    ///
    /// * `source` - The caller-owned link to read from
    ///
    /// # Returns
    ///
    /// * `Result<FrameEvent>` - Next frame, an oversize notice, or `Eof`
    pub fn next_frame<S: ByteSource>(&mut self, source: &mut S) -> Result<FrameEvent> {
        loop {
            if let Some(event) = self.take_event() {
                return Ok(event);
            }

            let mut chunk = [0u8; READ_CHUNK];
            let n = source
                .read(&mut chunk)
                .map_err(|e| CaptureError::Link(format!("read from byte source failed: {}", e)))?;

            if n == 0 {
                return Ok(FrameEvent::Eof);
            }

            self.buf.extend_from_slice(&chunk[..n]);
        }
    }

    /// Split the next event out of the buffer, if one is complete
    fn take_event(&mut self) -> Option<FrameEvent> {
        match find_terminator(&self.buf) {
            Some(pos) => {
                let mut frame = self.buf.split_to(pos + FRAME_TERMINATOR.len());
                frame.truncate(pos);

                if self.resyncing {
                    // The bytes up to this terminator are the tail of an
                    // oversize frame, not a real payload.
                    self.resyncing = false;
                    let discarded = self.discarded + frame.len();
                    self.discarded = 0;
                    debug!(discarded, "resynchronized after oversize frame");
                    return Some(FrameEvent::Oversize { discarded });
                }

                // A frame over the cap can still appear whole when its
                // terminator lands inside a single read chunk.
                if frame.len() > self.max_frame_len {
                    debug!(len = frame.len(), "dropping oversize frame");
                    return Some(FrameEvent::Oversize {
                        discarded: frame.len(),
                    });
                }

                Some(FrameEvent::Frame(frame.freeze()))
            }
            None => {
                if self.buf.len() > self.max_frame_len {
                    // Keep one byte in case it is a lone `\r` whose `\n`
                    // has not arrived yet.
                    let drop_len = self.buf.len() - 1;
                    self.discarded += drop_len;
                    let _ = self.buf.split_to(drop_len);
                    self.resyncing = true;
                }
                None
            }
        }
    }
}

/// Position of the first terminator in `buf`, if any
fn find_terminator(buf: &[u8]) -> Option<usize> {
    buf.windows(FRAME_TERMINATOR.len())
        .position(|window| window == FRAME_TERMINATOR)
}
