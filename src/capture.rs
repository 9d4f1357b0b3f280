//! # Capture Loop
//!
//! Orchestrates FrameReader → PacketDecoder → LogWriter.
//!
//! The loop runs until the link closes or fails. Decode rejections and
//! oversize frames are expected traffic (device setup banners, line noise)
//! and never interrupt the loop or the current batch; persistence failures
//! are fatal because losing write capability defeats the capture's purpose.
//! On every exit path the log writer is closed so the file on disk stays a
//! whole number of frames.

use tracing::{debug, info};

use crate::error::Result;
use crate::framing::{FrameEvent, FrameReader};
use crate::packet::{decode, DecodeOutcome, Layout};
use crate::serial::byte_source::ByteSource;
use crate::storage::LogWriter;

/// Accepted frames between status log lines
const LOG_INTERVAL_FRAMES: usize = 100;

/// Counters for one capture session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureStats {
    /// Frames delimited by the reader (oversize events excluded)
    pub frames_seen: usize,
    /// Frames decoded and persisted
    pub accepted: usize,
    /// Frames rejected by the decoder
    pub rejected: usize,
    /// Oversize buffer discards
    pub oversize: usize,
}

/// Forever-running capture pipeline
#[derive(Debug)]
pub struct CaptureLoop {
    reader: FrameReader,
    layout: Layout,
    writer: LogWriter,
    stats: CaptureStats,
}

impl CaptureLoop {
    /// Build a loop over an already-configured reader and writer
    pub fn new(reader: FrameReader, layout: Layout, writer: LogWriter) -> Self {
        Self {
            reader,
            layout,
            writer,
            stats: CaptureStats::default(),
        }
    }

    /// Run until the source closes or a fatal error occurs
    ///
    /// State machine per iteration: await frame → decode → accept (persist)
    /// or reject (discard, continue). The writer is closed before returning
    /// on every path, including link and persistence failures.
    ///
    /// # Arguments
    ///
    /// * `source` - The caller-owned link to capture from
    ///
    /// # Returns
    ///
    /// * `Result<CaptureStats>` - Session counters on a clean link close
    ///
    /// # Errors
    ///
    /// * [`CaptureError::Link`] if the source fails mid-session
    /// * [`CaptureError::Persistence`] if the log file cannot be written
    pub fn run<S: ByteSource>(&mut self, source: &mut S) -> Result<CaptureStats> {
        let result = self.run_inner(source);

        // The close must happen on error paths too; a close failure matters
        // only if the run itself succeeded.
        let close_result = self.writer.close();
        result.and(close_result)?;

        info!(
            accepted = self.stats.accepted,
            rejected = self.stats.rejected,
            oversize = self.stats.oversize,
            "capture session finished"
        );
        Ok(self.stats)
    }

    fn run_inner<S: ByteSource>(&mut self, source: &mut S) -> Result<()> {
        loop {
            match self.reader.next_frame(source)? {
                FrameEvent::Frame(frame) => {
                    self.stats.frames_seen += 1;
                    self.handle_frame(&frame)?;
                }
                FrameEvent::Oversize { discarded } => {
                    self.stats.oversize += 1;
                    debug!(discarded, "discarded oversize frame");
                }
                FrameEvent::Eof => {
                    info!("byte source closed, ending capture");
                    return Ok(());
                }
            }
        }
    }

    /// Decode one frame and persist it if accepted
    fn handle_frame(&mut self, frame: &[u8]) -> Result<()> {
        match decode(frame, self.layout) {
            DecodeOutcome::Accepted(record) => {
                // Raw frame bytes, not a re-encoded record: the log is a
                // bit-exact capture.
                self.writer.append(frame)?;
                self.stats.accepted += 1;

                if self.stats.accepted % LOG_INTERVAL_FRAMES == 0 {
                    info!(
                        accepted = self.stats.accepted,
                        timestamp = record.timestamp,
                        "capture in progress"
                    );
                }
            }
            DecodeOutcome::Rejected(reason) => {
                self.stats.rejected += 1;
                debug!(?reason, len = frame.len(), "rejected frame");
            }
        }
        Ok(())
    }

    /// Counters so far (final values after [`run`](Self::run) returns)
    pub fn stats(&self) -> CaptureStats {
        self.stats
    }
}
