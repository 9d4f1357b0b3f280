//! # Storage Module
//!
//! Persists accepted frames to an append-only binary log with rotation.
//!
//! The log holds the raw undecoded frame bytes, concatenated with no
//! separators, header, or footer, so the capture is bit-exact. The first
//! batch of frames goes into a freshly created file; every later batch
//! reopens the same path in append mode, bounding how long any one handle
//! stays open. Only accepted, persisted frames advance the batch counter,
//! which makes the file size after N frames exactly N × frame length.

use chrono::{DateTime, Local};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{CaptureError, Result};

/// Default accepted-frame count for the first open/close cycle
pub const DEFAULT_INITIAL_BATCH: usize = 10;

/// Default accepted-frame count per append-mode cycle
pub const DEFAULT_ROTATION_BATCH: usize = 60;

/// Rotating raw-frame log writer
///
/// Owns the file handle exclusively for the duration of a rotation window.
/// Each frame is written with a single `write_all` and the handle is
/// dropped at the end of every batch, on [`close`](Self::close), and on any
/// write error, so no partial frame can be left buffered in userspace.
#[derive(Debug)]
pub struct LogWriter {
    path: PathBuf,
    initial_batch: usize,
    rotation_batch: usize,
    handle: Option<File>,
    /// Frames written in the current open/close cycle
    in_cycle: usize,
    /// Completed open/close cycles; cycle 0 creates, later cycles append
    cycles: usize,
    total: usize,
}

impl LogWriter {
    /// Create a writer for `path`
    ///
    /// The file itself is created lazily on the first
    /// [`append`](Self::append), matching the reference behavior of only
    /// creating the log once telemetry actually arrives.
    pub fn create<P: AsRef<Path>>(
        path: P,
        initial_batch: usize,
        rotation_batch: usize,
    ) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            initial_batch,
            rotation_batch,
            handle: None,
            in_cycle: 0,
            cycles: 0,
            total: 0,
        }
    }

    /// Append one accepted frame's raw bytes
    ///
    /// Opens the file if no handle is held (create/truncate on the very
    /// first cycle, append afterwards), writes the frame atomically, and
    /// rotates when the current batch completes.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::Persistence`] if the file cannot be opened,
    /// written, or flushed; the handle is dropped before returning.
    pub fn append(&mut self, raw: &[u8]) -> Result<()> {
        if self.handle.is_none() {
            self.handle = Some(self.open_cycle()?);
        }

        // Present: opened just above if it was missing
        let file = self.handle.as_mut().ok_or_else(|| {
            CaptureError::Persistence("log file handle unavailable".to_string())
        })?;

        if let Err(e) = file.write_all(raw) {
            self.handle = None;
            return Err(CaptureError::Persistence(format!(
                "failed to write frame to {}: {}",
                self.path.display(),
                e
            )));
        }

        self.in_cycle += 1;
        self.total += 1;

        if self.in_cycle >= self.batch_size() {
            self.rotate()?;
        }

        Ok(())
    }

    /// Flush and close the current handle, ending the session
    ///
    /// Safe to call when no handle is open. Must be called on every exit
    /// path of the capture loop so an interrupted session still leaves a
    /// valid log.
    pub fn close(&mut self) -> Result<()> {
        if let Some(mut file) = self.handle.take() {
            file.flush().map_err(|e| {
                CaptureError::Persistence(format!(
                    "failed to flush {}: {}",
                    self.path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Total accepted frames persisted across all cycles
    pub fn frames_written(&self) -> usize {
        self.total
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Batch size of the cycle currently being filled
    fn batch_size(&self) -> usize {
        if self.cycles == 0 {
            self.initial_batch
        } else {
            self.rotation_batch
        }
    }

    /// Open the file for the current cycle
    fn open_cycle(&self) -> Result<File> {
        let mut options = OpenOptions::new();
        if self.cycles == 0 {
            options.write(true).create(true).truncate(true);
        } else {
            options.append(true);
        }

        options.open(&self.path).map_err(|e| {
            CaptureError::Persistence(format!(
                "failed to open {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    /// End the current batch: flush, drop the handle, arm the next cycle
    fn rotate(&mut self) -> Result<()> {
        debug!(
            cycle = self.cycles,
            frames = self.in_cycle,
            total = self.total,
            "rotating log file"
        );

        self.close()?;
        self.cycles += 1;
        self.in_cycle = 0;
        Ok(())
    }
}

/// Derive a session log filename from the capture start time
///
/// Colon-free so the name is valid on every filesystem the logs might be
/// copied to.
pub fn session_filename(start: DateTime<Local>) -> String {
    format!("{}_imu.bin", start.format("%Y-%m-%dT%H-%M-%S%z"))
}
