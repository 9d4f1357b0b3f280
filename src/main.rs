//! # IMU Capture
//!
//! Capture daemon: reads delimited binary telemetry frames from a micro:bit
//! (or compatible) serial device and persists validated frames to a rotating
//! binary log named after the session start time.
//!
//! The process runs until the link closes or it is terminated externally;
//! decode rejections (device setup banners, line noise) are silently
//! discarded, while persistence failures abort with a clear error.

use anyhow::Result;
use chrono::Local;
use std::path::Path;
use std::time::Duration;
use tracing::info;

mod capture;
mod config;
mod error;
mod framing;
mod packet;
mod serial;
mod storage;

use capture::CaptureLoop;
use config::Config;
use framing::FrameReader;
use serial::TelemetryPort;
use storage::{session_filename, LogWriter};

/// Configuration file consulted when present
const CONFIG_PATH: &str = "config/default.toml";

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("IMU Capture v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = if Path::new(CONFIG_PATH).exists() {
        Config::load(CONFIG_PATH)?
    } else {
        info!("no {} found, using defaults", CONFIG_PATH);
        Config::default()
    };

    // Open the link; prefer the configured port, fall back to auto-detect
    let timeout = Duration::from_millis(config.serial.timeout_ms);
    let mut port = TelemetryPort::open_with_paths(
        &[config.serial.port.as_str()],
        config.serial.baud_rate,
        timeout,
    )
    .or_else(|_| TelemetryPort::open(config.serial.baud_rate, timeout))?;
    info!("capturing from {}", port.device_path());

    // Session log file named by start time
    std::fs::create_dir_all(&config.storage.log_dir)?;
    let log_path = Path::new(&config.storage.log_dir).join(session_filename(Local::now()));
    info!(
        layout = ?config.capture.layout,
        path = %log_path.display(),
        "writing capture log"
    );

    let reader = FrameReader::new(config.capture.max_frame_len);
    let writer = LogWriter::create(
        &log_path,
        config.storage.initial_batch_size,
        config.storage.rotation_batch_size,
    );

    let mut capture = CaptureLoop::new(reader, config.capture.layout, writer);
    let stats = capture.run(&mut port)?;

    info!(
        accepted = stats.accepted,
        rejected = stats.rejected,
        "capture complete"
    );
    Ok(())
}
