//! # Error Types
//!
//! Custom error types for IMU Capture using `thiserror`.

use thiserror::Error;

/// Main error type for IMU Capture
#[derive(Debug, Error)]
pub enum CaptureError {
    /// Byte source / link errors (fatal: the capture cannot continue)
    #[error("link error: {0}")]
    Link(String),

    /// Serial port errors
    #[error("serial error: {0}")]
    Serial(String),

    /// No serial device could be opened at any of the candidate paths
    #[error("no serial device found at: {0}")]
    SerialPortNotFound(String),

    /// Log file cannot be created/written/closed (fatal: losing write
    /// capability invalidates the capture)
    #[error("persistence failure: {0}")]
    Persistence(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for IMU Capture
pub type Result<T> = std::result::Result<T, CaptureError>;
