//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::packet::Layout;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub serial: SerialConfig,
    pub capture: CaptureConfig,
    pub storage: StorageConfig,
}

/// Serial port configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SerialConfig {
    #[serde(default = "default_serial_port")]
    pub port: String,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Frame/decode configuration
///
/// The frame terminator is fixed at `0x0D 0x0A` and deliberately not
/// configurable; see [`crate::packet::FRAME_TERMINATOR`].
#[derive(Debug, Deserialize, Clone)]
pub struct CaptureConfig {
    /// Wire layout the device is flashed with. Never auto-detected: both
    /// layouts can accidentally parse malformed input of the right length.
    #[serde(default)]
    pub layout: Layout,

    /// Maximum bytes accumulated while waiting for a terminator before the
    /// reader discards and resynchronizes.
    #[serde(default = "default_max_frame_len")]
    pub max_frame_len: usize,
}

/// Log file configuration
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    /// Accepted frames written to the freshly created file before the first
    /// rotation.
    #[serde(default = "default_initial_batch_size")]
    pub initial_batch_size: usize,

    /// Accepted frames written per append-mode open/close cycle thereafter.
    #[serde(default = "default_rotation_batch_size")]
    pub rotation_batch_size: usize,
}

// Default value functions
fn default_serial_port() -> String { "/dev/ttyACM0".to_string() }
fn default_baud_rate() -> u32 { 115_200 }
fn default_timeout_ms() -> u64 { 1000 }

fn default_max_frame_len() -> usize { crate::framing::DEFAULT_MAX_FRAME_LEN }

fn default_log_dir() -> String { "./logs".to_string() }
fn default_initial_batch_size() -> usize { crate::storage::DEFAULT_INITIAL_BATCH }
fn default_rotation_batch_size() -> usize { crate::storage::DEFAULT_ROTATION_BATCH }

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: default_serial_port(),
            baud_rate: default_baud_rate(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            max_frame_len: default_max_frame_len(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            initial_batch_size: default_initial_batch_size(),
            rotation_batch_size: default_rotation_batch_size(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            serial: SerialConfig::default(),
            capture: CaptureConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        if self.serial.port.is_empty() {
            return Err(crate::error::CaptureError::Config(
                toml::de::Error::custom("serial port cannot be empty")
            ));
        }

        if self.serial.timeout_ms == 0 || self.serial.timeout_ms > 60000 {
            return Err(crate::error::CaptureError::Config(
                toml::de::Error::custom("timeout_ms must be between 1 and 60000")
            ));
        }

        if self.storage.log_dir.is_empty() {
            return Err(crate::error::CaptureError::Config(
                toml::de::Error::custom("log_dir cannot be empty")
            ));
        }

        if self.storage.initial_batch_size == 0 {
            return Err(crate::error::CaptureError::Config(
                toml::de::Error::custom("initial_batch_size must be greater than 0")
            ));
        }

        if self.storage.rotation_batch_size == 0 {
            return Err(crate::error::CaptureError::Config(
                toml::de::Error::custom("rotation_batch_size must be greater than 0")
            ));
        }

        // A cap below one full frame would reject every packet the device
        // sends.
        if self.capture.max_frame_len < self.capture.layout.expected_len() {
            return Err(crate::error::CaptureError::Config(
                toml::de::Error::custom(format!(
                    "max_frame_len must be at least {} for the {:?} layout",
                    self.capture.layout.expected_len(),
                    self.capture.layout,
                ))
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());

        assert_eq!(config.serial.port, "/dev/ttyACM0");
        assert_eq!(config.serial.baud_rate, 115_200);
        assert_eq!(config.capture.layout, Layout::Legacy);
        assert_eq!(config.capture.max_frame_len, 256);
        assert_eq!(config.storage.initial_batch_size, 10);
        assert_eq!(config.storage.rotation_batch_size, 60);
    }

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [serial]
            port = "/dev/ttyUSB0"
            baud_rate = 230400
            timeout_ms = 500

            [capture]
            layout = "with-temperature-9-field"
            max_frame_len = 512

            [storage]
            log_dir = "/var/log/imu"
            initial_batch_size = 5
            rotation_batch_size = 100
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        config.validate().unwrap();

        assert_eq!(config.serial.port, "/dev/ttyUSB0");
        assert_eq!(config.serial.baud_rate, 230_400);
        assert_eq!(config.capture.layout, Layout::WithTemperature);
        assert_eq!(config.capture.max_frame_len, 512);
        assert_eq!(config.storage.log_dir, "/var/log/imu");
        assert_eq!(config.storage.initial_batch_size, 5);
        assert_eq!(config.storage.rotation_batch_size, 100);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml_str = r#"
            [serial]
            port = "/dev/ttyS3"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.serial.port, "/dev/ttyS3");
        assert_eq!(config.serial.baud_rate, 115_200);
        assert_eq!(config.capture.layout, Layout::Legacy);
        assert_eq!(config.storage.rotation_batch_size, 60);
    }

    #[test]
    fn test_layout_names() {
        let legacy: Config = toml::from_str("[capture]\nlayout = \"legacy-8-field\"").unwrap();
        assert_eq!(legacy.capture.layout, Layout::Legacy);

        let temp: Config =
            toml::from_str("[capture]\nlayout = \"with-temperature-9-field\"").unwrap();
        assert_eq!(temp.capture.layout, Layout::WithTemperature);

        let bad = toml::from_str::<Config>("[capture]\nlayout = \"auto\"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_zero_batch_sizes_rejected() {
        let mut config = Config::default();
        config.storage.initial_batch_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.storage.rotation_batch_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_max_frame_len_below_frame_size_rejected() {
        let mut config = Config::default();
        config.capture.max_frame_len = 56; // one byte short of a legacy frame
        assert!(config.validate().is_err());

        config.capture.max_frame_len = 57;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_port_rejected() {
        let mut config = Config::default();
        config.serial.port = String::new();
        assert!(config.validate().is_err());
    }
}
