//! # IMU Capture Library
//!
//! Capture delimited binary IMU telemetry from a serial link into rotating
//! binary log files.
//!
//! The pipeline is a single synchronous flow: bytes from a [`serial::ByteSource`]
//! are grouped into `\r\n`-delimited frames by [`framing::FrameReader`],
//! strictly decoded by [`packet::decode`] under the configured
//! [`packet::Layout`], and accepted frames are persisted raw by
//! [`storage::LogWriter`] under a batch rotation policy. [`capture::CaptureLoop`]
//! ties the stages together with continue-on-rejection semantics.

pub mod capture;
pub mod config;
pub mod error;
pub mod framing;
pub mod packet;
pub mod serial;
pub mod storage;
