//! # Packet Module
//!
//! Wire layout definitions and the frame decoder/encoder pair.

pub mod decoder;
pub mod encoder;
pub mod layout;

pub use decoder::decode;
pub use encoder::encode;
pub use layout::{
    DecodeOutcome, Layout, Record, RejectReason, FRAME_TERMINATOR, LEGACY_FRAME_LEN,
    WITH_TEMPERATURE_FRAME_LEN,
};
