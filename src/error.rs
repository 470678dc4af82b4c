//! Custom error types for NZXT fan controllers.
//!
//! This module provides fine-grained error handling for report decoding,
//! transport failures and sensor access.

use thiserror::Error;

/// Main error type for fan controller operations.
#[derive(Error, Debug)]
pub enum DeviceError {
    /// Channel index outside the device's connector range.
    #[error("Invalid channel {channel}. Valid range: 0-{max}")]
    InvalidChannel { channel: usize, max: usize },

    /// Sensor/attribute combination the device cannot serve.
    #[error("Operation not supported: {0}")]
    Unsupported(String),

    /// A blocked wait was interrupted by teardown.
    #[error("Wait cancelled, device is shutting down")]
    Cancelled,

    /// Caller-supplied deadline passed before a sample arrived.
    #[error("Timeout waiting for device report")]
    Timeout,

    /// Output report could not be delivered.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Driver configuration could not be parsed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

/// Failure to deliver an output report to the device.
#[derive(Error, Debug)]
pub enum TransportError {
    /// HID communication error.
    #[cfg(feature = "hidapi")]
    #[error("HID communication error: {0}")]
    Hid(#[from] hidapi::HidError),

    /// Device accepted fewer bytes than the report length.
    #[error("Short write: {written} of {expected} bytes")]
    ShortWrite { written: usize, expected: usize },

    /// Device is gone.
    #[error("Device disconnected")]
    Disconnected,
}

/// Input report that could not be decoded.
///
/// Always non-fatal: the report is logged and dropped.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Empty input report")]
    Empty,

    #[error("Unknown input report: type {tag:#04x}, size {size}")]
    UnknownKind { tag: u8, size: usize },

    #[error("Invalid size {actual} for report {tag:#04x}, expected {expected}")]
    SizeMismatch {
        tag: u8,
        expected: usize,
        actual: usize,
    },

    #[error("Unknown sub-type {subtype:#04x} for report {tag:#04x}")]
    UnknownSubtype { tag: u8, subtype: u8 },
}

/// Result type alias for fan controller operations.
pub type Result<T> = std::result::Result<T, DeviceError>;
