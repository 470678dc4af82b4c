//! Device layer for NZXT fan hubs.
//!
//! Holds the per-device status store, the control sequencer that owns the
//! output side, and the sensor façade tying them to a transport.

pub mod controller;
pub mod sequencer;
pub mod store;
pub mod transport;

#[cfg(test)]
pub(crate) mod fake;

pub use controller::{Attribute, FanController, SensorType};
pub use sequencer::ControlSequencer;
pub use store::{AvailabilityFlags, ChannelStatus, StatusCategory, StatusStore};
pub use transport::{DeviceIo, DeviceTransport, Transport, pump_reports};

#[cfg(feature = "hidapi")]
pub use transport::HidTransport;
