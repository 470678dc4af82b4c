//! NZXT Smart Devices Library
//!
//! A Rust driver for NZXT fan hubs: Grid V3, Smart Device (V1 and V2) and
//! RGB & Fan Controller.
//!
//! # Features
//!
//! - Decode fan status reports (type, RPM, duty, voltage, current)
//! - Set per-channel fan duty
//! - Configure the status update interval on Smart Device V2 hubs
//! - Report pump over raw HID devices, with an optional hidapi adapter (`hidapi` feature)
//!
//! # Example
//!
//! ```no_run
//! use nzxt_smart_devices::config::DriverConfig;
//! use nzxt_smart_devices::device::Transport;
//! use nzxt_smart_devices::error::TransportError;
//! use nzxt_smart_devices::{Attribute, DeviceModel, FanController, SensorType};
//!
//! struct Hub; // wraps an opened HID handle
//!
//! impl Transport for Hub {
//!     fn send_report(&self, _report: &[u8]) -> Result<(), TransportError> {
//!         // hid write
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let model = DeviceModel::from_product_id(0x2006).ok_or("unsupported device")?;
//!     let fans = FanController::probe(model, Hub, &DriverConfig::default())?;
//!
//!     // The HID reader thread calls fans.handle_raw_event(&report) per input report
//!     for channel in 0..fans.channel_count() {
//!         let rpm = fans.read(SensorType::Fan, Attribute::Input, channel)?;
//!         let label = fans.label(SensorType::Fan, channel).unwrap_or_default();
//!         println!("{label}: {rpm} RPM");
//!     }
//!
//!     // Half speed on the first connector
//!     fans.write(SensorType::Pwm, Attribute::Input, 0, 128)?;
//!     Ok(())
//! }
//! ```
//!
//! `DeviceTransport` and `pump_reports` provide the transport and the reader
//! loop over any `DeviceIo`; the `hidapi` feature adds `HidTransport` for
//! hidapi handles.

pub mod config;
pub mod device;
pub mod error;
pub mod protocol;
pub mod utils;

// Re-exports for convenience
pub use device::{Attribute, FanController, SensorType};
pub use error::{DeviceError, Result};
pub use protocol::{DeviceModel, Protocol};
