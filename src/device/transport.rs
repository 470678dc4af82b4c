//! Output report transport.
//!
//! The protocol core only needs to push fixed-size output reports; input
//! reports are delivered to [`FanController::handle_raw_event`] by whoever
//! owns the device. [`DeviceTransport`] and [`pump_reports`] do both over
//! a raw report device such as a hidapi handle.
//!
//! [`FanController::handle_raw_event`]: crate::device::FanController::handle_raw_event

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use log::debug;

use crate::device::FanController;
use crate::error::TransportError;

/// Sleep between polls when no input report is pending.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Largest input report of any supported device.
const MAX_INPUT_REPORT_LENGTH: usize = 64;

/// Fire-and-forget delivery of an output report.
pub trait Transport: Send + Sync {
    fn send_report(&self, report: &[u8]) -> Result<(), TransportError>;
}

/// Raw report I/O on an opened device.
pub trait DeviceIo: Send {
    /// Write one output report, returning the number of bytes written.
    fn write(&self, report: &[u8]) -> Result<usize, TransportError>;

    /// Read one input report, waiting at most `timeout_ms` (0 = don't wait).
    ///
    /// # Returns
    /// The report length, or 0 when nothing arrived in time.
    fn read_timeout(&self, buf: &mut [u8], timeout_ms: i32) -> Result<usize, TransportError>;
}

/// [`Transport`] over a [`DeviceIo`] shared between writers and the report pump.
///
/// The device lock is never held across a blocking read, so writes only
/// wait for a non-blocking poll to finish.
#[derive(Debug)]
pub struct DeviceTransport<D> {
    device: Mutex<D>,
}

impl<D: DeviceIo> DeviceTransport<D> {
    pub fn new(device: D) -> Self {
        Self {
            device: Mutex::new(device),
        }
    }

    /// Take one pending input report without blocking.
    ///
    /// # Returns
    /// The report length, or 0 when no report is pending.
    pub fn poll_report(&self, buf: &mut [u8]) -> Result<usize, TransportError> {
        self.lock().read_timeout(buf, 0)
    }

    fn lock(&self) -> MutexGuard<'_, D> {
        self.device.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<D: DeviceIo> Transport for DeviceTransport<D> {
    fn send_report(&self, report: &[u8]) -> Result<(), TransportError> {
        let written = self.lock().write(report)?;
        if written < report.len() {
            return Err(TransportError::ShortWrite {
                written,
                expected: report.len(),
            });
        }
        Ok(())
    }
}

/// Feed input reports into `controller` until `stop` is set.
///
/// Pending reports are drained back to back; when none is pending the pump
/// sleeps with the device unlocked.
///
/// # Errors
/// A read failure shuts the controller down and is returned.
pub fn pump_reports<D: DeviceIo>(
    controller: &FanController<DeviceTransport<D>>,
    stop: &AtomicBool,
) -> Result<(), TransportError> {
    let mut buf = [0u8; MAX_INPUT_REPORT_LENGTH];
    while !stop.load(Ordering::Relaxed) {
        let read = match controller.transport().poll_report(&mut buf) {
            Ok(read) => read,
            Err(e) => {
                // Device is most likely gone, release blocked readers
                controller.shutdown();
                return Err(e);
            }
        };
        if read > 0 {
            controller.handle_raw_event(&buf[..read]);
        } else {
            thread::sleep(POLL_INTERVAL);
        }
    }
    debug!("Report pump stopped");
    Ok(())
}

#[cfg(feature = "hidapi")]
pub use hid::HidTransport;

#[cfg(feature = "hidapi")]
mod hid {
    use hidapi::HidDevice;

    use super::{DeviceIo, DeviceTransport};
    use crate::error::TransportError;

    /// [`Transport`](super::Transport) over an opened hidapi device.
    pub type HidTransport = DeviceTransport<HidDevice>;

    impl DeviceIo for HidDevice {
        fn write(&self, report: &[u8]) -> Result<usize, TransportError> {
            Ok(HidDevice::write(self, report)?)
        }

        fn read_timeout(&self, buf: &mut [u8], timeout_ms: i32) -> Result<usize, TransportError> {
            Ok(HidDevice::read_timeout(self, buf, timeout_ms)?)
        }
    }
}
