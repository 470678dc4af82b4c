//! In-memory transport and device for tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use super::transport::{DeviceIo, Transport};
use crate::error::TransportError;

/// Records every output report; can be told to fail from the n-th send on.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<Vec<u8>>>,
    fail_from: Mutex<Option<usize>>,
}

impl RecordingTransport {
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.sent.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }

    /// Fail the send with this index (counting already recorded reports) and later ones.
    pub fn fail_from(&self, index: usize) {
        *self.fail_from.lock().unwrap() = Some(index);
    }
}

impl Transport for RecordingTransport {
    fn send_report(&self, report: &[u8]) -> Result<(), TransportError> {
        let mut sent = self.sent.lock().unwrap();
        if let Some(index) = *self.fail_from.lock().unwrap() {
            if sent.len() >= index {
                return Err(TransportError::Disconnected);
            }
        }
        sent.push(report.to_vec());
        Ok(())
    }
}

/// Raw report device with a queue of pending input reports.
///
/// Reads that are allowed to wait sleep for `block_for`, like a device
/// with nothing to report.
#[derive(Debug, Default)]
pub struct FakeDevice {
    input: Mutex<VecDeque<Vec<u8>>>,
    written: Mutex<Vec<Vec<u8>>>,
    block_for: Duration,
    fail_reads: AtomicBool,
    truncate_writes: Mutex<Option<usize>>,
}

impl FakeDevice {
    pub fn blocking(block_for: Duration) -> Self {
        Self {
            block_for,
            ..Self::default()
        }
    }

    pub fn push_input(&self, report: Vec<u8>) {
        self.input.lock().unwrap().push_back(report);
    }

    pub fn written(&self) -> Vec<Vec<u8>> {
        self.written.lock().unwrap().clone()
    }

    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::Relaxed);
    }

    /// Report at most `len` bytes written per report.
    pub fn truncate_writes(&self, len: usize) {
        *self.truncate_writes.lock().unwrap() = Some(len);
    }
}

impl DeviceIo for FakeDevice {
    fn write(&self, report: &[u8]) -> Result<usize, TransportError> {
        self.written.lock().unwrap().push(report.to_vec());
        let limit = self.truncate_writes.lock().unwrap().unwrap_or(report.len());
        Ok(report.len().min(limit))
    }

    fn read_timeout(&self, buf: &mut [u8], timeout_ms: i32) -> Result<usize, TransportError> {
        if self.fail_reads.load(Ordering::Relaxed) {
            return Err(TransportError::Disconnected);
        }
        let pending = self.input.lock().unwrap().pop_front();
        match pending {
            Some(report) => {
                let len = report.len().min(buf.len());
                buf[..len].copy_from_slice(&report[..len]);
                Ok(len)
            }
            None => {
                if timeout_ms != 0 {
                    thread::sleep(self.block_for);
                }
                Ok(0)
            }
        }
    }
}
