//! Device initialization handshake and update interval control.

use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, info};

use super::store::StatusStore;
use super::transport::Transport;
use crate::error::{DeviceError, Result};
use crate::protocol::{
    Command, GRID_INIT_SEQUENCE, Protocol, control_to_update_interval,
    update_interval_to_control,
};

/// Drives the detect-fans handshake and owns the update interval.
///
/// Every output report goes through the sequencer's lock, so a handshake,
/// an interval change and a duty write never interleave on the wire.
#[derive(Debug)]
pub struct ControlSequencer {
    protocol: Protocol,
    /// Realized update interval in milliseconds.
    interval_ms: Mutex<u32>,
}

impl ControlSequencer {
    pub fn new(protocol: Protocol, interval_ms: u32) -> Self {
        let interval_ms = match protocol {
            Protocol::Smart2 => control_to_update_interval(update_interval_to_control(interval_ms)),
            Protocol::Grid => interval_ms,
        };
        Self {
            protocol,
            interval_ms: Mutex::new(interval_ms),
        }
    }

    /// Last realized update interval in milliseconds.
    pub fn update_interval(&self) -> u32 {
        *self.lock()
    }

    /// Clear availability, detect fans, then configure the update interval.
    ///
    /// On a send failure the flags stay cleared, so readers keep waiting
    /// instead of seeing stale values.
    pub fn initialize<T: Transport + ?Sized>(
        &self,
        transport: &T,
        store: &StatusStore,
        interval_ms: u32,
    ) -> Result<()> {
        let mut interval = self.lock();
        store.reset_availability();
        info!("Detecting fans ({:?} protocol)", self.protocol);
        self.handshake(transport, &mut interval, interval_ms)
    }

    /// Repeat the handshake with the last configured interval, e.g. after resume.
    pub fn reinitialize<T: Transport + ?Sized>(&self, transport: &T, store: &StatusStore) -> Result<()> {
        let mut interval = self.lock();
        store.reset_availability();
        let interval_ms = *interval;
        info!("Re-detecting fans after link reset");
        self.handshake(transport, &mut interval, interval_ms)
    }

    /// Change the report period, returning the interval the device realizes.
    pub fn set_update_interval<T: Transport + ?Sized>(
        &self,
        transport: &T,
        interval_ms: u32,
    ) -> Result<u32> {
        if !self.protocol.has_update_interval() {
            return Err(DeviceError::Unsupported(format!(
                "update interval on {:?} devices",
                self.protocol
            )));
        }

        let mut interval = self.lock();
        *interval = send_update_interval(transport, interval_ms)?;
        Ok(*interval)
    }

    /// Send a command, then run `after_send` before releasing the wire.
    pub fn send_and_then<T: Transport + ?Sized>(
        &self,
        transport: &T,
        command: Command,
        after_send: impl FnOnce(),
    ) -> Result<()> {
        let _wire = self.lock();
        send(transport, command)?;
        after_send();
        Ok(())
    }

    fn handshake<T: Transport + ?Sized>(
        &self,
        transport: &T,
        interval: &mut u32,
        interval_ms: u32,
    ) -> Result<()> {
        match self.protocol {
            Protocol::Grid => {
                for cmd in GRID_INIT_SEQUENCE {
                    send(transport, Command::GridInit(cmd))?;
                }
                *interval = interval_ms;
            }
            Protocol::Smart2 => {
                send(transport, Command::DetectFans)?;
                *interval = send_update_interval(transport, interval_ms)?;
            }
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, u32> {
        self.interval_ms.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn send<T: Transport + ?Sized>(transport: &T, command: Command) -> Result<()> {
    debug!("Sending {command:?}");
    transport.send_report(&command.encode())?;
    Ok(())
}

fn send_update_interval<T: Transport + ?Sized>(transport: &T, interval_ms: u32) -> Result<u32> {
    let control = update_interval_to_control(interval_ms);
    send(transport, Command::SetUpdateInterval { control })?;

    let realized = control_to_update_interval(control);
    debug!("Update interval {interval_ms} ms requested, {realized} ms realized");
    Ok(realized)
}
