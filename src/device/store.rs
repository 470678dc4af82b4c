//! Last-known channel status and the availability gate readers block on.
//!
//! The report path updates the store under a short exclusive section and
//! wakes waiters when a status category becomes available for the first
//! time in a detection cycle. Readers block until the category they need
//! is available, or until the store is cancelled.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use log::{debug, info, warn};

use crate::error::{DeviceError, Result};
use crate::protocol::{FanType, FirmwareVersion, InputReport, StatusPayload};

// =============================================================================
// Status Structures
// =============================================================================

/// Group of values populated by the same kind of report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCategory {
    /// Fan types detected.
    FanConfig,
    /// Speed and duty sampled.
    Speed,
    /// Voltage and current sampled.
    Voltage,
}

/// Last-known values of one fan connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelStatus {
    pub fan_type: FanType,
    pub speed_rpm: u32,
    /// Device-native duty cycle, 0-100.
    pub duty_percent: u8,
    /// May be non-zero on an empty connector.
    pub voltage_millivolt: u32,
    /// May be non-zero on an empty connector.
    pub current_milliamp: u32,
}

impl std::fmt::Display for ChannelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:<4} {:>5} RPM {:>3}% {:>2}.{:03} V {:>2}.{:03} A",
            self.fan_type.to_string(),
            self.speed_rpm,
            self.duty_percent,
            self.voltage_millivolt / 1000,
            self.voltage_millivolt % 1000,
            self.current_milliamp / 1000,
            self.current_milliamp % 1000,
        )
    }
}

/// Per-category "sampled since detection began" flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AvailabilityFlags {
    pub fan_config: bool,
    pub speed: bool,
    pub voltage: bool,
}

impl AvailabilityFlags {
    pub fn get(&self, category: StatusCategory) -> bool {
        match category {
            StatusCategory::FanConfig => self.fan_config,
            StatusCategory::Speed => self.speed,
            StatusCategory::Voltage => self.voltage,
        }
    }

    /// Whether every category is available.
    pub fn all(&self) -> bool {
        self.fan_config && self.speed && self.voltage
    }

    /// Mark a category available, returning `true` on a false-to-true transition.
    fn set(&mut self, category: StatusCategory) -> bool {
        let flag = match category {
            StatusCategory::FanConfig => &mut self.fan_config,
            StatusCategory::Speed => &mut self.speed,
            StatusCategory::Voltage => &mut self.voltage,
        };
        !std::mem::replace(flag, true)
    }
}

// =============================================================================
// StatusStore
// =============================================================================

#[derive(Debug)]
struct StoreState {
    channels: Vec<ChannelStatus>,
    flags: AvailabilityFlags,
    /// Grid: bit per channel reported since detection began.
    reported: u32,
    /// Grid: firmware version carried by every status report.
    firmware: Option<FirmwareVersion>,
    fan_type_change_logged: bool,
    cancelled: bool,
}

/// Shared status of one device instance.
#[derive(Debug)]
pub struct StatusStore {
    state: Mutex<StoreState>,
    available: Condvar,
}

impl StatusStore {
    pub fn new(channel_count: usize) -> Self {
        Self {
            state: Mutex::new(StoreState {
                channels: vec![ChannelStatus::default(); channel_count],
                flags: AvailabilityFlags::default(),
                reported: 0,
                firmware: None,
                fan_type_change_logged: false,
                cancelled: false,
            }),
            available: Condvar::new(),
        }
    }

    /// Current availability flags.
    pub fn flags(&self) -> AvailabilityFlags {
        self.lock().flags
    }

    pub fn is_available(&self, category: StatusCategory) -> bool {
        self.lock().flags.get(category)
    }

    /// Start a new detection cycle: every category becomes unavailable.
    ///
    /// Cached values are kept but unreachable until fresh reports arrive.
    pub fn reset_availability(&self) {
        let mut state = self.lock();
        state.flags = AvailabilityFlags::default();
        state.reported = 0;
    }

    /// Wake every blocked reader with [`DeviceError::Cancelled`].
    ///
    /// Permanent: later waits fail immediately.
    pub fn cancel(&self) {
        self.lock().cancelled = true;
        self.available.notify_all();
    }

    /// Firmware version, once a report carrying it has arrived.
    pub fn firmware(&self) -> Option<FirmwareVersion> {
        self.lock().firmware
    }

    /// Store a duty value the device has not confirmed yet.
    pub fn set_duty(&self, channel: usize, duty_percent: u8) {
        if let Some(status) = self.lock().channels.get_mut(channel) {
            status.duty_percent = duty_percent;
        }
    }

    /// Non-blocking copy of a channel, `None` until every category is available.
    pub fn snapshot(&self, channel: usize) -> Option<ChannelStatus> {
        let state = self.lock();
        if !state.flags.all() {
            return None;
        }
        state.channels.get(channel).copied()
    }

    /// Block until `category` is available, then read from the channels.
    pub fn wait_for<R>(
        &self,
        category: StatusCategory,
        read: impl FnOnce(&[ChannelStatus]) -> R,
    ) -> Result<R> {
        let guard = self.lock();
        let state = self
            .available
            .wait_while(guard, |s| !s.cancelled && !s.flags.get(category))
            .unwrap_or_else(PoisonError::into_inner);

        if state.cancelled {
            return Err(DeviceError::Cancelled);
        }
        Ok(read(&state.channels))
    }

    /// Like [`wait_for`](Self::wait_for), giving up at `deadline`.
    pub fn wait_until<R>(
        &self,
        category: StatusCategory,
        deadline: Instant,
        read: impl FnOnce(&[ChannelStatus]) -> R,
    ) -> Result<R> {
        let guard = self.lock();
        let timeout = deadline.saturating_duration_since(Instant::now());
        let (state, _) = self
            .available
            .wait_timeout_while(guard, timeout, |s| !s.cancelled && !s.flags.get(category))
            .unwrap_or_else(PoisonError::into_inner);

        if state.cancelled {
            return Err(DeviceError::Cancelled);
        }
        if !state.flags.get(category) {
            return Err(DeviceError::Timeout);
        }
        Ok(read(&state.channels))
    }

    /// Apply a decoded input report.
    pub fn apply(&self, report: &InputReport) {
        let mut state = self.lock();
        let published = match report {
            InputReport::GridStatus(status) => {
                let index = status.channel as usize;
                let count = state.channels.len();
                if index >= count {
                    warn!("Invalid channel index {index}");
                    return;
                }
                if state.firmware != Some(status.firmware) {
                    info!("Firmware version {}", status.firmware);
                    state.firmware = Some(status.firmware);
                }
                if status.fan_type == FanType::Invalid {
                    warn!("Invalid fan type {:#x}", status.fan_type_raw);
                }

                let channel = &mut state.channels[index];
                channel.fan_type = status.fan_type;
                channel.speed_rpm = status.rpm as u32;
                channel.voltage_millivolt = status.millivolt;
                channel.current_milliamp = status.milliamp;

                // One report covers one channel, so categories open only once
                // every channel has reported.
                state.reported |= 1 << index;
                if state.reported == (1u32 << count) - 1 {
                    let config = state.flags.set(StatusCategory::FanConfig);
                    let speed = state.flags.set(StatusCategory::Speed);
                    let voltage = state.flags.set(StatusCategory::Voltage);
                    config || speed || voltage
                } else {
                    false
                }
            }
            InputReport::FanConfig { fan_types } => {
                for (channel, &raw) in state.channels.iter_mut().zip(fan_types) {
                    channel.fan_type = FanType::from_raw(raw);
                }
                state.flags.set(StatusCategory::FanConfig)
            }
            InputReport::FanStatus { fan_types, payload } => {
                // Detection resets duty values, so only trust status reports
                // that follow the fan config report.
                if !state.flags.fan_config {
                    debug!("Dropping fan status received before fan config");
                    return;
                }

                let StoreState {
                    channels,
                    fan_type_change_logged,
                    ..
                } = &mut *state;
                for (index, (channel, &raw)) in channels.iter_mut().zip(fan_types).enumerate() {
                    let fan_type = FanType::from_raw(raw);
                    if channel.fan_type != fan_type {
                        if !*fan_type_change_logged {
                            warn!(
                                "Fan {index} type changed unexpectedly from {} to {}",
                                channel.fan_type, fan_type
                            );
                            *fan_type_change_logged = true;
                        }
                        channel.fan_type = fan_type;
                    }
                }

                match payload {
                    StatusPayload::Speed { rpm, duty_percent } => {
                        for ((channel, &speed), &duty) in
                            state.channels.iter_mut().zip(rpm).zip(duty_percent)
                        {
                            channel.speed_rpm = speed as u32;
                            channel.duty_percent = duty;
                        }
                        state.flags.set(StatusCategory::Speed)
                    }
                    StatusPayload::Voltage {
                        millivolt,
                        milliamp,
                    } => {
                        for ((channel, &mv), &ma) in
                            state.channels.iter_mut().zip(millivolt).zip(milliamp)
                        {
                            channel.voltage_millivolt = mv as u32;
                            channel.current_milliamp = ma as u32;
                        }
                        state.flags.set(StatusCategory::Voltage)
                    }
                }
            }
        };

        if published {
            drop(state);
            self.available.notify_all();
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
