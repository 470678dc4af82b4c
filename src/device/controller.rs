//! NZXT fan controller device instance.
//!
//! Sensor-style read/write interface over the status store and the
//! control sequencer, for Grid V3, Smart Device V1/V2 and RGB & Fan
//! Controller hubs.

use std::time::Instant;

use log::warn;

use super::sequencer::ControlSequencer;
use super::store::{ChannelStatus, StatusCategory, StatusStore};
use super::transport::Transport;
use crate::config::DriverConfig;
use crate::error::{DeviceError, Result};
use crate::protocol::{Command, DeviceModel, FanType, FirmwareVersion, decode};
use crate::utils::{scale, scale_nearest};

// =============================================================================
// Sensor Vocabulary
// =============================================================================

/// Sensor class, as exposed to monitoring clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorType {
    /// Device-wide settings.
    Chip,
    /// Rotation speed.
    Fan,
    /// Duty cycle, 0-255.
    Pwm,
    Voltage,
    Current,
}

/// Attribute of a sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    /// 1 if a fan is connected.
    Enable,
    /// Current value.
    Input,
    /// PWM only: 1 for a 4-pin PWM fan, 0 for DC.
    Mode,
    /// Chip only: status report period in milliseconds.
    UpdateInterval,
}

type Projection = fn(&ChannelStatus) -> i64;

// =============================================================================
// FanController
// =============================================================================

/// Device instance handle.
///
/// Owns the status store and the sequencer for one device. Input reports
/// are fed in with [`handle_raw_event`](Self::handle_raw_event) from the
/// transport's thread; reads block until the first matching report arrives.
///
/// # Example
///
/// ```no_run
/// use nzxt_smart_devices::config::DriverConfig;
/// use nzxt_smart_devices::device::{Attribute, FanController, SensorType, Transport};
/// use nzxt_smart_devices::error::TransportError;
/// use nzxt_smart_devices::protocol::DeviceModel;
///
/// struct Stdout;
///
/// impl Transport for Stdout {
///     fn send_report(&self, report: &[u8]) -> Result<(), TransportError> {
///         println!("{:02x?}", report);
///         Ok(())
///     }
/// }
///
/// let fans = FanController::probe(DeviceModel::RgbFanController, Stdout, &DriverConfig::default())?;
///
/// // Input reports arrive on another thread via fans.handle_raw_event(..)
/// let rpm = fans.read(SensorType::Fan, Attribute::Input, 0)?;
/// fans.write(SensorType::Pwm, Attribute::Input, 0, 128)?;
/// # Ok::<(), nzxt_smart_devices::error::DeviceError>(())
/// ```
#[derive(Debug)]
pub struct FanController<T: Transport> {
    model: DeviceModel,
    transport: T,
    store: StatusStore,
    sequencer: ControlSequencer,
}

impl<T: Transport> FanController<T> {
    /// Create a handle without talking to the device.
    pub fn new(model: DeviceModel, transport: T, config: &DriverConfig) -> Self {
        Self {
            model,
            transport,
            store: StatusStore::new(model.channel_count()),
            sequencer: ControlSequencer::new(model.protocol(), config.update_interval_ms),
        }
    }

    /// Create a handle and run the initialization handshake.
    ///
    /// # Errors
    /// Returns `Transport` if a handshake report cannot be sent.
    pub fn probe(model: DeviceModel, transport: T, config: &DriverConfig) -> Result<Self> {
        let controller = Self::new(model, transport, config);
        controller.initialize(config.update_interval_ms)?;
        Ok(controller)
    }

    pub fn model(&self) -> DeviceModel {
        self.model
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn channel_count(&self) -> usize {
        self.model.channel_count()
    }

    /// Detect fans and set the update interval. Readers block until the
    /// device reports again.
    ///
    /// # Arguments
    /// * `interval_ms` - Requested report period, rounded to what the device supports
    ///
    /// # Errors
    /// Returns `Transport` if a handshake report cannot be sent. Readers keep
    /// blocking in that case.
    pub fn initialize(&self, interval_ms: u32) -> Result<()> {
        self.sequencer
            .initialize(&self.transport, &self.store, interval_ms)
    }

    /// Repeat the handshake after a link reset or resume.
    pub fn reinitialize(&self) -> Result<()> {
        self.sequencer.reinitialize(&self.transport, &self.store)
    }

    /// Release every blocked reader with [`DeviceError::Cancelled`].
    pub fn shutdown(&self) {
        self.store.cancel();
    }

    /// Process one raw input report from the device.
    ///
    /// Malformed or unknown reports are logged and dropped.
    pub fn handle_raw_event(&self, data: &[u8]) {
        match decode(self.model.protocol(), data) {
            Ok(report) => self.store.apply(&report),
            Err(e) => warn!("{e}"),
        }
    }

    /// Read a sensor attribute, blocking until the device has reported it.
    ///
    /// Grid devices report one channel at a time; their reads block until
    /// every channel has reported once.
    ///
    /// # Returns
    /// RPM, PWM on a 0-255 scale, millivolts, milliamps, 0/1 for enable and
    /// mode, or milliseconds for the update interval.
    ///
    /// # Errors
    /// * `InvalidChannel` - `channel` is not a connector of this device
    /// * `Unsupported` - the device has no such attribute
    /// * `Cancelled` - [`shutdown`](Self::shutdown) was called
    pub fn read(&self, sensor: SensorType, attribute: Attribute, channel: usize) -> Result<i64> {
        if sensor == SensorType::Chip {
            return self.read_chip(attribute);
        }
        self.check_channel(channel)?;
        let (category, project) = self.query(sensor, attribute)?;
        self.store
            .wait_for(category, |channels| project(&channels[channel]))
    }

    /// Like [`read`](Self::read), failing with [`DeviceError::Timeout`] at `deadline`.
    ///
    /// # Errors
    /// As [`read`](Self::read), plus `Timeout`.
    pub fn read_until(
        &self,
        sensor: SensorType,
        attribute: Attribute,
        channel: usize,
        deadline: Instant,
    ) -> Result<i64> {
        if sensor == SensorType::Chip {
            return self.read_chip(attribute);
        }
        self.check_channel(channel)?;
        let (category, project) = self.query(sensor, attribute)?;
        self.store
            .wait_until(category, deadline, |channels| project(&channels[channel]))
    }

    /// Write a sensor attribute.
    ///
    /// Writable: PWM input (0-255), PWM enable (only its current value) and
    /// the chip update interval.
    ///
    /// # Errors
    /// * `InvalidChannel` - `channel` is not a connector of this device
    /// * `Unsupported` - read-only attribute, an enable change, or an update
    ///   interval on a Grid device
    /// * `Transport` - the command could not be sent
    /// * `Cancelled` - [`shutdown`](Self::shutdown) was called while an enable
    ///   write waited for fan detection
    pub fn write(
        &self,
        sensor: SensorType,
        attribute: Attribute,
        channel: usize,
        value: i64,
    ) -> Result<()> {
        match (sensor, attribute) {
            (SensorType::Chip, Attribute::UpdateInterval) => {
                let interval_ms = value.clamp(0, u32::MAX as i64) as u32;
                self.sequencer
                    .set_update_interval(&self.transport, interval_ms)
                    .map(|_| ())
            }
            (SensorType::Pwm, Attribute::Input) => self.set_pwm(channel, value),
            (SensorType::Pwm, Attribute::Enable) => self.set_pwm_enable(channel, value),
            _ => Err(unsupported(sensor, attribute)),
        }
    }

    /// Connector label as printed on the device.
    pub fn label(&self, sensor: SensorType, channel: usize) -> Option<String> {
        if channel >= self.channel_count() {
            return None;
        }
        let n = channel + 1;
        match sensor {
            SensorType::Fan | SensorType::Pwm => Some(format!("FAN {n}")),
            SensorType::Voltage => Some(format!("FAN {n} Voltage")),
            SensorType::Current => Some(format!("FAN {n} Current")),
            SensorType::Chip => None,
        }
    }

    /// Firmware version reported by Grid devices, `None` before the first
    /// status report and on other devices.
    pub fn firmware(&self) -> Option<FirmwareVersion> {
        self.store.firmware()
    }

    /// Non-blocking status of a channel, `None` until every category has
    /// been reported since the last handshake.
    pub fn status(&self, channel: usize) -> Option<ChannelStatus> {
        self.store.snapshot(channel)
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn check_channel(&self, channel: usize) -> Result<()> {
        let count = self.channel_count();
        if channel >= count {
            return Err(DeviceError::InvalidChannel {
                channel,
                max: count - 1,
            });
        }
        Ok(())
    }

    fn read_chip(&self, attribute: Attribute) -> Result<i64> {
        match attribute {
            Attribute::UpdateInterval if self.model.protocol().has_update_interval() => {
                Ok(self.sequencer.update_interval() as i64)
            }
            _ => Err(unsupported(SensorType::Chip, attribute)),
        }
    }

    /// Category to wait for and how to project a channel into the reported value.
    fn query(&self, sensor: SensorType, attribute: Attribute) -> Result<(StatusCategory, Projection)> {
        let query: (StatusCategory, Projection) = match (sensor, attribute) {
            (
                SensorType::Fan | SensorType::Pwm | SensorType::Voltage | SensorType::Current,
                Attribute::Enable,
            ) => (StatusCategory::FanConfig, |s| s.fan_type.is_connected() as i64),
            (SensorType::Pwm, Attribute::Mode) => {
                (StatusCategory::FanConfig, |s| (s.fan_type == FanType::Pwm) as i64)
            }
            (SensorType::Fan, Attribute::Input) => (StatusCategory::Speed, |s| s.speed_rpm as i64),
            (SensorType::Pwm, Attribute::Input) if self.model.protocol().reports_duty() => {
                (StatusCategory::Speed, |s| scale_nearest(s.duty_percent as i64, 100, 255))
            }
            (SensorType::Voltage, Attribute::Input) => {
                (StatusCategory::Voltage, |s| s.voltage_millivolt as i64)
            }
            (SensorType::Current, Attribute::Input) => {
                (StatusCategory::Voltage, |s| s.current_milliamp as i64)
            }
            _ => return Err(unsupported(sensor, attribute)),
        };
        Ok(query)
    }

    fn set_pwm(&self, channel: usize, value: i64) -> Result<()> {
        self.check_channel(channel)?;
        let duty_percent = scale(value, 255, 100) as u8;
        let command = Command::set_fan_speed(self.model.protocol(), channel as u8, duty_percent);

        // Clients expect to read back what they wrote. The device accepts any
        // duty, even on an empty connector, so cache it without waiting for a
        // report; the next speed report overwrites it either way.
        self.sequencer.send_and_then(&self.transport, command, || {
            self.store.set_duty(channel, duty_percent)
        })
    }

    fn set_pwm_enable(&self, channel: usize, value: i64) -> Result<()> {
        self.check_channel(channel)?;
        let enabled = self.store.wait_for(StatusCategory::FanConfig, |channels| {
            channels[channel].fan_type.is_connected() as i64
        })?;

        // Control scripts re-write pwm enable with the value they read; accept
        // that, but the device cannot switch a channel on or off.
        if value == enabled {
            Ok(())
        } else {
            Err(DeviceError::Unsupported(format!(
                "setting pwm enable to {value} on channel {channel}"
            )))
        }
    }
}

fn unsupported(sensor: SensorType, attribute: Attribute) -> DeviceError {
    DeviceError::Unsupported(format!("{sensor:?} {attribute:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::fake::RecordingTransport;
    use crate::protocol::fixtures::*;
    use crate::protocol::{FanSpeedCommand, parse_update_interval};
    use std::sync::Arc;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    fn smart2() -> FanController<RecordingTransport> {
        FanController::probe(
            DeviceModel::RgbFanController,
            RecordingTransport::default(),
            &DriverConfig::default(),
        )
        .unwrap()
    }

    /// Deliver config, speed and voltage reports.
    fn warm_up(fans: &FanController<RecordingTransport>) {
        fans.handle_raw_event(&smart2_config_report([2, 1, 0]));
        fans.handle_raw_event(&smart2_speed_report([2, 1, 0], [1200, 800, 0], [40, 60, 0]));
        fans.handle_raw_event(&smart2_voltage_report(
            [2, 1, 0],
            [12000, 11900, 40],
            [250, 180, 3],
        ));
    }

    #[test]
    fn test_probe_sends_handshake() {
        let fans = smart2();
        let sent = fans.transport().sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(&sent[0][..2], &[0x60, 0x03]);
        assert_eq!(parse_update_interval(&sent[1]), Some(3));
        assert!(sent.iter().all(|r| r.len() == 64));
        assert!(!fans.store.flags().fan_config);
    }

    #[test]
    fn test_grid_handshake_sequence() {
        let fans = FanController::probe(
            DeviceModel::GridV3,
            RecordingTransport::default(),
            &DriverConfig::default(),
        )
        .unwrap();
        let sent = fans.transport().sent();
        let commands: Vec<_> = sent.iter().map(|r| (r[0], r[1], r.len())).collect();
        assert_eq!(commands, vec![(0x01, 0x5C, 65), (0x01, 0x5D, 65), (0x01, 0x59, 65)]);
    }

    #[test]
    fn test_read_values() {
        let fans = smart2();
        warm_up(&fans);

        assert_eq!(fans.read(SensorType::Fan, Attribute::Input, 0).unwrap(), 1200);
        assert_eq!(fans.read(SensorType::Pwm, Attribute::Input, 1).unwrap(), 153);
        assert_eq!(fans.read(SensorType::Pwm, Attribute::Mode, 0).unwrap(), 1);
        assert_eq!(fans.read(SensorType::Pwm, Attribute::Mode, 1).unwrap(), 0);
        assert_eq!(fans.read(SensorType::Fan, Attribute::Enable, 2).unwrap(), 0);
        assert_eq!(fans.read(SensorType::Voltage, Attribute::Input, 1).unwrap(), 11900);
        // Disconnected channels still report voltage and current
        assert_eq!(fans.read(SensorType::Voltage, Attribute::Input, 2).unwrap(), 40);
        assert_eq!(fans.read(SensorType::Current, Attribute::Input, 2).unwrap(), 3);
        assert_eq!(
            fans.read(SensorType::Chip, Attribute::UpdateInterval, 0).unwrap(),
            1000
        );
    }

    #[test]
    fn test_read_errors() {
        let fans = smart2();
        assert!(matches!(
            fans.read(SensorType::Fan, Attribute::Input, 3),
            Err(DeviceError::InvalidChannel { channel: 3, max: 2 })
        ));
        assert!(matches!(
            fans.read(SensorType::Fan, Attribute::Mode, 0),
            Err(DeviceError::Unsupported(_))
        ));
        assert!(matches!(
            fans.write(SensorType::Fan, Attribute::Input, 0, 1000),
            Err(DeviceError::Unsupported(_))
        ));
    }

    #[test]
    fn test_speed_read_does_not_wait_for_voltage() {
        let fans = smart2();
        fans.handle_raw_event(&smart2_config_report([2, 1, 0]));
        fans.handle_raw_event(&smart2_speed_report([2, 1, 0], [1000, 0, 0], [50, 0, 0]));

        assert_eq!(fans.read(SensorType::Fan, Attribute::Input, 0).unwrap(), 1000);
        let deadline = Instant::now() + Duration::from_millis(20);
        assert!(matches!(
            fans.read_until(SensorType::Voltage, Attribute::Input, 0, deadline),
            Err(DeviceError::Timeout)
        ));
    }

    #[test]
    fn test_read_blocks_until_report() {
        let fans = Arc::new(smart2());
        let (tx, rx) = mpsc::channel();

        let reader = {
            let fans = fans.clone();
            thread::spawn(move || {
                tx.send(fans.read(SensorType::Fan, Attribute::Input, 1)).unwrap();
            })
        };

        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
        warm_up(&fans);

        let rpm = rx.recv_timeout(Duration::from_secs(5)).unwrap().unwrap();
        assert_eq!(rpm, 800);
        reader.join().unwrap();
    }

    #[test]
    fn test_pwm_write_is_read_back() {
        let fans = smart2();
        warm_up(&fans);
        fans.transport().clear();

        fans.write(SensorType::Pwm, Attribute::Input, 2, 128).unwrap();

        let sent = fans.transport().sent();
        assert_eq!(sent.len(), 1);
        let cmd = FanSpeedCommand::parse(&sent[0]).unwrap();
        assert_eq!(cmd.channel_mask, 0b100);
        assert_eq!(cmd.duty_percent, [0, 0, 50, 0, 0, 0, 0, 0]);

        // 50% reported on the 0-255 scale
        assert_eq!(fans.read(SensorType::Pwm, Attribute::Input, 2).unwrap(), 128);
    }

    #[test]
    fn test_pwm_write_never_turns_fan_off() {
        let fans = smart2();
        fans.transport().clear();

        fans.write(SensorType::Pwm, Attribute::Input, 0, 1).unwrap();
        fans.write(SensorType::Pwm, Attribute::Input, 0, 0).unwrap();

        let sent = fans.transport().sent();
        assert_eq!(FanSpeedCommand::parse(&sent[0]).unwrap().duty_percent[0], 1);
        assert_eq!(FanSpeedCommand::parse(&sent[1]).unwrap().duty_percent[0], 0);
    }

    #[test]
    fn test_failed_pwm_write_keeps_cached_duty() {
        let fans = smart2();
        warm_up(&fans);
        fans.transport().fail_from(0);

        assert!(matches!(
            fans.write(SensorType::Pwm, Attribute::Input, 0, 255),
            Err(DeviceError::Transport(_))
        ));
        assert_eq!(fans.read(SensorType::Pwm, Attribute::Input, 0).unwrap(), 102);
    }

    #[test]
    fn test_pwm_enable_write() {
        let fans = smart2();
        warm_up(&fans);

        // Channel 0 has a fan, channel 2 does not
        assert!(fans.write(SensorType::Pwm, Attribute::Enable, 0, 1).is_ok());
        assert!(fans.write(SensorType::Pwm, Attribute::Enable, 2, 0).is_ok());
        assert!(matches!(
            fans.write(SensorType::Pwm, Attribute::Enable, 0, 0),
            Err(DeviceError::Unsupported(_))
        ));
        assert!(matches!(
            fans.write(SensorType::Pwm, Attribute::Enable, 2, 1),
            Err(DeviceError::Unsupported(_))
        ));
    }

    #[test]
    fn test_update_interval_write_realizes_quantized_value() {
        let fans = smart2();
        fans.transport().clear();

        fans.write(SensorType::Chip, Attribute::UpdateInterval, 0, 700).unwrap();
        assert_eq!(parse_update_interval(&fans.transport().sent()[0]), Some(2));
        assert_eq!(
            fans.read(SensorType::Chip, Attribute::UpdateInterval, 0).unwrap(),
            744
        );

        fans.transport().fail_from(1);
        assert!(fans.write(SensorType::Chip, Attribute::UpdateInterval, 0, 5000).is_err());
        assert_eq!(
            fans.read(SensorType::Chip, Attribute::UpdateInterval, 0).unwrap(),
            744
        );
    }

    #[test]
    fn test_bad_report_changes_nothing() {
        let fans = smart2();
        warm_up(&fans);
        let before = fans.status(0).unwrap();

        let report = smart2_speed_report([2, 1, 0], [9999, 9999, 9999], [99, 99, 99]);
        fans.handle_raw_event(&report[..63]);
        fans.handle_raw_event(&[0x42; 64]);
        fans.handle_raw_event(&[]);

        assert_eq!(fans.status(0).unwrap(), before);
        assert!(fans.store.flags().all());
    }

    #[test]
    fn test_bad_report_before_samples_keeps_readers_waiting() {
        let fans = smart2();
        fans.handle_raw_event(&smart2_config_report([2, 1, 0])[..10]);
        assert_eq!(fans.store.flags(), Default::default());
    }

    #[test]
    fn test_reinitialize_blocks_readers_again() {
        let fans = Arc::new(smart2());
        warm_up(&fans);
        fans.write(SensorType::Chip, Attribute::UpdateInterval, 0, 250).unwrap();
        fans.transport().clear();

        fans.reinitialize().unwrap();
        assert_eq!(fans.store.flags(), Default::default());
        assert!(fans.status(0).is_none());

        // Handshake repeats with the configured interval
        let sent = fans.transport().sent();
        assert_eq!(&sent[0][..2], &[0x60, 0x03]);
        assert_eq!(parse_update_interval(&sent[1]), Some(0));

        let (tx, rx) = mpsc::channel();
        let reader = {
            let fans = fans.clone();
            thread::spawn(move || {
                tx.send(fans.read(SensorType::Fan, Attribute::Input, 0)).unwrap();
            })
        };
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());

        fans.handle_raw_event(&smart2_config_report([2, 1, 0]));
        fans.handle_raw_event(&smart2_speed_report([2, 1, 0], [1500, 0, 0], [70, 0, 0]));
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap().unwrap(), 1500);
        reader.join().unwrap();
    }

    #[test]
    fn test_failed_handshake_leaves_flags_cleared() {
        let fans = smart2();
        warm_up(&fans);
        fans.transport().fail_from(fans.transport().sent().len() + 1);

        assert!(matches!(fans.reinitialize(), Err(DeviceError::Transport(_))));
        assert_eq!(fans.store.flags(), Default::default());
    }

    #[test]
    fn test_shutdown_cancels_readers() {
        let fans = Arc::new(smart2());
        let (tx, rx) = mpsc::channel();

        let reader = {
            let fans = fans.clone();
            thread::spawn(move || {
                tx.send(fans.read(SensorType::Current, Attribute::Input, 0))
                    .unwrap();
            })
        };
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());

        fans.shutdown();
        assert!(matches!(
            rx.recv_timeout(Duration::from_secs(5)).unwrap(),
            Err(DeviceError::Cancelled)
        ));
        reader.join().unwrap();
    }

    #[test]
    fn test_grid_device() {
        let fans = FanController::probe(
            DeviceModel::SmartDeviceV1,
            RecordingTransport::default(),
            &DriverConfig::default(),
        )
        .unwrap();
        for channel in 0..3 {
            fans.handle_raw_event(&grid_status_report(channel, 2, 1000 + channel as u16));
        }

        assert_eq!(fans.read(SensorType::Fan, Attribute::Input, 2).unwrap(), 1002);
        assert_eq!(fans.firmware().map(|fw| fw.to_string()).as_deref(), Some("1.258.7"));
        assert_eq!(fans.read(SensorType::Voltage, Attribute::Input, 0).unwrap(), 12050);
        assert_eq!(fans.read(SensorType::Current, Attribute::Input, 0).unwrap(), 300);
        assert!(matches!(
            fans.read(SensorType::Pwm, Attribute::Input, 0),
            Err(DeviceError::Unsupported(_))
        ));
        assert!(matches!(
            fans.read(SensorType::Chip, Attribute::UpdateInterval, 0),
            Err(DeviceError::Unsupported(_))
        ));
        assert!(matches!(
            fans.write(SensorType::Chip, Attribute::UpdateInterval, 0, 1000),
            Err(DeviceError::Unsupported(_))
        ));

        fans.transport().clear();
        fans.write(SensorType::Pwm, Attribute::Input, 1, 255).unwrap();
        let sent = fans.transport().sent();
        assert_eq!(&sent[0][..5], &[0x02, 0x4D, 1, 0x00, 100]);
    }

    #[test]
    fn test_grid_read_waits_for_every_channel() {
        let fans = FanController::probe(
            DeviceModel::GridV3,
            RecordingTransport::default(),
            &DriverConfig::default(),
        )
        .unwrap();
        fans.handle_raw_event(&grid_status_report(0, 2, 1200));

        let deadline = Instant::now() + Duration::from_millis(20);
        assert!(matches!(
            fans.read_until(SensorType::Fan, Attribute::Input, 0, deadline),
            Err(DeviceError::Timeout)
        ));

        for channel in 1..6 {
            fans.handle_raw_event(&grid_status_report(channel, 0, 0));
        }
        assert_eq!(fans.read(SensorType::Fan, Attribute::Input, 0).unwrap(), 1200);
    }

    #[test]
    fn test_smart2_has_no_firmware() {
        let fans = smart2();
        warm_up(&fans);
        assert_eq!(fans.firmware(), None);
    }

    #[test]
    fn test_labels() {
        let fans = smart2();
        assert_eq!(fans.label(SensorType::Pwm, 0).as_deref(), Some("FAN 1"));
        assert_eq!(fans.label(SensorType::Current, 2).as_deref(), Some("FAN 3 Current"));
        assert_eq!(fans.label(SensorType::Fan, 3), None);
        assert_eq!(fans.label(SensorType::Chip, 0), None);
    }
}
