//! Output report definitions and builders.
//!
//! Layouts follow the liquidctl `smart_device.py` notes and the upstream
//! Linux `nzxt-smart2` / out-of-tree `nzxt-grid` hwmon drivers.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::DecodeError;
use crate::protocol::model::Protocol;

// =============================================================================
// Constants
// =============================================================================

/// Channel slots reserved in every Smart2 report (devices use the first 3).
pub const SMART2_CHANNEL_SLOTS: usize = 8;

/// Grid: init command report ID.
pub const GRID_OUT_INIT: u8 = 0x01;
/// Grid: per-channel command report ID.
pub const GRID_OUT_CHANNEL: u8 = 0x02;
/// Grid: set fan speed channel command.
pub const GRID_CMD_SET_FAN_SPEED: u8 = 0x4D;

/// Grid handshake: detect fans, then two commands vendor software also sends.
pub const GRID_INIT_SEQUENCE: [u8; 3] = [0x5C, 0x5D, 0x59];

/// Smart2: init command report ID.
pub const SMART2_OUT_INIT: u8 = 0x60;
/// Smart2: set fan speed report ID.
pub const SMART2_OUT_SET_FAN_SPEED: u8 = 0x62;
/// Smart2 init command: set update interval.
pub const SMART2_INIT_SET_UPDATE_INTERVAL: u8 = 0x02;
/// Smart2 init command: detect fans.
pub const SMART2_INIT_DETECT_FANS: u8 = 0x03;

/// Offset of the channel bit mask in a Smart2 set fan speed report.
const OFFSET_SPEED_MASK: usize = 2;
/// Offset of the first duty byte in a Smart2 set fan speed report.
const OFFSET_SPEED_DUTY: usize = 3;

/// Update interval used until the caller configures one.
pub const UPDATE_INTERVAL_DEFAULT_MS: u32 = 1000;
/// Shortest interval the device supports (control byte 0).
pub const UPDATE_INTERVAL_PRECISION_MS: u32 = 250;

// =============================================================================
// Update Interval
// =============================================================================

/// Quantize an interval in milliseconds to the device control byte.
///
/// Control byte `n > 0` selects `488 + 256 * (n - 1)` ms, `0` selects 250 ms.
pub fn update_interval_to_control(interval_ms: u32) -> u8 {
    if interval_ms <= UPDATE_INTERVAL_PRECISION_MS {
        return 0;
    }

    // Round to closest, halves away from zero (the offset may be negative)
    let offset = interval_ms as i64 - 488;
    let steps = if offset >= 0 {
        (offset + 128) / 256
    } else {
        (offset - 128) / 256
    };

    (1 + steps).clamp(0, 255) as u8
}

/// Interval in milliseconds actually realized by a control byte.
pub fn control_to_update_interval(control: u8) -> u32 {
    if control == 0 {
        return UPDATE_INTERVAL_PRECISION_MS;
    }
    (control as u32 - 1) * 256 + 488
}

// =============================================================================
// Commands
// =============================================================================

/// Host-to-device command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Grid init command (see [`GRID_INIT_SEQUENCE`]).
    GridInit(u8),
    /// Grid fixed duty for one channel.
    GridSetFanSpeed { channel: u8, duty_percent: u8 },
    /// Smart2 fan detection; the device answers with a fan config report.
    DetectFans,
    /// Smart2 status report period.
    SetUpdateInterval { control: u8 },
    /// Smart2 fixed duty, gated by a one-channel bit mask.
    SetFanSpeed { channel: u8, duty_percent: u8 },
}

impl Command {
    /// Build the set-duty command appropriate for a protocol.
    pub fn set_fan_speed(protocol: Protocol, channel: u8, duty_percent: u8) -> Self {
        match protocol {
            Protocol::Grid => Command::GridSetFanSpeed {
                channel,
                duty_percent,
            },
            Protocol::Smart2 => Command::SetFanSpeed {
                channel,
                duty_percent,
            },
        }
    }

    /// Protocol family this command belongs to.
    pub const fn protocol(&self) -> Protocol {
        match self {
            Command::GridInit(_) | Command::GridSetFanSpeed { .. } => Protocol::Grid,
            _ => Protocol::Smart2,
        }
    }

    /// Serialize into a zero-padded report of the protocol's output length.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = vec![0u8; self.protocol().output_report_length()];

        match *self {
            Command::GridInit(cmd) => {
                buf[0] = GRID_OUT_INIT;
                buf[1] = cmd;
            }
            Command::GridSetFanSpeed {
                channel,
                duty_percent,
            } => {
                buf[0] = GRID_OUT_CHANNEL;
                buf[1] = GRID_CMD_SET_FAN_SPEED;
                buf[2] = channel;
                buf[4] = duty_percent;
            }
            Command::DetectFans => {
                buf[0] = SMART2_OUT_INIT;
                buf[1] = SMART2_INIT_DETECT_FANS;
            }
            Command::SetUpdateInterval { control } => {
                // Same (unknown) 3-byte group twice, as sent by NZXT CAM
                buf[..8].copy_from_slice(&[
                    SMART2_OUT_INIT,
                    SMART2_INIT_SET_UPDATE_INTERVAL,
                    0x01,
                    0xE8,
                    control,
                    0x01,
                    0xE8,
                    control,
                ]);
            }
            Command::SetFanSpeed {
                channel,
                duty_percent,
            } => {
                buf[0] = SMART2_OUT_SET_FAN_SPEED;
                buf[1] = 0x01;
                buf[OFFSET_SPEED_MASK] = 1u8.checked_shl(channel as u32).unwrap_or(0);
                if (channel as usize) < SMART2_CHANNEL_SLOTS {
                    buf[OFFSET_SPEED_DUTY + channel as usize] = duty_percent;
                }
            }
        }

        buf
    }
}

// =============================================================================
// Command Parsing
// =============================================================================

/// Decoded Smart2 set fan speed report.
///
/// The device only applies duty bytes whose bit is set in `channel_mask`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanSpeedCommand {
    pub channel_mask: u8,
    pub duty_percent: [u8; SMART2_CHANNEL_SLOTS],
}

impl FanSpeedCommand {
    /// Parse a Smart2 set fan speed output report.
    pub fn parse(buf: &[u8]) -> Result<Self, DecodeError> {
        let expected = Protocol::Smart2.output_report_length();
        let tag = buf.first().copied().ok_or(DecodeError::Empty)?;

        if tag != SMART2_OUT_SET_FAN_SPEED {
            return Err(DecodeError::UnknownKind {
                tag,
                size: buf.len(),
            });
        }
        if buf.len() != expected {
            return Err(DecodeError::SizeMismatch {
                tag,
                expected,
                actual: buf.len(),
            });
        }

        let mut duty_percent = [0u8; SMART2_CHANNEL_SLOTS];
        duty_percent.copy_from_slice(
            &buf[OFFSET_SPEED_DUTY..OFFSET_SPEED_DUTY + SMART2_CHANNEL_SLOTS],
        );

        Ok(FanSpeedCommand {
            channel_mask: buf[OFFSET_SPEED_MASK],
            duty_percent,
        })
    }
}

/// Read the little-endian interval group back out of a set update interval report.
///
/// Returns the control byte, or `None` for any other report.
pub fn parse_update_interval(buf: &[u8]) -> Option<u8> {
    if buf.len() < 8
        || buf[0] != SMART2_OUT_INIT
        || buf[1] != SMART2_INIT_SET_UPDATE_INTERVAL
        || LittleEndian::read_u16(&buf[2..4]) != 0xE801
    {
        return None;
    }
    Some(buf[4])
}
