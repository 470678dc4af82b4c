//! Input report decoding.
//!
//! Parses raw HID input reports into typed reports. Offsets and byte order
//! are protocol facts: the Grid family is big-endian, the Smart2 family
//! little-endian.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::error::DecodeError;
use crate::protocol::commands::SMART2_CHANNEL_SLOTS;
use crate::protocol::model::Protocol;

// =============================================================================
// Report IDs and Offsets
// =============================================================================

/// Grid: per-channel status report.
pub const GRID_IN_STATUS: u8 = 0x04;
/// Grid: exact status report length.
pub const GRID_STATUS_LENGTH: usize = 21;

const GRID_OFFSET_RPM: usize = 3;
const GRID_OFFSET_VOLT: usize = 7;
const GRID_OFFSET_CENTIVOLT: usize = 8;
const GRID_OFFSET_AMP: usize = 9;
const GRID_OFFSET_CENTIAMP: usize = 10;
const GRID_OFFSET_FW_MAJOR: usize = 11;
const GRID_OFFSET_FW_MINOR: usize = 12;
const GRID_OFFSET_FW_PATCH: usize = 14;
/// Low nibble fan type, high nibble channel index.
const GRID_OFFSET_TYPE_CHANNEL: usize = 15;

/// Smart2: fan configuration, sent in response to "detect fans".
pub const SMART2_IN_FAN_CONFIG: u8 = 0x61;
/// Smart2: periodic fan status.
pub const SMART2_IN_FAN_STATUS: u8 = 0x67;
/// Smart2: exact input report length.
pub const SMART2_INPUT_LENGTH: usize = 64;

/// Only sub-type seen in fan config reports.
pub const FAN_CONFIG_MAGIC: u8 = 0x03;
/// Fan status sub-type: rpm + duty.
pub const FAN_STATUS_SPEED: u8 = 0x02;
/// Fan status sub-type: voltage + current.
pub const FAN_STATUS_VOLTAGE: u8 = 0x04;

const SMART2_OFFSET_FAN_TYPE: usize = 16;
/// Start of the sub-type dependent payload.
const SMART2_OFFSET_PAYLOAD: usize = 24;
/// Second half of the payload (duty bytes or current words).
const SMART2_OFFSET_PAYLOAD_HI: usize = 40;

// =============================================================================
// Report Structures
// =============================================================================

/// Device-detected actuator kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FanType {
    /// Nothing connected, readings are meaningless.
    #[default]
    None,
    Dc,
    Pwm,
    /// Value outside the known set.
    Invalid,
}

impl FanType {
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 => FanType::None,
            1 => FanType::Dc,
            2 => FanType::Pwm,
            _ => FanType::Invalid,
        }
    }

    /// Whether a fan is attached to the channel.
    pub fn is_connected(&self) -> bool {
        *self != FanType::None
    }
}

impl std::fmt::Display for FanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FanType::None => write!(f, "None"),
            FanType::Dc => write!(f, "DC"),
            FanType::Pwm => write!(f, "PWM"),
            FanType::Invalid => write!(f, "Invalid"),
        }
    }
}

/// Firmware version carried in Grid status reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FirmwareVersion {
    pub major: u8,
    pub minor: u16,
    pub patch: u8,
}

impl std::fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Grid status for a single channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridChannelReport {
    pub channel: u8,
    pub fan_type: FanType,
    pub fan_type_raw: u8,
    pub rpm: u16,
    pub millivolt: u32,
    pub milliamp: u32,
    pub firmware: FirmwareVersion,
}

/// Sub-type dependent part of a Smart2 fan status report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPayload {
    Speed {
        rpm: [u16; SMART2_CHANNEL_SLOTS],
        duty_percent: [u8; SMART2_CHANNEL_SLOTS],
    },
    Voltage {
        millivolt: [u16; SMART2_CHANNEL_SLOTS],
        milliamp: [u16; SMART2_CHANNEL_SLOTS],
    },
}

/// Decoded device-to-host report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputReport {
    GridStatus(GridChannelReport),
    FanConfig {
        fan_types: [u8; SMART2_CHANNEL_SLOTS],
    },
    FanStatus {
        fan_types: [u8; SMART2_CHANNEL_SLOTS],
        payload: StatusPayload,
    },
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode a raw input report for the given protocol family.
pub fn decode(protocol: Protocol, buf: &[u8]) -> Result<InputReport, DecodeError> {
    let tag = buf.first().copied().ok_or(DecodeError::Empty)?;

    match (protocol, tag) {
        (Protocol::Grid, GRID_IN_STATUS) => {
            check_size(tag, buf, GRID_STATUS_LENGTH)?;
            Ok(InputReport::GridStatus(decode_grid_status(buf)))
        }
        (Protocol::Smart2, SMART2_IN_FAN_CONFIG) => {
            check_size(tag, buf, SMART2_INPUT_LENGTH)?;
            if buf[1] != FAN_CONFIG_MAGIC {
                return Err(DecodeError::UnknownSubtype {
                    tag,
                    subtype: buf[1],
                });
            }
            Ok(InputReport::FanConfig {
                fan_types: read_fan_types(buf),
            })
        }
        (Protocol::Smart2, SMART2_IN_FAN_STATUS) => {
            check_size(tag, buf, SMART2_INPUT_LENGTH)?;
            let payload = match buf[1] {
                FAN_STATUS_SPEED => {
                    let mut rpm = [0u16; SMART2_CHANNEL_SLOTS];
                    LittleEndian::read_u16_into(
                        &buf[SMART2_OFFSET_PAYLOAD..SMART2_OFFSET_PAYLOAD_HI],
                        &mut rpm,
                    );
                    let mut duty_percent = [0u8; SMART2_CHANNEL_SLOTS];
                    duty_percent.copy_from_slice(
                        &buf[SMART2_OFFSET_PAYLOAD_HI
                            ..SMART2_OFFSET_PAYLOAD_HI + SMART2_CHANNEL_SLOTS],
                    );
                    StatusPayload::Speed { rpm, duty_percent }
                }
                FAN_STATUS_VOLTAGE => {
                    let mut millivolt = [0u16; SMART2_CHANNEL_SLOTS];
                    LittleEndian::read_u16_into(
                        &buf[SMART2_OFFSET_PAYLOAD..SMART2_OFFSET_PAYLOAD_HI],
                        &mut millivolt,
                    );
                    let mut milliamp = [0u16; SMART2_CHANNEL_SLOTS];
                    LittleEndian::read_u16_into(
                        &buf[SMART2_OFFSET_PAYLOAD_HI
                            ..SMART2_OFFSET_PAYLOAD_HI + 2 * SMART2_CHANNEL_SLOTS],
                        &mut milliamp,
                    );
                    StatusPayload::Voltage {
                        millivolt,
                        milliamp,
                    }
                }
                subtype => return Err(DecodeError::UnknownSubtype { tag, subtype }),
            };
            Ok(InputReport::FanStatus {
                fan_types: read_fan_types(buf),
                payload,
            })
        }
        _ => Err(DecodeError::UnknownKind {
            tag,
            size: buf.len(),
        }),
    }
}

fn check_size(tag: u8, buf: &[u8], expected: usize) -> Result<(), DecodeError> {
    if buf.len() != expected {
        return Err(DecodeError::SizeMismatch {
            tag,
            expected,
            actual: buf.len(),
        });
    }
    Ok(())
}

fn read_fan_types(buf: &[u8]) -> [u8; SMART2_CHANNEL_SLOTS] {
    let mut fan_types = [0u8; SMART2_CHANNEL_SLOTS];
    fan_types.copy_from_slice(
        &buf[SMART2_OFFSET_FAN_TYPE..SMART2_OFFSET_FAN_TYPE + SMART2_CHANNEL_SLOTS],
    );
    fan_types
}

fn decode_grid_status(buf: &[u8]) -> GridChannelReport {
    let type_channel = buf[GRID_OFFSET_TYPE_CHANNEL];
    let fan_type_raw = type_channel & 0x0F;

    GridChannelReport {
        channel: type_channel >> 4,
        fan_type: FanType::from_raw(fan_type_raw),
        fan_type_raw,
        rpm: BigEndian::read_u16(&buf[GRID_OFFSET_RPM..GRID_OFFSET_RPM + 2]),
        millivolt: buf[GRID_OFFSET_VOLT] as u32 * 1000 + buf[GRID_OFFSET_CENTIVOLT] as u32 * 10,
        milliamp: buf[GRID_OFFSET_AMP] as u32 * 1000 + buf[GRID_OFFSET_CENTIAMP] as u32 * 10,
        firmware: FirmwareVersion {
            major: buf[GRID_OFFSET_FW_MAJOR],
            minor: BigEndian::read_u16(&buf[GRID_OFFSET_FW_MINOR..GRID_OFFSET_FW_MINOR + 2]),
            patch: buf[GRID_OFFSET_FW_PATCH],
        },
    }
}

/// Report builders shared by tests across the crate.
#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Build a Smart2 fan status report with 3 populated channels.
    pub(crate) fn smart2_speed_report(fan_types: [u8; 3], rpm: [u16; 3], duty: [u8; 3]) -> Vec<u8> {
        let mut buf = vec![0u8; SMART2_INPUT_LENGTH];
        buf[0] = SMART2_IN_FAN_STATUS;
        buf[1] = FAN_STATUS_SPEED;
        buf[16..19].copy_from_slice(&fan_types);
        for i in 0..3 {
            LittleEndian::write_u16(&mut buf[24 + 2 * i..26 + 2 * i], rpm[i]);
            buf[40 + i] = duty[i];
            buf[48 + i] = duty[i];
        }
        buf
    }

    pub(crate) fn smart2_voltage_report(
        fan_types: [u8; 3],
        millivolt: [u16; 3],
        milliamp: [u16; 3],
    ) -> Vec<u8> {
        let mut buf = vec![0u8; SMART2_INPUT_LENGTH];
        buf[0] = SMART2_IN_FAN_STATUS;
        buf[1] = FAN_STATUS_VOLTAGE;
        buf[16..19].copy_from_slice(&fan_types);
        for i in 0..3 {
            LittleEndian::write_u16(&mut buf[24 + 2 * i..26 + 2 * i], millivolt[i]);
            LittleEndian::write_u16(&mut buf[40 + 2 * i..42 + 2 * i], milliamp[i]);
        }
        buf
    }

    pub(crate) fn smart2_config_report(fan_types: [u8; 3]) -> Vec<u8> {
        let mut buf = vec![0u8; SMART2_INPUT_LENGTH];
        buf[0] = SMART2_IN_FAN_CONFIG;
        buf[1] = FAN_CONFIG_MAGIC;
        buf[16..19].copy_from_slice(&fan_types);
        buf
    }

    pub(crate) fn grid_status_report(channel: u8, fan_type: u8, rpm: u16) -> Vec<u8> {
        let mut buf = vec![0u8; GRID_STATUS_LENGTH];
        buf[0] = GRID_IN_STATUS;
        BigEndian::write_u16(&mut buf[3..5], rpm);
        // 12.05 V, 0.30 A
        buf[7] = 12;
        buf[8] = 5;
        buf[9] = 0;
        buf[10] = 30;
        buf[11] = 1;
        BigEndian::write_u16(&mut buf[12..14], 0x0102);
        buf[14] = 7;
        buf[15] = (channel << 4) | (fan_type & 0x0F);
        buf
    }
}
