//! Supported device models and their protocol family.

/// NZXT Vendor ID.
pub const NZXT_VID: u16 = 0x1E71;

/// Wire protocol family spoken by a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// Grid V3 / Smart Device V1: one big-endian status report per channel.
    Grid,
    /// Smart Device V2 / RGB & Fan Controller: little-endian, multi-channel
    /// reports with a sub-type byte.
    Smart2,
}

impl Protocol {
    /// Fixed length of every output report, zero padded.
    pub const fn output_report_length(&self) -> usize {
        match self {
            Protocol::Grid => 65,
            Protocol::Smart2 => 64,
        }
    }

    /// Whether the device reports duty cycle back.
    pub const fn reports_duty(&self) -> bool {
        matches!(self, Protocol::Smart2)
    }

    /// Whether the status report period can be configured.
    pub const fn has_update_interval(&self) -> bool {
        matches!(self, Protocol::Smart2)
    }
}

/// Known device models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceModel {
    GridV3,
    SmartDeviceV1,
    SmartDeviceV2,
    RgbFanController,
}

impl DeviceModel {
    /// Look up a model by USB product ID.
    pub fn from_product_id(pid: u16) -> Option<Self> {
        match pid {
            0x1711 => Some(DeviceModel::GridV3),
            0x1714 => Some(DeviceModel::SmartDeviceV1),
            0x2006 | 0x200D | 0x200F => Some(DeviceModel::SmartDeviceV2),
            0x2009 | 0x200E | 0x2010 | 0x2011 | 0x2019 | 0x2020 => {
                Some(DeviceModel::RgbFanController)
            }
            _ => None,
        }
    }

    pub const fn protocol(&self) -> Protocol {
        match self {
            DeviceModel::GridV3 | DeviceModel::SmartDeviceV1 => Protocol::Grid,
            DeviceModel::SmartDeviceV2 | DeviceModel::RgbFanController => Protocol::Smart2,
        }
    }

    /// Number of physical fan connectors.
    pub const fn channel_count(&self) -> usize {
        match self {
            DeviceModel::GridV3 => 6,
            _ => 3,
        }
    }
}

impl std::fmt::Display for DeviceModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceModel::GridV3 => write!(f, "NZXT Grid V3"),
            DeviceModel::SmartDeviceV1 => write!(f, "NZXT Smart Device V1"),
            DeviceModel::SmartDeviceV2 => write!(f, "NZXT Smart Device V2"),
            DeviceModel::RgbFanController => write!(f, "NZXT RGB & Fan Controller"),
        }
    }
}
