//! Device metadata types.
//!
//! These mirror the records the vendor library hands back: enumeration
//! descriptors, the information snapshot fetched after open, and the small
//! state enums used by the telemetry getters.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Opaque handle to an open device, issued by the vendor SDK.
///
/// At most one live handle exists per process; the session layer owns it
/// exclusively from a successful connect until disconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceHandle(pub u32);

impl fmt::Display for DeviceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handle#{}", self.0)
    }
}

/// The instrument families this server knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum DeviceType {
    /// 96-well absorbance reader.
    Absorbance96,
    /// 96-well luminescence reader.
    Luminescence96,
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceType::Absorbance96 => f.write_str("Absorbance96"),
            DeviceType::Luminescence96 => f.write_str("Luminescence96"),
        }
    }
}

/// Enumeration record for an attached device, before it is opened.
///
/// Transient: only used while searching for a compatible device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    /// Instrument family reported on the USB descriptor.
    pub device_type: DeviceType,
    /// Serial number.
    pub sn: String,
    /// USB vendor ID.
    pub vid: u16,
    /// USB product ID.
    pub pid: u16,
}

/// Information snapshot fetched from the device right after open.
///
/// Captured once at connect time and cleared on disconnect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DeviceInfo {
    /// Serial number.
    pub sn: String,
    /// Manufacturer reference number.
    pub ref_no: String,
    /// Firmware version string.
    pub version: String,
    /// Instrument family.
    pub device_type: DeviceType,
}

/// Overall device state reported by the status getter.
///
/// Rendered via [`Display`](fmt::Display) into tool responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    /// Idle and ready for commands.
    Ok,
    /// Busy executing a measurement or motion.
    Busy,
    /// An error condition is latched; read the error register.
    Error,
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceState::Ok => f.write_str("OK"),
            DeviceState::Busy => f.write_str("BUSY"),
            DeviceState::Error => f.write_str("ERROR"),
        }
    }
}

/// Plate slot state, for devices with a slot sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// No plate inserted.
    Empty,
    /// A plate is inserted.
    Occupied,
    /// The sensor could not determine the slot state.
    Undetermined,
}

impl fmt::Display for SlotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotState::Empty => f.write_str("EMPTY"),
            SlotState::Occupied => f.write_str("OCCUPIED"),
            SlotState::Undetermined => f.write_str("UNDETERMINED"),
        }
    }
}

/// Readout orientation, for devices that can read the plate either way up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadoutOrientation {
    /// Wells read A1-first.
    A1,
    /// Wells read H12-first (plate rotated 180 degrees).
    H12,
}

impl fmt::Display for ReadoutOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadoutOrientation::A1 => f.write_str("A1"),
            ReadoutOrientation::H12 => f.write_str("H12"),
        }
    }
}

/// Version of the vendor library itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LibraryVersion {
    /// Major version.
    pub major: u32,
    /// Minor version.
    pub minor: u32,
    /// Patch version.
    pub patch: u32,
}

impl fmt::Display for LibraryVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_info_serializes_round_trip() {
        let info = DeviceInfo {
            sn: "SN1".to_string(),
            ref_no: "R1".to_string(),
            version: "1".to_string(),
            device_type: DeviceType::Luminescence96,
        };
        let json = serde_json::to_string(&info).unwrap();
        let back: DeviceInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(info, back);
    }

    #[test]
    fn test_library_version_display() {
        let v = LibraryVersion {
            major: 2,
            minor: 4,
            patch: 1,
        };
        assert_eq!(v.to_string(), "2.4.1");
    }

    #[test]
    fn test_state_enum_display() {
        assert_eq!(DeviceState::Busy.to_string(), "BUSY");
        assert_eq!(SlotState::Occupied.to_string(), "OCCUPIED");
        assert_eq!(ReadoutOrientation::A1.to_string(), "A1");
    }
}
