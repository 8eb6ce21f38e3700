//! Optional hardware capability flags.

use std::fmt;

/// An optional hardware feature that must be probed before use.
///
/// Devices in the same family ship with different sensor and optics options,
/// so support is re-queried on every access instead of cached: the answer can
/// change between connects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Uptime counter.
    Uptime,
    /// Plate slot sensor.
    SlotStatus,
    /// Mechanical alignment check.
    PartsAligned,
    /// Readout orientation sensor.
    ReadoutOrientation,
    /// Internal temperature sensor.
    Temperature,
    /// Internal humidity sensor.
    Humidity,
    /// Absorbance wavelength enumeration.
    AvailableWavelengths,
    /// Absorbance optics module enumeration.
    Modules,
    /// Absorbance measurement.
    AbsorbanceMeasurement,
    /// Luminescence measurement.
    LuminescenceMeasurement,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Uptime => "uptime",
            Capability::SlotStatus => "slot status",
            Capability::PartsAligned => "parts aligned status",
            Capability::ReadoutOrientation => "readout orientation",
            Capability::Temperature => "temperature reading",
            Capability::Humidity => "humidity reading",
            Capability::AvailableWavelengths => "wavelength enumeration",
            Capability::Modules => "module enumeration",
            Capability::AbsorbanceMeasurement => "absorbance measurement",
            Capability::LuminescenceMeasurement => "luminescence measurement",
        };
        f.write_str(name)
    }
}
