//! Simulated plate reader.
//!
//! A deterministic in-process implementation of [`ReaderSdk`], so the server
//! can be exercised end to end without hardware or the vendor library. Also
//! serves as the integration-test fixture.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use tracing::debug;

use platereader_mcp_core::{
    AbsorbanceConfig, Capability, DeviceDescriptor, DeviceHandle, DeviceInfo, DeviceState,
    DeviceType, LibraryVersion, LuminescenceConfig, ReadoutOrientation, SdkResult, SlotState,
    StatusCode, WELL_COUNT,
};

use crate::sdk::ReaderSdk;

/// One simulated instrument: its descriptor, info record, capability set,
/// and fixed telemetry values.
#[derive(Debug, Clone)]
pub struct SimulatedDevice {
    /// Enumeration descriptor.
    pub descriptor: DeviceDescriptor,
    /// Information snapshot returned after open.
    pub info: DeviceInfo,
    /// Capabilities this device answers `true` for.
    pub capabilities: HashSet<Capability>,
    /// Uptime in seconds.
    pub uptime: u64,
    /// Internal temperature in degrees Celsius.
    pub temperature: f32,
    /// Relative humidity in percent.
    pub humidity: f32,
    /// Plate slot state.
    pub slot: SlotState,
    /// Alignment flag.
    pub parts_aligned: bool,
    /// Readout orientation.
    pub orientation: ReadoutOrientation,
    /// Available absorbance wavelengths in nanometers.
    pub wavelengths: Vec<u16>,
    /// Identifiers of the fitted optics modules.
    pub modules: Vec<String>,
}

impl SimulatedDevice {
    /// A Lum96-style luminescence reader: uptime, slot sensor, alignment and
    /// temperature available; humidity and orientation sensors absent.
    pub fn lum96() -> Self {
        Self {
            descriptor: DeviceDescriptor {
                device_type: DeviceType::Luminescence96,
                sn: "LUM960001".to_string(),
                vid: 0x1234,
                pid: 0x5678,
            },
            info: DeviceInfo {
                sn: "LUM960001".to_string(),
                ref_no: "REF-LUM96".to_string(),
                version: "1".to_string(),
                device_type: DeviceType::Luminescence96,
            },
            capabilities: HashSet::from([
                Capability::Uptime,
                Capability::SlotStatus,
                Capability::PartsAligned,
                Capability::Temperature,
                Capability::LuminescenceMeasurement,
            ]),
            uptime: 123_456,
            temperature: 25.3,
            humidity: 0.0,
            slot: SlotState::Occupied,
            parts_aligned: true,
            orientation: ReadoutOrientation::A1,
            wavelengths: Vec::new(),
            modules: Vec::new(),
        }
    }

    /// An Abs96-style absorbance reader. Lacks luminescence support, so the
    /// connect search must open and reject it.
    pub fn abs96() -> Self {
        Self {
            descriptor: DeviceDescriptor {
                device_type: DeviceType::Absorbance96,
                sn: "ABS960001".to_string(),
                vid: 0x1234,
                pid: 0x5679,
            },
            info: DeviceInfo {
                sn: "ABS960001".to_string(),
                ref_no: "REF-ABS96".to_string(),
                version: "1".to_string(),
                device_type: DeviceType::Absorbance96,
            },
            capabilities: HashSet::from([
                Capability::Uptime,
                Capability::SlotStatus,
                Capability::Temperature,
                Capability::AvailableWavelengths,
                Capability::Modules,
                Capability::AbsorbanceMeasurement,
            ]),
            uptime: 7_200,
            temperature: 24.1,
            humidity: 0.0,
            slot: SlotState::Empty,
            parts_aligned: true,
            orientation: ReadoutOrientation::A1,
            wavelengths: vec![450, 560, 605, 650],
            modules: vec!["ABS96-BASE".to_string(), "ABS96-UV".to_string()],
        }
    }
}

/// Deterministic ramp used for simulated well readings: 0.0, 0.5, ... 3.5
/// repeating across the plate.
fn well_ramp(index: usize) -> f64 {
    ((index % 8) as f64) * 0.5
}

#[derive(Debug, Default)]
struct SimulatorState {
    next_handle: u32,
    // handle value -> index into `devices`
    open: HashMap<u32, usize>,
}

/// Simulated vendor SDK serving a fixed set of [`SimulatedDevice`]s.
pub struct SimulatedReader {
    version: LibraryVersion,
    devices: Vec<SimulatedDevice>,
    state: Mutex<SimulatorState>,
}

impl SimulatedReader {
    /// A simulator with one luminescence reader attached. The default
    /// profile served by the binary.
    pub fn lum96() -> Self {
        Self::with_devices(vec![SimulatedDevice::lum96()])
    }

    /// A simulator with an arbitrary set of attached devices.
    pub fn with_devices(devices: Vec<SimulatedDevice>) -> Self {
        Self {
            version: LibraryVersion {
                major: 2,
                minor: 4,
                patch: 0,
            },
            devices,
            state: Mutex::new(SimulatorState {
                next_handle: 1,
                open: HashMap::new(),
            }),
        }
    }

    fn device_for(&self, handle: DeviceHandle) -> SdkResult<&SimulatedDevice> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let index = *state.open.get(&handle.0).ok_or(StatusCode::InvalidHandle)?;
        Ok(&self.devices[index])
    }

    fn gated<T>(&self, handle: DeviceHandle, capability: Capability, value: T) -> SdkResult<T> {
        let device = self.device_for(handle)?;
        if device.capabilities.contains(&capability) {
            Ok(value)
        } else {
            Err(StatusCode::UnsupportedOperation)
        }
    }
}

impl ReaderSdk for SimulatedReader {
    fn library_version(&self) -> LibraryVersion {
        self.version
    }

    fn available_devices(&self) -> Vec<DeviceDescriptor> {
        self.devices.iter().map(|d| d.descriptor.clone()).collect()
    }

    fn open_device(&self, descriptor: &DeviceDescriptor) -> SdkResult<DeviceHandle> {
        let index = self
            .devices
            .iter()
            .position(|d| d.descriptor.sn == descriptor.sn)
            .ok_or(StatusCode::DeviceNotFound)?;
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let handle = state.next_handle;
        state.next_handle += 1;
        state.open.insert(handle, index);
        debug!(sn = %descriptor.sn, handle, "simulated device opened");
        Ok(DeviceHandle(handle))
    }

    fn free_device(&self, handle: DeviceHandle) -> StatusCode {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        match state.open.remove(&handle.0) {
            Some(_) => {
                debug!(handle = handle.0, "simulated device freed");
                StatusCode::NoError
            }
            None => StatusCode::InvalidHandle,
        }
    }

    fn device_information(&self, handle: DeviceHandle) -> SdkResult<DeviceInfo> {
        self.device_for(handle).map(|d| d.info.clone())
    }

    fn device_status(&self, handle: DeviceHandle) -> SdkResult<DeviceState> {
        self.device_for(handle).map(|_| DeviceState::Ok)
    }

    fn device_error(&self, handle: DeviceHandle) -> SdkResult<u32> {
        self.device_for(handle).map(|_| 0)
    }

    fn supports(&self, handle: DeviceHandle, capability: Capability) -> bool {
        self.device_for(handle)
            .map(|d| d.capabilities.contains(&capability))
            .unwrap_or(false)
    }

    fn device_uptime(&self, handle: DeviceHandle) -> SdkResult<u64> {
        let uptime = self.device_for(handle)?.uptime;
        self.gated(handle, Capability::Uptime, uptime)
    }

    fn device_slot_status(&self, handle: DeviceHandle) -> SdkResult<SlotState> {
        let slot = self.device_for(handle)?.slot;
        self.gated(handle, Capability::SlotStatus, slot)
    }

    fn device_parts_aligned(&self, handle: DeviceHandle) -> SdkResult<bool> {
        let aligned = self.device_for(handle)?.parts_aligned;
        self.gated(handle, Capability::PartsAligned, aligned)
    }

    fn device_readout_orientation(&self, handle: DeviceHandle) -> SdkResult<ReadoutOrientation> {
        let orientation = self.device_for(handle)?.orientation;
        self.gated(handle, Capability::ReadoutOrientation, orientation)
    }

    fn device_temperature(&self, handle: DeviceHandle) -> SdkResult<f32> {
        let temperature = self.device_for(handle)?.temperature;
        self.gated(handle, Capability::Temperature, temperature)
    }

    fn device_humidity(&self, handle: DeviceHandle) -> SdkResult<f32> {
        let humidity = self.device_for(handle)?.humidity;
        self.gated(handle, Capability::Humidity, humidity)
    }

    fn available_wavelengths(&self, handle: DeviceHandle) -> SdkResult<Vec<u16>> {
        let wavelengths = self.device_for(handle)?.wavelengths.clone();
        self.gated(handle, Capability::AvailableWavelengths, wavelengths)
    }

    fn device_modules(&self, handle: DeviceHandle) -> SdkResult<Vec<String>> {
        let modules = self.device_for(handle)?.modules.clone();
        self.gated(handle, Capability::Modules, modules)
    }

    fn initialize_absorbance(
        &self,
        handle: DeviceHandle,
        _config: &AbsorbanceConfig,
    ) -> StatusCode {
        match self.gated(handle, Capability::AbsorbanceMeasurement, ()) {
            Ok(()) => StatusCode::NoError,
            Err(code) => code,
        }
    }

    fn measure_absorbance(
        &self,
        handle: DeviceHandle,
        config: &AbsorbanceConfig,
    ) -> SdkResult<Vec<f64>> {
        let channels = match config {
            AbsorbanceConfig::Single { .. } => 1,
            AbsorbanceConfig::Multiple { wavelengths_nm } => wavelengths_nm.len(),
        };
        let values = (0..WELL_COUNT * channels).map(well_ramp).collect();
        self.gated(handle, Capability::AbsorbanceMeasurement, values)
    }

    fn measure_luminescence(
        &self,
        handle: DeviceHandle,
        config: &LuminescenceConfig,
    ) -> SdkResult<Vec<f64>> {
        use platereader_mcp_core::IntegrationMode;

        let scale = match config.mode {
            IntegrationMode::Sensitive => 1.0,
            IntegrationMode::Fast => 0.25,
        };
        let values = config
            .selected_wells
            .iter()
            .enumerate()
            .map(|(i, &selected)| if selected { well_ramp(i) * scale } else { 0.0 })
            .collect();
        self.gated(handle, Capability::LuminescenceMeasurement, values)
    }
}
