//! Test support: a scripted, call-recording [`ReaderSdk`].
//!
//! [`MockSdk`] lets tests script every vendor call's outcome per device and
//! then assert on exactly which calls were made, which handles were opened,
//! and which were freed.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use platereader_mcp_core::{
    AbsorbanceConfig, Capability, DeviceDescriptor, DeviceHandle, DeviceInfo, DeviceState,
    DeviceType, LibraryVersion, LuminescenceConfig, ReadoutOrientation, SdkResult, SlotState,
    StatusCode, WELL_COUNT,
};

use crate::sdk::ReaderSdk;

/// One recorded vendor call.
#[derive(Debug, Clone, PartialEq)]
pub enum SdkCall {
    /// Enumeration was requested.
    AvailableDevices,
    /// An open was attempted for the device with this serial number.
    OpenDevice(String),
    /// A handle was freed.
    FreeDevice(DeviceHandle),
    /// The info snapshot was fetched.
    DeviceInformation(DeviceHandle),
    /// The status getter was called.
    DeviceStatus(DeviceHandle),
    /// The error register was read.
    DeviceError(DeviceHandle),
    /// The capability predicate was probed.
    Supports(DeviceHandle, Capability),
    /// A telemetry getter was called.
    Telemetry(DeviceHandle, Capability),
    /// The wavelength list was fetched.
    AvailableWavelengths(DeviceHandle),
    /// The module list was fetched.
    DeviceModules(DeviceHandle),
    /// Absorbance initialize was issued.
    InitializeAbsorbance(DeviceHandle),
    /// Absorbance measure was issued.
    MeasureAbsorbance(DeviceHandle),
    /// Luminescence measure was issued.
    MeasureLuminescence(DeviceHandle),
}

/// A fully scripted device: every call's outcome is a plain field.
#[derive(Debug, Clone)]
pub struct ScriptedDevice {
    /// Enumeration descriptor.
    pub descriptor: DeviceDescriptor,
    /// Status reported by open; only `NoError` yields a handle.
    pub open_status: StatusCode,
    /// Capabilities the predicate answers `true` for.
    pub capabilities: HashSet<Capability>,
    /// Outcome of the info fetch.
    pub info: SdkResult<DeviceInfo>,
    /// Outcome of the status getter.
    pub status: SdkResult<DeviceState>,
    /// Outcome of the error-register read.
    pub error_register: SdkResult<u32>,
    /// Outcome of the uptime getter.
    pub uptime: SdkResult<u64>,
    /// Outcome of the slot getter.
    pub slot: SdkResult<SlotState>,
    /// Outcome of the alignment getter.
    pub parts_aligned: SdkResult<bool>,
    /// Outcome of the orientation getter.
    pub orientation: SdkResult<ReadoutOrientation>,
    /// Outcome of the temperature getter.
    pub temperature: SdkResult<f32>,
    /// Outcome of the humidity getter.
    pub humidity: SdkResult<f32>,
    /// Outcome of the wavelength fetch.
    pub wavelengths: SdkResult<Vec<u16>>,
    /// Outcome of the module fetch.
    pub modules: SdkResult<Vec<String>>,
    /// Status reported by absorbance initialize.
    pub initialize_status: StatusCode,
    /// Outcome of absorbance measure.
    pub absorbance: SdkResult<Vec<f64>>,
    /// Outcome of luminescence measure.
    pub luminescence: SdkResult<Vec<f64>>,
}

impl ScriptedDevice {
    /// A luminescence device with every call succeeding.
    pub fn lum96(sn: &str) -> Self {
        Self {
            descriptor: DeviceDescriptor {
                device_type: DeviceType::Luminescence96,
                sn: sn.to_string(),
                vid: 0x1234,
                pid: 0x5678,
            },
            open_status: StatusCode::NoError,
            capabilities: HashSet::from([
                Capability::Uptime,
                Capability::SlotStatus,
                Capability::PartsAligned,
                Capability::ReadoutOrientation,
                Capability::Temperature,
                Capability::Humidity,
                Capability::LuminescenceMeasurement,
            ]),
            info: Ok(DeviceInfo {
                sn: sn.to_string(),
                ref_no: "R1".to_string(),
                version: "1".to_string(),
                device_type: DeviceType::Luminescence96,
            }),
            status: Ok(DeviceState::Ok),
            error_register: Ok(0),
            uptime: Ok(3600),
            slot: Ok(SlotState::Occupied),
            parts_aligned: Ok(true),
            orientation: Ok(ReadoutOrientation::A1),
            temperature: Ok(25.0),
            humidity: Ok(40.0),
            wavelengths: Err(StatusCode::UnsupportedOperation),
            modules: Err(StatusCode::UnsupportedOperation),
            initialize_status: StatusCode::UnsupportedOperation,
            absorbance: Err(StatusCode::UnsupportedOperation),
            luminescence: Ok((0..WELL_COUNT).map(|i| i as f64).collect()),
        }
    }

    /// An absorbance device with every call succeeding. Does not support
    /// luminescence, so the connect search must reject it.
    pub fn abs96(sn: &str) -> Self {
        let wavelengths = vec![450, 560, 605, 650];
        Self {
            descriptor: DeviceDescriptor {
                device_type: DeviceType::Absorbance96,
                sn: sn.to_string(),
                vid: 0x1234,
                pid: 0x5679,
            },
            open_status: StatusCode::NoError,
            capabilities: HashSet::from([
                Capability::Uptime,
                Capability::Temperature,
                Capability::AvailableWavelengths,
                Capability::Modules,
                Capability::AbsorbanceMeasurement,
            ]),
            info: Ok(DeviceInfo {
                sn: sn.to_string(),
                ref_no: "R2".to_string(),
                version: "1".to_string(),
                device_type: DeviceType::Absorbance96,
            }),
            status: Ok(DeviceState::Ok),
            error_register: Ok(0),
            uptime: Ok(60),
            slot: Err(StatusCode::UnsupportedOperation),
            parts_aligned: Err(StatusCode::UnsupportedOperation),
            orientation: Err(StatusCode::UnsupportedOperation),
            temperature: Ok(24.0),
            humidity: Err(StatusCode::UnsupportedOperation),
            wavelengths: Ok(wavelengths),
            modules: Ok(vec!["ABS96-BASE".to_string(), "ABS96-UV".to_string()]),
            initialize_status: StatusCode::NoError,
            absorbance: Ok((0..WELL_COUNT).map(|i| i as f64 * 0.01).collect()),
            luminescence: Err(StatusCode::UnsupportedOperation),
        }
    }

    /// A luminescence device that additionally carries absorbance optics.
    pub fn combo(sn: &str) -> Self {
        let mut device = Self::lum96(sn);
        device.capabilities.insert(Capability::AvailableWavelengths);
        device.capabilities.insert(Capability::Modules);
        device.capabilities.insert(Capability::AbsorbanceMeasurement);
        device.wavelengths = Ok(vec![450, 560]);
        device.modules = Ok(vec!["ABS96-BASE".to_string()]);
        device.initialize_status = StatusCode::NoError;
        device.absorbance = Ok((0..WELL_COUNT * 2).map(|i| i as f64 * 0.01).collect());
        device
    }

    /// Removes one capability from the scripted set.
    pub fn without_capability(mut self, capability: Capability) -> Self {
        self.capabilities.remove(&capability);
        self
    }

    /// Scripts the open attempt to fail with `code`.
    pub fn failing_open(mut self, code: StatusCode) -> Self {
        self.open_status = code;
        self
    }

    /// Scripts the info fetch to fail with `code`.
    pub fn failing_info(mut self, code: StatusCode) -> Self {
        self.info = Err(code);
        self
    }
}

#[derive(Debug, Default)]
struct MockState {
    calls: Vec<SdkCall>,
    next_handle: u32,
    open: HashMap<u32, usize>,
    opened: Vec<DeviceHandle>,
    freed: Vec<DeviceHandle>,
}

/// Scripted, call-recording vendor SDK for unit tests.
pub struct MockSdk {
    devices: Vec<ScriptedDevice>,
    state: Mutex<MockState>,
}

impl MockSdk {
    /// A mock serving the given scripted devices, in enumeration order.
    pub fn new(devices: Vec<ScriptedDevice>) -> Self {
        Self {
            devices,
            state: Mutex::new(MockState {
                next_handle: 1,
                ..MockState::default()
            }),
        }
    }

    /// A mock whose enumeration is empty.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Every call recorded so far, in order.
    pub fn calls(&self) -> Vec<SdkCall> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .clone()
    }

    /// Handles issued by open, in order.
    pub fn opened_handles(&self) -> Vec<DeviceHandle> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .opened
            .clone()
    }

    /// Handles released via free, in order.
    pub fn freed_handles(&self) -> Vec<DeviceHandle> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .freed
            .clone()
    }

    /// Handles currently open (issued and not yet freed).
    pub fn live_handles(&self) -> Vec<DeviceHandle> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.open.keys().copied().map(DeviceHandle).collect()
    }

    fn record(&self, call: SdkCall) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .push(call);
    }

    fn device_for(&self, handle: DeviceHandle) -> SdkResult<&ScriptedDevice> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let index = *state.open.get(&handle.0).ok_or(StatusCode::InvalidHandle)?;
        Ok(&self.devices[index])
    }

    fn telemetry<T: Clone>(
        &self,
        handle: DeviceHandle,
        capability: Capability,
        pick: impl Fn(&ScriptedDevice) -> SdkResult<T>,
    ) -> SdkResult<T> {
        self.record(SdkCall::Telemetry(handle, capability));
        pick(self.device_for(handle)?)
    }
}

impl ReaderSdk for MockSdk {
    fn library_version(&self) -> LibraryVersion {
        LibraryVersion {
            major: 0,
            minor: 1,
            patch: 0,
        }
    }

    fn available_devices(&self) -> Vec<DeviceDescriptor> {
        self.record(SdkCall::AvailableDevices);
        self.devices.iter().map(|d| d.descriptor.clone()).collect()
    }

    fn open_device(&self, descriptor: &DeviceDescriptor) -> SdkResult<DeviceHandle> {
        self.record(SdkCall::OpenDevice(descriptor.sn.clone()));
        let index = self
            .devices
            .iter()
            .position(|d| d.descriptor.sn == descriptor.sn)
            .ok_or(StatusCode::DeviceNotFound)?;
        let device = &self.devices[index];
        if !device.open_status.is_success() {
            return Err(device.open_status);
        }
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let handle = DeviceHandle(state.next_handle);
        state.next_handle += 1;
        state.open.insert(handle.0, index);
        state.opened.push(handle);
        Ok(handle)
    }

    fn free_device(&self, handle: DeviceHandle) -> StatusCode {
        self.record(SdkCall::FreeDevice(handle));
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.freed.push(handle);
        match state.open.remove(&handle.0) {
            Some(_) => StatusCode::NoError,
            None => StatusCode::InvalidHandle,
        }
    }

    fn device_information(&self, handle: DeviceHandle) -> SdkResult<DeviceInfo> {
        self.record(SdkCall::DeviceInformation(handle));
        self.device_for(handle)?.info.clone()
    }

    fn device_status(&self, handle: DeviceHandle) -> SdkResult<DeviceState> {
        self.record(SdkCall::DeviceStatus(handle));
        self.device_for(handle)?.status
    }

    fn device_error(&self, handle: DeviceHandle) -> SdkResult<u32> {
        self.record(SdkCall::DeviceError(handle));
        self.device_for(handle)?.error_register
    }

    fn supports(&self, handle: DeviceHandle, capability: Capability) -> bool {
        self.record(SdkCall::Supports(handle, capability));
        self.device_for(handle)
            .map(|d| d.capabilities.contains(&capability))
            .unwrap_or(false)
    }

    fn device_uptime(&self, handle: DeviceHandle) -> SdkResult<u64> {
        self.telemetry(handle, Capability::Uptime, |d| d.uptime)
    }

    fn device_slot_status(&self, handle: DeviceHandle) -> SdkResult<SlotState> {
        self.telemetry(handle, Capability::SlotStatus, |d| d.slot)
    }

    fn device_parts_aligned(&self, handle: DeviceHandle) -> SdkResult<bool> {
        self.telemetry(handle, Capability::PartsAligned, |d| d.parts_aligned)
    }

    fn device_readout_orientation(&self, handle: DeviceHandle) -> SdkResult<ReadoutOrientation> {
        self.telemetry(handle, Capability::ReadoutOrientation, |d| d.orientation)
    }

    fn device_temperature(&self, handle: DeviceHandle) -> SdkResult<f32> {
        self.telemetry(handle, Capability::Temperature, |d| d.temperature)
    }

    fn device_humidity(&self, handle: DeviceHandle) -> SdkResult<f32> {
        self.telemetry(handle, Capability::Humidity, |d| d.humidity)
    }

    fn available_wavelengths(&self, handle: DeviceHandle) -> SdkResult<Vec<u16>> {
        self.record(SdkCall::AvailableWavelengths(handle));
        self.device_for(handle)?.wavelengths.clone()
    }

    fn device_modules(&self, handle: DeviceHandle) -> SdkResult<Vec<String>> {
        self.record(SdkCall::DeviceModules(handle));
        self.device_for(handle)?.modules.clone()
    }

    fn initialize_absorbance(
        &self,
        handle: DeviceHandle,
        _config: &AbsorbanceConfig,
    ) -> StatusCode {
        self.record(SdkCall::InitializeAbsorbance(handle));
        match self.device_for(handle) {
            Ok(device) => device.initialize_status,
            Err(code) => code,
        }
    }

    fn measure_absorbance(
        &self,
        handle: DeviceHandle,
        _config: &AbsorbanceConfig,
    ) -> SdkResult<Vec<f64>> {
        self.record(SdkCall::MeasureAbsorbance(handle));
        self.device_for(handle)?.absorbance.clone()
    }

    fn measure_luminescence(
        &self,
        handle: DeviceHandle,
        _config: &LuminescenceConfig,
    ) -> SdkResult<Vec<f64>> {
        self.record(SdkCall::MeasureLuminescence(handle));
        self.device_for(handle)?.luminescence.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_records_calls_in_order() {
        let sdk = MockSdk::new(vec![ScriptedDevice::lum96("SN1")]);
        let descriptor = sdk.available_devices().remove(0);
        let handle = sdk.open_device(&descriptor).unwrap();
        sdk.supports(handle, Capability::Uptime);
        assert_eq!(
            sdk.calls(),
            vec![
                SdkCall::AvailableDevices,
                SdkCall::OpenDevice("SN1".to_string()),
                SdkCall::Supports(handle, Capability::Uptime),
            ]
        );
    }

    #[test]
    fn test_failing_open_issues_no_handle() {
        let sdk = MockSdk::new(vec![
            ScriptedDevice::lum96("SN1").failing_open(StatusCode::CommunicationFailure)
        ]);
        let descriptor = sdk.available_devices().remove(0);
        assert_eq!(
            sdk.open_device(&descriptor),
            Err(StatusCode::CommunicationFailure)
        );
        assert!(sdk.opened_handles().is_empty());
        assert!(sdk.live_handles().is_empty());
    }

    #[test]
    fn test_live_handles_tracks_open_minus_freed() {
        let sdk = MockSdk::new(vec![ScriptedDevice::lum96("SN1")]);
        let descriptor = sdk.available_devices().remove(0);
        let handle = sdk.open_device(&descriptor).unwrap();
        assert_eq!(sdk.live_handles(), vec![handle]);
        sdk.free_device(handle);
        assert!(sdk.live_handles().is_empty());
        assert_eq!(sdk.freed_handles(), vec![handle]);
    }
}
