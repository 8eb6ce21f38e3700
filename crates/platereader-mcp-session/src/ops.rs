//! Capability-gated device operations.
//!
//! Every operation here follows the same contract: connection guard first,
//! then (for optional hardware) the capability probe, then the data call,
//! then status inspection. A missing capability is a routine [`Gated`]
//! outcome, not an error; a non-success status code is an error that carries
//! the code.

use tracing::{debug, info};

use platereader_mcp_core::{
    AbsorbanceConfig, Capability, DeviceHandle, DeviceState, Error, LuminescenceConfig,
    ReadoutOrientation, Result, SlotState,
};
use platereader_mcp_driver::ReaderSdk;

use crate::session::DeviceSession;

/// Outcome of a capability-gated operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Gated<T> {
    /// The device supports the feature; here is its value.
    Available(T),
    /// The device does not carry this optional feature. Routine, expected.
    Unsupported(Capability),
}

impl DeviceSession {
    /// Guard, probe, call, check: the shared shape of every gated operation.
    fn gated<T>(
        &self,
        capability: Capability,
        context: &'static str,
        call: impl FnOnce(&dyn ReaderSdk, DeviceHandle) -> platereader_mcp_core::SdkResult<T>,
    ) -> Result<Gated<T>> {
        let handle = self.handle()?;
        if !self.sdk.supports(handle, capability) {
            debug!(%capability, "not supported by this device");
            return Ok(Gated::Unsupported(capability));
        }
        call(self.sdk.as_ref(), handle)
            .map(Gated::Available)
            .map_err(|code| Error::sdk(context, code))
    }

    /// Current overall device state. Connection-guarded, never gated.
    pub fn status(&self) -> Result<DeviceState> {
        let handle = self.handle()?;
        self.sdk
            .device_status(handle)
            .map_err(|code| Error::sdk("device status query", code))
    }

    /// Current device error register. Connection-guarded, never gated.
    pub fn last_error(&self) -> Result<u32> {
        let handle = self.handle()?;
        self.sdk
            .device_error(handle)
            .map_err(|code| Error::sdk("device error query", code))
    }

    /// Uptime in seconds, if the device has an uptime counter.
    pub fn uptime(&self) -> Result<Gated<u64>> {
        self.gated(Capability::Uptime, "uptime query", |sdk, h| {
            sdk.device_uptime(h)
        })
    }

    /// Plate slot state, if the device has a slot sensor.
    pub fn slot_status(&self) -> Result<Gated<SlotState>> {
        self.gated(Capability::SlotStatus, "slot status query", |sdk, h| {
            sdk.device_slot_status(h)
        })
    }

    /// Mechanical alignment flag, if the device can report it.
    pub fn parts_aligned(&self) -> Result<Gated<bool>> {
        self.gated(
            Capability::PartsAligned,
            "parts aligned query",
            |sdk, h| sdk.device_parts_aligned(h),
        )
    }

    /// Readout orientation, if the device has the sensor.
    pub fn readout_orientation(&self) -> Result<Gated<ReadoutOrientation>> {
        self.gated(
            Capability::ReadoutOrientation,
            "readout orientation query",
            |sdk, h| sdk.device_readout_orientation(h),
        )
    }

    /// Internal temperature in Celsius, if the device has the sensor.
    pub fn temperature(&self) -> Result<Gated<f32>> {
        self.gated(Capability::Temperature, "temperature query", |sdk, h| {
            sdk.device_temperature(h)
        })
    }

    /// Relative humidity in percent, if the device has the sensor.
    pub fn humidity(&self) -> Result<Gated<f32>> {
        self.gated(Capability::Humidity, "humidity query", |sdk, h| {
            sdk.device_humidity(h)
        })
    }

    /// Wavelengths the absorbance optics can sample, if enumerable.
    pub fn available_wavelengths(&self) -> Result<Gated<Vec<u16>>> {
        self.gated(
            Capability::AvailableWavelengths,
            "wavelength query",
            |sdk, h| sdk.available_wavelengths(h),
        )
    }

    /// Identifiers of the fitted optics modules, if enumerable.
    pub fn modules(&self) -> Result<Gated<Vec<String>>> {
        self.gated(Capability::Modules, "module query", |sdk, h| {
            sdk.device_modules(h)
        })
    }

    /// Runs an absorbance measurement across every available wavelength.
    ///
    /// The device's wavelength count picks the config variant: one
    /// wavelength takes the single-measurement path, several take the
    /// multi-measurement path. Initialize must report success before the
    /// paired measure call is issued; a failed initialize means measure is
    /// never invoked.
    pub fn measure_absorbance(&self) -> Result<Gated<Vec<f64>>> {
        let handle = self.handle()?;

        if !self.sdk.supports(handle, Capability::AvailableWavelengths) {
            return Ok(Gated::Unsupported(Capability::AvailableWavelengths));
        }
        let wavelengths = self
            .sdk
            .available_wavelengths(handle)
            .map_err(|code| Error::sdk("wavelength query", code))?;

        if !self.sdk.supports(handle, Capability::AbsorbanceMeasurement) {
            return Ok(Gated::Unsupported(Capability::AbsorbanceMeasurement));
        }

        let config = AbsorbanceConfig::from_available(&wavelengths).ok_or(Error::NoWavelengths)?;
        debug!(wavelengths = wavelengths.len(), "initializing absorbance measurement");

        let code = self.sdk.initialize_absorbance(handle, &config);
        if !code.is_success() {
            return Err(Error::sdk("absorbance initialization", code));
        }

        let values = self
            .sdk
            .measure_absorbance(handle, &config)
            .map_err(|code| Error::sdk("absorbance measurement", code))?;
        info!(samples = values.len(), "absorbance measurement complete");
        Ok(Gated::Available(values))
    }

    /// Runs a luminescence measurement with the given config.
    ///
    /// Config validation (mode name, well-selection length) has already
    /// happened in [`LuminescenceConfig`]'s constructor, before any SDK
    /// call. One combined measure call; no initialize step exists for this
    /// family.
    pub fn measure_luminescence(&self, config: &LuminescenceConfig) -> Result<Gated<Vec<f64>>> {
        let outcome = self.gated(
            Capability::LuminescenceMeasurement,
            "luminescence measurement",
            |sdk, h| sdk.measure_luminescence(h, config),
        )?;
        if let Gated::Available(values) = &outcome {
            info!(wells = values.len(), mode = ?config.mode, "luminescence measurement complete");
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use platereader_mcp_core::{IntegrationMode, StatusCode, WELL_COUNT};
    use platereader_mcp_driver::testing::{MockSdk, ScriptedDevice, SdkCall};

    fn connected(devices: Vec<ScriptedDevice>) -> (Arc<MockSdk>, DeviceSession) {
        let sdk = Arc::new(MockSdk::new(devices));
        let mut session = DeviceSession::new(sdk.clone());
        session.connect().unwrap();
        (sdk, session)
    }

    fn all_wells() -> LuminescenceConfig {
        LuminescenceConfig::new(IntegrationMode::Sensitive, Some(vec![true; WELL_COUNT])).unwrap()
    }

    #[test]
    fn test_gated_ops_while_disconnected_never_touch_the_sdk() {
        let sdk = Arc::new(MockSdk::new(vec![ScriptedDevice::lum96("SN1")]));
        let session = DeviceSession::new(sdk.clone());

        assert!(matches!(session.uptime(), Err(Error::NotConnected)));
        assert!(matches!(session.temperature(), Err(Error::NotConnected)));
        assert!(matches!(session.status(), Err(Error::NotConnected)));
        assert!(matches!(
            session.measure_luminescence(&all_wells()),
            Err(Error::NotConnected)
        ));
        assert!(matches!(
            session.measure_absorbance(),
            Err(Error::NotConnected)
        ));

        // Neither the capability predicate nor any data call was invoked.
        assert!(sdk.calls().is_empty());
    }

    #[test]
    fn test_telemetry_passes_payload_through() {
        let (_sdk, session) = connected(vec![ScriptedDevice::lum96("SN1")]);
        assert_eq!(session.uptime().unwrap(), Gated::Available(3600));
        assert_eq!(session.temperature().unwrap(), Gated::Available(25.0));
        assert_eq!(
            session.slot_status().unwrap(),
            Gated::Available(SlotState::Occupied)
        );
        assert_eq!(session.status().unwrap(), DeviceState::Ok);
        assert_eq!(session.last_error().unwrap(), 0);
    }

    #[test]
    fn test_missing_capability_is_a_routine_outcome() {
        let (sdk, session) = connected(vec![
            ScriptedDevice::lum96("SN1").without_capability(Capability::Humidity),
        ]);
        let calls_before = sdk.calls().len();
        assert_eq!(
            session.humidity().unwrap(),
            Gated::Unsupported(Capability::Humidity)
        );
        // The probe ran but the data call did not.
        let new_calls = &sdk.calls()[calls_before..];
        assert_eq!(new_calls.len(), 1);
        assert!(matches!(new_calls[0], SdkCall::Supports(_, Capability::Humidity)));
    }

    #[test]
    fn test_sdk_status_errors_preserve_the_code() {
        let mut device = ScriptedDevice::lum96("SN1");
        device.uptime = Err(StatusCode::CommunicationFailure);
        let (_sdk, session) = connected(vec![device]);
        let err = session.uptime().unwrap_err();
        assert!(matches!(
            err,
            Error::Sdk {
                code: StatusCode::CommunicationFailure,
                ..
            }
        ));
        // A failed operation leaves the session connected.
        assert!(session.is_connected());
    }

    #[test]
    fn test_luminescence_measurement_passes_values_through_in_order() {
        let (_sdk, session) = connected(vec![ScriptedDevice::lum96("SN1")]);
        let values = match session.measure_luminescence(&all_wells()).unwrap() {
            Gated::Available(values) => values,
            other => panic!("expected values, got {other:?}"),
        };
        assert_eq!(values.len(), WELL_COUNT);
        let expected: Vec<f64> = (0..WELL_COUNT).map(|i| i as f64).collect();
        assert_eq!(values, expected);
    }

    #[test]
    fn test_absorbance_initialize_precedes_measure() {
        let (sdk, session) = connected(vec![ScriptedDevice::combo("SN1")]);
        let values = match session.measure_absorbance().unwrap() {
            Gated::Available(values) => values,
            other => panic!("expected values, got {other:?}"),
        };
        assert_eq!(values.len(), WELL_COUNT * 2);

        let calls = sdk.calls();
        let init_at = calls
            .iter()
            .position(|c| matches!(c, SdkCall::InitializeAbsorbance(_)))
            .expect("initialize was issued");
        let measure_at = calls
            .iter()
            .position(|c| matches!(c, SdkCall::MeasureAbsorbance(_)))
            .expect("measure was issued");
        assert!(init_at < measure_at, "initialize must precede measure");
    }

    #[test]
    fn test_failed_initialize_suppresses_measure() {
        let mut device = ScriptedDevice::combo("SN1");
        device.initialize_status = StatusCode::SlotEmpty;
        let (sdk, session) = connected(vec![device]);

        let err = session.measure_absorbance().unwrap_err();
        assert!(matches!(
            err,
            Error::Sdk {
                code: StatusCode::SlotEmpty,
                ..
            }
        ));
        assert!(!sdk
            .calls()
            .iter()
            .any(|c| matches!(c, SdkCall::MeasureAbsorbance(_))));
    }

    #[test]
    fn test_absorbance_without_wavelength_support_is_gated() {
        let (sdk, session) = connected(vec![ScriptedDevice::lum96("SN1")]);
        assert_eq!(
            session.measure_absorbance().unwrap(),
            Gated::Unsupported(Capability::AvailableWavelengths)
        );
        assert!(!sdk
            .calls()
            .iter()
            .any(|c| matches!(c, SdkCall::InitializeAbsorbance(_))));
    }

    #[test]
    fn test_absorbance_single_wavelength_takes_single_path() {
        let mut device = ScriptedDevice::combo("SN1");
        device.wavelengths = Ok(vec![450]);
        device.absorbance = Ok(vec![0.5; WELL_COUNT]);
        let (_sdk, session) = connected(vec![device]);
        let values = match session.measure_absorbance().unwrap() {
            Gated::Available(values) => values,
            other => panic!("expected values, got {other:?}"),
        };
        assert_eq!(values.len(), WELL_COUNT);
    }

    #[test]
    fn test_absorbance_with_empty_wavelength_list_is_a_device_fault() {
        let mut device = ScriptedDevice::combo("SN1");
        device.wavelengths = Ok(Vec::new());
        let (sdk, session) = connected(vec![device]);
        let err = session.measure_absorbance().unwrap_err();
        assert!(matches!(err, Error::NoWavelengths));
        assert!(!sdk
            .calls()
            .iter()
            .any(|c| matches!(c, SdkCall::InitializeAbsorbance(_))));
    }

    #[test]
    fn test_available_wavelengths_passthrough() {
        let (_sdk, session) = connected(vec![ScriptedDevice::combo("SN1")]);
        assert_eq!(
            session.available_wavelengths().unwrap(),
            Gated::Available(vec![450, 560])
        );
    }

    #[test]
    fn test_modules_passthrough() {
        let (_sdk, session) = connected(vec![ScriptedDevice::combo("SN1")]);
        assert_eq!(
            session.modules().unwrap(),
            Gated::Available(vec!["ABS96-BASE".to_string()])
        );
    }

    #[test]
    fn test_modules_without_support_never_fetches() {
        let (sdk, session) = connected(vec![ScriptedDevice::lum96("SN1")]);
        assert_eq!(
            session.modules().unwrap(),
            Gated::Unsupported(Capability::Modules)
        );
        assert!(!sdk
            .calls()
            .iter()
            .any(|c| matches!(c, SdkCall::DeviceModules(_))));
    }
}
