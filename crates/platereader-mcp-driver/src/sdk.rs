//! The `ReaderSdk` trait: the vendor library surface the session layer
//! consumes.

use platereader_mcp_core::{
    AbsorbanceConfig, Capability, DeviceDescriptor, DeviceHandle, DeviceInfo, DeviceState,
    LibraryVersion, LuminescenceConfig, ReadoutOrientation, SdkResult, SlotState, StatusCode,
};

/// The vendor plate-reader SDK, behind a trait.
///
/// Calls are blocking and not cancellable once issued; the session layer
/// serializes access to them. Handles issued by [`open_device`] are only
/// valid until the matching [`free_device`].
///
/// [`open_device`]: ReaderSdk::open_device
/// [`free_device`]: ReaderSdk::free_device
pub trait ReaderSdk: Send + Sync {
    /// Version of the vendor library. Always available, even with no device
    /// attached.
    fn library_version(&self) -> LibraryVersion;

    /// Enumerates currently attached devices.
    fn available_devices(&self) -> Vec<DeviceDescriptor>;

    /// Opens the device behind a descriptor, yielding a handle.
    fn open_device(&self, descriptor: &DeviceDescriptor) -> SdkResult<DeviceHandle>;

    /// Releases a handle. The status is informational; callers clear their
    /// own state regardless of it.
    fn free_device(&self, handle: DeviceHandle) -> StatusCode;

    /// Fetches the device information snapshot.
    fn device_information(&self, handle: DeviceHandle) -> SdkResult<DeviceInfo>;

    /// Current overall device state.
    fn device_status(&self, handle: DeviceHandle) -> SdkResult<DeviceState>;

    /// Current value of the device error register.
    fn device_error(&self, handle: DeviceHandle) -> SdkResult<u32>;

    /// Whether the open device supports an optional capability.
    ///
    /// Probed before every capability-gated call; the answer is never cached
    /// since hardware configuration can change between connects.
    fn supports(&self, handle: DeviceHandle, capability: Capability) -> bool;

    /// Uptime in seconds.
    fn device_uptime(&self, handle: DeviceHandle) -> SdkResult<u64>;

    /// Plate slot state.
    fn device_slot_status(&self, handle: DeviceHandle) -> SdkResult<SlotState>;

    /// Whether the mechanical parts are aligned.
    fn device_parts_aligned(&self, handle: DeviceHandle) -> SdkResult<bool>;

    /// Readout orientation.
    fn device_readout_orientation(&self, handle: DeviceHandle) -> SdkResult<ReadoutOrientation>;

    /// Internal temperature in degrees Celsius.
    fn device_temperature(&self, handle: DeviceHandle) -> SdkResult<f32>;

    /// Relative humidity in percent.
    fn device_humidity(&self, handle: DeviceHandle) -> SdkResult<f32>;

    /// Wavelengths (nm) the absorbance optics can sample.
    fn available_wavelengths(&self, handle: DeviceHandle) -> SdkResult<Vec<u16>>;

    /// Identifiers of the optics modules fitted to the device.
    fn device_modules(&self, handle: DeviceHandle) -> SdkResult<Vec<String>>;

    /// Prepares the optics for an absorbance measurement.
    ///
    /// Must be issued, and report success, before [`measure_absorbance`] is
    /// called with the same config.
    ///
    /// [`measure_absorbance`]: ReaderSdk::measure_absorbance
    fn initialize_absorbance(&self, handle: DeviceHandle, config: &AbsorbanceConfig)
        -> StatusCode;

    /// Runs the absorbance measurement initialized with `config`, returning
    /// one value per well/channel combination in device order.
    fn measure_absorbance(
        &self,
        handle: DeviceHandle,
        config: &AbsorbanceConfig,
    ) -> SdkResult<Vec<f64>>;

    /// Runs a luminescence measurement, returning one intensity per well in
    /// device order. No separate initialize step exists for this family.
    fn measure_luminescence(
        &self,
        handle: DeviceHandle,
        config: &LuminescenceConfig,
    ) -> SdkResult<Vec<f64>>;
}
