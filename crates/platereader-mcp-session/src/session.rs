//! Single-slot device session lifecycle.

use std::sync::Arc;

use tracing::{debug, info, warn};

use platereader_mcp_core::{
    Capability, DeviceHandle, DeviceInfo, Error, LibraryVersion, Result,
};
use platereader_mcp_driver::ReaderSdk;

/// The handle and the info snapshot, together or not at all.
#[derive(Debug, Clone)]
pub(crate) struct ConnectedDevice {
    pub(crate) handle: DeviceHandle,
    pub(crate) info: DeviceInfo,
}

/// The session manager: owns the at-most-one open device handle.
///
/// Two states: Disconnected (initial) and Connected. Only a successful
/// [`connect`] moves to Connected and only [`disconnect`] moves back; every
/// other operation reads the state without transitioning it, and a failed
/// connect always leaves the session Disconnected.
///
/// [`connect`]: DeviceSession::connect
/// [`disconnect`]: DeviceSession::disconnect
pub struct DeviceSession {
    pub(crate) sdk: Arc<dyn ReaderSdk>,
    pub(crate) device: Option<ConnectedDevice>,
}

impl DeviceSession {
    /// Creates a session in the Disconnected state.
    pub fn new(sdk: Arc<dyn ReaderSdk>) -> Self {
        Self { sdk, device: None }
    }

    /// Version of the vendor library. Available in any state.
    pub fn library_version(&self) -> LibraryVersion {
        self.sdk.library_version()
    }

    /// Whether a device is currently connected.
    pub fn is_connected(&self) -> bool {
        self.device.is_some()
    }

    /// The info snapshot captured at connect time.
    pub fn info(&self) -> Result<&DeviceInfo> {
        self.device
            .as_ref()
            .map(|d| &d.info)
            .ok_or(Error::NotConnected)
    }

    /// Connection guard: an error when no device is connected.
    ///
    /// Evaluated before any capability probe, input validation, or SDK call
    /// in every other operation.
    pub fn require_connected(&self) -> Result<()> {
        self.handle().map(|_| ())
    }

    /// Connection guard: the handle, or `NotConnected`.
    ///
    /// Evaluated before any capability probe or SDK call in every gated
    /// operation, so the handle is never dereferenced while absent.
    pub(crate) fn handle(&self) -> Result<DeviceHandle> {
        self.device
            .as_ref()
            .map(|d| d.handle)
            .ok_or(Error::NotConnected)
    }

    /// Finds and connects to the first attached device that opens and
    /// supports luminescence measurement.
    ///
    /// The search is linear and first-match-wins. A device that opens but
    /// lacks the required capability is freed before moving on, so the
    /// rejected path leaks no handles. If the info fetch on the chosen
    /// device fails, its handle is freed and the whole connect fails: the
    /// session never holds a handle without its info.
    pub fn connect(&mut self) -> Result<&DeviceInfo> {
        if self.device.is_some() {
            return Err(Error::AlreadyConnected);
        }

        let descriptors = self.sdk.available_devices();
        if descriptors.is_empty() {
            return Err(Error::NoDevicesFound);
        }
        debug!(count = descriptors.len(), "searching enumerated devices");

        for descriptor in &descriptors {
            let handle = match self.sdk.open_device(descriptor) {
                Ok(handle) => handle,
                Err(code) => {
                    debug!(sn = %descriptor.sn, %code, "open failed, trying next device");
                    continue;
                }
            };

            if !self
                .sdk
                .supports(handle, Capability::LuminescenceMeasurement)
            {
                debug!(sn = %descriptor.sn, "device lacks luminescence support, releasing");
                self.sdk.free_device(handle);
                continue;
            }

            return match self.sdk.device_information(handle) {
                Ok(device_info) => {
                    info!(sn = %device_info.sn, device_type = %device_info.device_type, "device connected");
                    let device = self.device.insert(ConnectedDevice {
                        handle,
                        info: device_info,
                    });
                    Ok(&device.info)
                }
                Err(code) => {
                    warn!(sn = %descriptor.sn, %code, "info fetch failed, releasing handle");
                    self.sdk.free_device(handle);
                    Err(Error::sdk("device information fetch", code))
                }
            };
        }

        Err(Error::NoCompatibleDevice)
    }

    /// Disconnects the current device.
    ///
    /// The handle is freed and both handle and info are cleared regardless
    /// of the free call's own status.
    pub fn disconnect(&mut self) -> Result<()> {
        let device = self.device.take().ok_or(Error::NotConnected)?;
        let code = self.sdk.free_device(device.handle);
        if !code.is_success() {
            warn!(%code, "free reported a non-success status during disconnect");
        }
        info!(sn = %device.info.sn, "device disconnected");
        Ok(())
    }
}
