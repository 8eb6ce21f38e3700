//! Vendor SDK status codes.
//!
//! Every call into the vendor library reports a status code alongside its
//! payload. [`StatusCode::NoError`] is the single success sentinel; every
//! other value is an error detail that must be surfaced, never dropped.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Status code reported by the vendor SDK for every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusCode {
    /// The call completed successfully. The only success value.
    NoError,
    /// Unclassified failure inside the vendor library.
    UnknownError,
    /// The requested device disappeared between enumeration and open.
    DeviceNotFound,
    /// The supplied handle does not refer to an open device.
    InvalidHandle,
    /// The device was closed while the call was in flight.
    DeviceClosed,
    /// The device does not implement the requested operation.
    UnsupportedOperation,
    /// USB-level communication with the device failed.
    CommunicationFailure,
    /// A configuration value was rejected by the device.
    InvalidArgument,
    /// The measurement itself failed (optics, plate, or timing).
    MeasurementFailure,
    /// The plate slot is empty when a plate is required.
    SlotEmpty,
}

impl StatusCode {
    /// Whether this code is the success sentinel.
    pub fn is_success(self) -> bool {
        self == StatusCode::NoError
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatusCode::NoError => "NO_ERROR",
            StatusCode::UnknownError => "UNKNOWN_ERROR",
            StatusCode::DeviceNotFound => "DEVICE_NOT_FOUND",
            StatusCode::InvalidHandle => "INVALID_HANDLE",
            StatusCode::DeviceClosed => "DEVICE_CLOSED",
            StatusCode::UnsupportedOperation => "UNSUPPORTED_OPERATION",
            StatusCode::CommunicationFailure => "COMMUNICATION_FAILURE",
            StatusCode::InvalidArgument => "INVALID_ARGUMENT",
            StatusCode::MeasurementFailure => "MEASUREMENT_FAILURE",
            StatusCode::SlotEmpty => "SLOT_EMPTY",
        };
        f.write_str(name)
    }
}

/// Result of a vendor SDK call: the payload on success, the non-success
/// status code otherwise.
///
/// Modeling the SDK's (status, payload) pairs this way makes it impossible
/// to read a payload without having checked the status first.
pub type SdkResult<T> = std::result::Result<T, StatusCode>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_error_is_success() {
        assert!(StatusCode::NoError.is_success());
    }

    #[test]
    fn test_other_codes_are_not_success() {
        for code in [
            StatusCode::UnknownError,
            StatusCode::DeviceNotFound,
            StatusCode::InvalidHandle,
            StatusCode::DeviceClosed,
            StatusCode::UnsupportedOperation,
            StatusCode::CommunicationFailure,
            StatusCode::InvalidArgument,
            StatusCode::MeasurementFailure,
            StatusCode::SlotEmpty,
        ] {
            assert!(!code.is_success(), "{code} should not be success");
        }
    }

    #[test]
    fn test_display_uses_sdk_names() {
        assert_eq!(StatusCode::NoError.to_string(), "NO_ERROR");
        assert_eq!(
            StatusCode::CommunicationFailure.to_string(),
            "COMMUNICATION_FAILURE"
        );
    }
}
