//! Error types for the plate-reader MCP server.

use thiserror::Error;

use crate::status::StatusCode;

/// Main error type for plate-reader operations.
///
/// Everything here is recovered locally and reported to the caller as a
/// descriptive outcome; nothing is fatal to the process and nothing is
/// retried automatically.
#[derive(Debug, Error)]
pub enum Error {
    /// A device is already connected; disconnect first.
    #[error("A device is already connected")]
    AlreadyConnected,

    /// No device is connected; connect first.
    #[error("Device not connected. Please connect first")]
    NotConnected,

    /// Enumeration returned no devices at all.
    #[error("No devices found")]
    NoDevicesFound,

    /// Devices were found, but none both opened and supported the required
    /// measurement family.
    #[error("No compatible device found")]
    NoCompatibleDevice,

    /// The caller supplied an unrecognized measurement mode.
    #[error("Invalid measurement mode '{0}'. Use 'SENSITIVE' or 'FAST'")]
    InvalidMode(String),

    /// The caller supplied a well selection of the wrong length.
    #[error("selected_wells must contain exactly {expected} entries, got {actual}")]
    WellCount {
        /// Required number of entries.
        expected: usize,
        /// Number of entries actually supplied.
        actual: usize,
    },

    /// The device reported no available wavelengths.
    #[error("Device reported no available wavelengths")]
    NoWavelengths,

    /// A vendor SDK call returned a non-success status code.
    #[error("{context} failed with status {code}")]
    Sdk {
        /// What was being attempted.
        context: &'static str,
        /// The non-success status code, preserved for diagnosis.
        code: StatusCode,
    },
}

impl Error {
    /// Shorthand for wrapping a non-success SDK status.
    pub fn sdk(context: &'static str, code: StatusCode) -> Self {
        Error::Sdk { context, code }
    }

    /// Whether this error was caused by invalid caller input, as opposed to
    /// session state or the device itself.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::InvalidMode(_) | Error::WellCount { .. })
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_connected_message() {
        assert_eq!(
            Error::NotConnected.to_string(),
            "Device not connected. Please connect first"
        );
    }

    #[test]
    fn test_sdk_error_preserves_code() {
        let err = Error::sdk("uptime query", StatusCode::CommunicationFailure);
        assert_eq!(
            err.to_string(),
            "uptime query failed with status COMMUNICATION_FAILURE"
        );
    }

    #[test]
    fn test_well_count_message() {
        let err = Error::WellCount {
            expected: 96,
            actual: 95,
        };
        assert_eq!(
            err.to_string(),
            "selected_wells must contain exactly 96 entries, got 95"
        );
    }

    #[test]
    fn test_validation_classification() {
        assert!(Error::InvalidMode("x".into()).is_validation());
        assert!(Error::WellCount {
            expected: 96,
            actual: 1
        }
        .is_validation());
        assert!(!Error::NotConnected.is_validation());
        assert!(!Error::sdk("x", StatusCode::UnknownError).is_validation());
    }
}
