//! MCP tool parameter and response types.
//!
//! Parameter structs drive the JSON schemas advertised to clients; response
//! structs are serialized into the tool result text.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use platereader_mcp_core::DeviceInfo;

// =============================================================================
// Session tools
// =============================================================================

/// Response for connect_device
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ConnectResponse {
    /// Success message
    pub message: String,

    /// Information snapshot of the connected device
    pub info: DeviceInfo,
}

/// Response for disconnect_device
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DisconnectResponse {
    /// Success message
    pub message: String,
}

// =============================================================================
// Telemetry tools
// =============================================================================

/// Response for get_device_status
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DeviceStatusResponse {
    /// Current device state
    pub status: String,
}

/// Response for get_device_error
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DeviceErrorResponse {
    /// Current value of the device error register
    pub error: String,
}

/// Response for get_device_uptime
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UptimeResponse {
    /// Uptime in seconds
    pub uptime_seconds: u64,
}

/// Response for get_device_slot_status
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SlotStatusResponse {
    /// Plate slot state
    pub slot_status: String,
}

/// Response for get_device_parts_aligned
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PartsAlignedResponse {
    /// Whether the mechanical parts are aligned
    pub parts_aligned: bool,
}

/// Response for get_device_readout_orientation
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReadoutOrientationResponse {
    /// Readout orientation
    pub readout_orientation: String,
}

/// Response for get_device_temperature
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TemperatureResponse {
    /// Internal temperature in degrees Celsius
    pub temperature_celsius: f32,
}

/// Response for get_device_humidity
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HumidityResponse {
    /// Relative humidity in percent
    pub relative_humidity_percent: f32,
}

/// Response for get_available_wavelengths
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WavelengthsResponse {
    /// Wavelengths the absorbance optics can sample, in nanometers
    pub wavelengths_nm: Vec<u16>,
}

/// Response for get_device_modules
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ModulesResponse {
    /// Identifiers of the optics modules fitted to the device
    pub modules: Vec<String>,
}

// =============================================================================
// Measurement tools
// =============================================================================

/// Parameters for measure (luminescence)
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MeasureParams {
    /// Integration mode: "SENSITIVE" or "FAST" (case-insensitive)
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Optional well selection: exactly 96 booleans, one per plate well.
    /// Omitted means every well is selected.
    #[serde(default)]
    pub selected_wells: Option<Vec<bool>>,
}

fn default_mode() -> String {
    "SENSITIVE".to_string()
}

impl Default for MeasureParams {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            selected_wells: None,
        }
    }
}

/// Response for measure and measure_absorbance
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MeasurementResponse {
    /// Measured values in device order (one per well, or per well/channel
    /// combination for multi-wavelength absorbance)
    pub measurement: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_params_defaults() {
        let params: MeasureParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.mode, "SENSITIVE");
        assert!(params.selected_wells.is_none());
    }

    #[test]
    fn test_measure_params_accepts_explicit_wells() {
        let json = serde_json::json!({
            "mode": "fast",
            "selected_wells": [true, false, true],
        });
        let params: MeasureParams = serde_json::from_value(json).unwrap();
        assert_eq!(params.mode, "fast");
        assert_eq!(params.selected_wells.unwrap().len(), 3);
    }
}
