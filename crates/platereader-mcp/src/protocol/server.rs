//! Plate-Reader MCP Server Implementation
//!
//! This module implements the MCP server using rmcp 0.9's #[tool_router]
//! pattern. It routes MCP tool calls to the device session layer.

use std::sync::Arc;

use tokio::sync::Mutex;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    tool, tool_handler, tool_router, ErrorData as McpError,
};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use platereader_mcp_core::{Capability, Error, IntegrationMode, LuminescenceConfig};
use platereader_mcp_driver::ReaderSdk;
use platereader_mcp_session::{DeviceSession, Gated};

use crate::tools::*;

/// Plate-Reader MCP Server
///
/// Owns the single device session behind one lock, so tool calls serialize
/// all access to the vendor SDK handle.
#[derive(Clone)]
pub struct PlateReaderServer {
    /// The one device session per process
    session: Arc<Mutex<DeviceSession>>,
    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

fn mcp_error(err: Error) -> McpError {
    let code = if err.is_validation() {
        ErrorCode(-32602) // Invalid params
    } else {
        ErrorCode(-32603) // Internal error
    };
    McpError::new(code, err.to_string(), None)
}

fn json_result<T: Serialize>(response: &T) -> CallToolResult {
    CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(response)
            .unwrap_or_else(|e| format!("serialization failed: {e}")),
    )])
}

fn unsupported(capability: Capability) -> CallToolResult {
    CallToolResult::success(vec![Content::text(format!(
        "The connected device does not support {capability}."
    ))])
}

/// Folds a gated outcome into a tool result: payload on support, a routine
/// "not supported" text otherwise, an MCP error for everything else.
fn gated_result<T, R: Serialize>(
    outcome: Result<Gated<T>, Error>,
    wrap: impl FnOnce(T) -> R,
) -> Result<CallToolResult, McpError> {
    match outcome {
        Ok(Gated::Available(value)) => Ok(json_result(&wrap(value))),
        Ok(Gated::Unsupported(capability)) => {
            debug!(%capability, "capability absent on connected device");
            Ok(unsupported(capability))
        }
        Err(err) => {
            warn!(%err, "operation failed");
            Err(mcp_error(err))
        }
    }
}

#[tool_router]
impl PlateReaderServer {
    /// Create a new server over the given vendor SDK implementation.
    pub fn new(sdk: Arc<dyn ReaderSdk>) -> Self {
        Self {
            session: Arc::new(Mutex::new(DeviceSession::new(sdk))),
            tool_router: Self::tool_router(),
        }
    }

    /// Get the vendor library version
    #[tool(description = "Get the vendor plate-reader library version")]
    #[instrument(skip_all)]
    async fn get_library_version(&self) -> Result<CallToolResult, McpError> {
        let session = self.session.lock().await;
        let version = session.library_version();
        debug!(%version, "library version queried");
        Ok(json_result(&version))
    }

    /// Find and connect the first compatible device
    #[tool(
        description = "Find and connect to the first available luminescence-capable plate reader"
    )]
    #[instrument(skip_all)]
    async fn connect_device(&self) -> Result<CallToolResult, McpError> {
        info!("connect requested");
        let mut session = self.session.lock().await;
        let device_info = session.connect().map_err(|err| {
            warn!(%err, "connect failed");
            mcp_error(err)
        })?;
        Ok(json_result(&ConnectResponse {
            message: format!("Device {} connected successfully", device_info.sn),
            info: device_info.clone(),
        }))
    }

    /// Disconnect the current device
    #[tool(description = "Disconnect the currently connected device")]
    #[instrument(skip_all)]
    async fn disconnect_device(&self) -> Result<CallToolResult, McpError> {
        info!("disconnect requested");
        let mut session = self.session.lock().await;
        session.disconnect().map_err(mcp_error)?;
        Ok(json_result(&DisconnectResponse {
            message: "Device disconnected successfully".to_string(),
        }))
    }

    /// Get the cached device information snapshot
    #[tool(description = "Get the information snapshot of the connected device")]
    #[instrument(skip_all)]
    async fn get_device_info(&self) -> Result<CallToolResult, McpError> {
        let session = self.session.lock().await;
        let device_info = session.info().map_err(mcp_error)?;
        Ok(json_result(device_info))
    }

    /// Get the current device state
    #[tool(description = "Get the status of the connected device")]
    #[instrument(skip_all)]
    async fn get_device_status(&self) -> Result<CallToolResult, McpError> {
        let session = self.session.lock().await;
        let status = session.status().map_err(mcp_error)?;
        Ok(json_result(&DeviceStatusResponse {
            status: status.to_string(),
        }))
    }

    /// Get the device error register
    #[tool(description = "Get the last error reported by the connected device")]
    #[instrument(skip_all)]
    async fn get_device_error(&self) -> Result<CallToolResult, McpError> {
        let session = self.session.lock().await;
        let error = session.last_error().map_err(mcp_error)?;
        Ok(json_result(&DeviceErrorResponse {
            error: error.to_string(),
        }))
    }

    /// Get the device uptime, if supported
    #[tool(description = "Get the uptime of the connected device in seconds, if supported")]
    #[instrument(skip_all)]
    async fn get_device_uptime(&self) -> Result<CallToolResult, McpError> {
        let session = self.session.lock().await;
        gated_result(session.uptime(), |uptime_seconds| UptimeResponse {
            uptime_seconds,
        })
    }

    /// Get the plate slot status, if supported
    #[tool(description = "Get the plate slot status of the connected device, if supported")]
    #[instrument(skip_all)]
    async fn get_device_slot_status(&self) -> Result<CallToolResult, McpError> {
        let session = self.session.lock().await;
        gated_result(session.slot_status(), |slot| SlotStatusResponse {
            slot_status: slot.to_string(),
        })
    }

    /// Get the parts-aligned flag, if supported
    #[tool(description = "Get the parts aligned status of the connected device, if supported")]
    #[instrument(skip_all)]
    async fn get_device_parts_aligned(&self) -> Result<CallToolResult, McpError> {
        let session = self.session.lock().await;
        gated_result(session.parts_aligned(), |parts_aligned| {
            PartsAlignedResponse { parts_aligned }
        })
    }

    /// Get the readout orientation, if supported
    #[tool(description = "Get the readout orientation of the connected device, if supported")]
    #[instrument(skip_all)]
    async fn get_device_readout_orientation(&self) -> Result<CallToolResult, McpError> {
        let session = self.session.lock().await;
        gated_result(session.readout_orientation(), |orientation| {
            ReadoutOrientationResponse {
                readout_orientation: orientation.to_string(),
            }
        })
    }

    /// Get the internal temperature, if supported
    #[tool(description = "Get the temperature of the connected device in Celsius, if supported")]
    #[instrument(skip_all)]
    async fn get_device_temperature(&self) -> Result<CallToolResult, McpError> {
        let session = self.session.lock().await;
        gated_result(session.temperature(), |temperature_celsius| {
            TemperatureResponse {
                temperature_celsius,
            }
        })
    }

    /// Get the relative humidity, if supported
    #[tool(description = "Get the relative humidity inside the connected device, if supported")]
    #[instrument(skip_all)]
    async fn get_device_humidity(&self) -> Result<CallToolResult, McpError> {
        let session = self.session.lock().await;
        gated_result(session.humidity(), |relative_humidity_percent| {
            HumidityResponse {
                relative_humidity_percent,
            }
        })
    }

    /// Get the available absorbance wavelengths, if supported
    #[tool(
        description = "Get the wavelengths the connected device's absorbance optics can sample, if supported"
    )]
    #[instrument(skip_all)]
    async fn get_available_wavelengths(&self) -> Result<CallToolResult, McpError> {
        let session = self.session.lock().await;
        gated_result(session.available_wavelengths(), |wavelengths_nm| {
            WavelengthsResponse { wavelengths_nm }
        })
    }

    /// Get the fitted optics modules, if enumerable
    #[tool(
        description = "Get the identifiers of the optics modules fitted to the connected device, if supported"
    )]
    #[instrument(skip_all)]
    async fn get_device_modules(&self) -> Result<CallToolResult, McpError> {
        let session = self.session.lock().await;
        gated_result(session.modules(), |modules| ModulesResponse { modules })
    }

    /// Run an absorbance measurement across all available wavelengths
    #[tool(
        description = "Perform an absorbance measurement across every wavelength the device offers, if supported"
    )]
    #[instrument(skip_all)]
    async fn measure_absorbance(&self) -> Result<CallToolResult, McpError> {
        info!("absorbance measurement requested");
        let session = self.session.lock().await;
        gated_result(session.measure_absorbance(), |measurement| {
            MeasurementResponse { measurement }
        })
    }

    /// Run a luminescence measurement
    #[tool(
        description = "Perform a luminescence measurement. Mode is 'SENSITIVE' or 'FAST'; selected_wells is an optional list of exactly 96 booleans"
    )]
    #[instrument(skip_all)]
    async fn measure(
        &self,
        Parameters(params): Parameters<MeasureParams>,
    ) -> Result<CallToolResult, McpError> {
        info!(mode = %params.mode, "luminescence measurement requested");

        let session = self.session.lock().await;
        session.require_connected().map_err(mcp_error)?;

        // Input validation happens before any capability probe or SDK call.
        let mode: IntegrationMode = params.mode.parse().map_err(mcp_error)?;
        let config =
            LuminescenceConfig::new(mode, params.selected_wells).map_err(mcp_error)?;

        gated_result(session.measure_luminescence(&config), |measurement| {
            MeasurementResponse { measurement }
        })
    }
}

// Implement the ServerHandler trait to define server capabilities
#[tool_handler]
impl rmcp::ServerHandler for PlateReaderServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Plate-Reader MCP Server - Operate a 96-well plate reader. \
                 Use connect_device to claim the instrument, the get_device_* tools for \
                 telemetry (optional sensors answer 'not supported'), measure for a \
                 luminescence read, measure_absorbance for an absorbance read, and \
                 disconnect_device when done."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
