//! # platereader-mcp-core
//!
//! Core types for the plate-reader MCP server.
//!
//! This crate contains all fundamental types with **no internal dependencies**
//! on other platereader-mcp crates. It provides:
//!
//! - Vendor status codes and the `SdkResult` alias
//! - Device metadata types (descriptors, info snapshots, handles)
//! - Capability flags for optional hardware features
//! - Measurement configuration types (absorbance, luminescence)
//! - Error types
//!
//! ## Architecture
//!
//! This is Layer 0 in the architecture - all other crates depend on this one,
//! but this crate has no dependencies on other platereader-mcp crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod capability;
pub mod device;
pub mod error;
pub mod measurement;
pub mod status;

pub use capability::Capability;
pub use device::{
    DeviceDescriptor, DeviceHandle, DeviceInfo, DeviceState, DeviceType, LibraryVersion,
    ReadoutOrientation, SlotState,
};
pub use error::{Error, Result};
pub use measurement::{
    AbsorbanceConfig, IntegrationMode, LuminescenceConfig, WELL_COUNT,
};
pub use status::{SdkResult, StatusCode};
