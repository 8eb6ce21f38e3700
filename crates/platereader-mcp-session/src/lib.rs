//! # platereader-mcp-session
//!
//! Device session lifecycle for the plate-reader MCP server.
//!
//! [`DeviceSession`] owns the single open device handle: it runs the
//! find-a-compatible-device search at connect, keeps the handle and the
//! information snapshot together, and tears both down at disconnect. Every
//! other operation goes through its connection guard and, where the feature
//! is optional hardware, through a capability probe first.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ops;
pub mod session;

pub use ops::Gated;
pub use session::DeviceSession;
