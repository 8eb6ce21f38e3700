//! # platereader-mcp-driver
//!
//! The vendor SDK seam for the plate-reader MCP server.
//!
//! The vendor library is an opaque native SDK: enumeration, open/free,
//! per-feature support predicates, telemetry getters, and the two
//! measurement families, every call reporting a status code next to its
//! payload. [`ReaderSdk`] models that surface as a trait so the session
//! layer never depends on the concrete binding.
//!
//! Implementations in this crate:
//! - [`SimulatedReader`] - a deterministic in-process device, served by the
//!   default binary and used as the integration-test fixture.
//! - [`testing::MockSdk`] - a scripted, call-recording implementation for
//!   unit tests.
//!
//! A real vendor FFI binding plugs in behind [`ReaderSdk`] without touching
//! the layers above.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod sdk;
pub mod simulated;
pub mod testing;

pub use sdk::ReaderSdk;
pub use simulated::SimulatedReader;
