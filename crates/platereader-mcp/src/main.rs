//! # Plate-Reader MCP Server
//!
//! Model Context Protocol server for AI agents to operate 96-well
//! plate-reader instruments.
//!
//! ## Overview
//!
//! This server provides MCP tools for:
//! - Device lifecycle (connect, disconnect, info)
//! - Telemetry (status, error, uptime, slot, alignment, orientation,
//!   temperature, humidity)
//! - Measurements (luminescence, absorbance)
//!
//! ## Architecture
//!
//! This is Layer 3 - the main MCP server binary that ties together:
//! - platereader-mcp-core: Core types
//! - platereader-mcp-driver: Vendor SDK seam
//! - platereader-mcp-session: Device session lifecycle

use std::sync::Arc;

use rmcp::{transport::stdio, ServiceExt};

use platereader_mcp::PlateReaderServer;
use platereader_mcp_driver::SimulatedReader;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Plate-Reader MCP Server starting...");

    // The vendor library is driven through the ReaderSdk trait; this build
    // serves the deterministic simulated reader. A hardware binding slots in
    // here without touching the layers above.
    let sdk = Arc::new(SimulatedReader::lum96());
    tracing::info!("serving simulated Lum96 device");

    let server = PlateReaderServer::new(sdk);

    tracing::info!("Server initialized, starting stdio transport...");

    // Serve the MCP server over stdio
    let service = server.serve(stdio()).await.map_err(|e| {
        tracing::error!("Error starting server: {}", e);
        e
    })?;

    tracing::info!("Plate-Reader MCP Server running on stdio");

    // Wait for the service to complete
    service.waiting().await?;

    tracing::info!("Plate-Reader MCP Server shutting down");

    Ok(())
}
