//! Route lookup command

use anyhow::Result;
use ecoflow_lib::reference;
use serde::Serialize;

use super::Backend;
use crate::output::{print_json, print_success, OutputFormat};

#[derive(Serialize)]
struct RouteOutput {
    optimized_route: String,
}

/// Show the precomputed collection route for a zone
pub async fn optimize_route(backend: &Backend, location: &str, format: OutputFormat) -> Result<()> {
    let optimized_route = match backend {
        Backend::Local { .. } => reference::optimize_route(location)?.to_string(),
        Backend::Remote(client) => client.optimize_route(location).await?,
    };

    match format {
        OutputFormat::Json => print_json(&RouteOutput { optimized_route })?,
        OutputFormat::Table => print_success(&format!("Optimized Route: {}", optimized_route)),
    }

    Ok(())
}
