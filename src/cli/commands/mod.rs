//! CLI command implementations
//!
//! Commands return the process exit code: 0 when the command ran (even if
//! some items failed), 1 for missing inputs or arguments and for an aborted
//! search walk, and 2 for configuration errors.

pub mod convert;
pub mod delete_all;
pub mod init;
pub mod upload;
pub mod validate;
pub mod validate_config;

use crate::adapters::fhir::{FhirClient, FhirTransport};
use crate::config::FerryConfig;
use crate::core::transfer::BatchSummary;
use crate::domain::{FerryError, ResourceType, Result};
use std::sync::Arc;

/// Exit code for a command that ran to completion
pub const EXIT_OK: i32 = 0;

/// Exit code for missing inputs or an aborted walk
pub const EXIT_INPUT: i32 = 1;

/// Exit code for configuration errors
pub const EXIT_CONFIG: i32 = 2;

/// Build the transport for the configured server
pub(crate) fn connect(config: &FerryConfig) -> Result<Arc<dyn FhirTransport>> {
    let client = FhirClient::new(&config.server)?;
    tracing::info!(base_url = %client.base_url(), "Using FHIR server");
    Ok(Arc::new(client))
}

/// Parse a resource type given on the command line
pub(crate) fn parse_resource_type(name: &str) -> Result<ResourceType> {
    ResourceType::new(name).map_err(FerryError::Validation)
}

/// Print a batch summary
pub(crate) fn print_summary(summary: &BatchSummary) {
    println!();
    print!("{}", summary.render());
    println!();
    if summary.is_successful() {
        println!("✅ Completed without failures");
    } else {
        println!("⚠️  Completed with {} failure(s)", summary.failed);
    }
}
