//! Validate command implementation
//!
//! Sends one resource file to the server's `$validate` operation and prints the
//! issues it reports.

use super::{connect, EXIT_CONFIG, EXIT_INPUT, EXIT_OK};
use crate::config::FerryConfig;
use crate::core::report::ValidationReport;
use crate::core::transfer::driver::validate_resource;
use crate::domain::{FhirError, Resource};
use clap::Args;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// JSON file holding the resource to validate
    #[arg(long)]
    pub file: PathBuf,
}

impl ValidateArgs {
    /// Execute the validate command
    pub async fn execute(&self, config: &FerryConfig) -> anyhow::Result<i32> {
        tracing::info!(file = %self.file.display(), "Starting validate command");

        let resource = match self.load_resource() {
            Ok(resource) => resource,
            Err(message) => {
                println!("❌ {message}");
                return Ok(EXIT_INPUT);
            }
        };

        let transport = match connect(config) {
            Ok(transport) => transport,
            Err(e) => {
                println!("❌ {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        println!("🔍 Validating {} from {}", resource, self.file.display());

        match validate_resource(transport.as_ref(), &resource).await {
            Ok(report) => print_report(&report),
            Err(e) => {
                tracing::warn!(error = %e, "Validation request failed");
                println!("❌ Validation request failed");
                println!("   Error: {e}");
            }
        }
        Ok(EXIT_OK)
    }

    fn load_resource(&self) -> Result<Resource, String> {
        if !self.file.is_file() {
            return Err(format!("File not found: {}", self.file.display()));
        }

        let origin = self.file.display().to_string();
        let text = fs::read_to_string(&self.file)
            .map_err(|e| format!("Failed to read {origin}: {e}"))?;
        let value: Value = serde_json::from_str(&text)
            .map_err(|e| FhirError::malformed_json(&origin, e).to_string())?;
        Resource::from_value(value, &origin).map_err(|e| e.to_string())
    }
}

fn print_report(report: &ValidationReport) {
    println!();
    if report.issues.is_empty() && report.is_valid() {
        println!("Validation successful: No issues found.");
        return;
    }
    print!("{}", report.render());
}
