//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use super::{EXIT_CONFIG, EXIT_INPUT, EXIT_OK};
use crate::config::DEFAULT_CONFIG_PATH;
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Ferry configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG);
        }

        match fs::write(&self.output, Self::sample_config()) {
            Ok(()) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your FHIR server settings", self.output);
                println!("  2. Put credentials in a .env file (e.g. FERRY_FHIR_PASSWORD)");
                println!("  3. Validate configuration: ferry validate-config");
                println!("  4. Upload data: ferry upload --resource-type Patient");
                println!();
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(EXIT_INPUT)
            }
        }
    }

    /// Sample configuration with every option commented
    fn sample_config() -> String {
        r#"# Ferry Configuration File
# Bulk transfer of FHIR resources to and from a FHIR R4 server
#
# Every setting can be overridden with FERRY_<SECTION>_<KEY>,
# e.g. FERRY_SERVER_BASE_URL or FERRY_TRANSFER_PAGE_SIZE.
# Values may reference environment variables as ${VAR_NAME}.

[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# Classify items but never call the server
dry_run = false

[server]
# Base URL of the FHIR server
base_url = "http://localhost:8080/fhir"

# Authentication: none, basic or bearer
auth_type = "none"
# username = "ferry"
# password = "${FERRY_FHIR_PASSWORD}"
# token = "${FERRY_FHIR_TOKEN}"

# TLS certificate verification
tls_verify = true

[transfer]
# _count used when walking search results (1-1000)
page_size = 50

# Transaction bundles: "per-resource" creates each entry on its own,
# "atomic" posts the whole bundle as one transaction
transaction_mode = "per-resource"

# Parent directory with one sub-directory per resource type
data_dir = "data"

[logging]
# Write JSON logs to rolling files in addition to the console
local_enabled = false
local_path = "logs"

# Rotation: daily, hourly or never
local_rotation = "daily"
"#
        .to_string()
    }
}
