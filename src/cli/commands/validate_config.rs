//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Ferry configuration file.

use super::{EXIT_CONFIG, EXIT_OK};
use crate::cli::resolve_config;
use crate::config::{AuthType, DEFAULT_CONFIG_PATH};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateConfigArgs {}

impl ValidateConfigArgs {
    /// Execute the validate-config command
    pub fn execute(&self, config_path: Option<&str>, base_url: Option<&str>) -> anyhow::Result<i32> {
        let shown_path = config_path.unwrap_or(DEFAULT_CONFIG_PATH);
        tracing::info!(config_path = %shown_path, "Validating configuration");

        println!("🔍 Validating configuration file: {shown_path}");
        println!();

        let config = match resolve_config(config_path, base_url) {
            Ok(config) => {
                println!("✅ Configuration is valid");
                config
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(EXIT_CONFIG);
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!("  FHIR Server: {}", config.server.base_url);
        println!("  Auth Type: {}", config.server.auth_type);
        if config.server.auth_type == AuthType::Basic {
            println!(
                "  Username: {}",
                config.server.username.as_deref().unwrap_or("")
            );
        }
        println!("  TLS Verify: {}", config.server.tls_verify);
        println!("  Page Size: {}", config.transfer.page_size);
        println!("  Transaction Mode: {}", config.transfer.transaction_mode);
        println!("  Data Directory: {}", config.transfer.data_dir);
        if config.logging.local_enabled {
            println!(
                "  File Logging: {} ({})",
                config.logging.local_path, config.logging.local_rotation
            );
        }
        println!();
        Ok(EXIT_OK)
    }
}
