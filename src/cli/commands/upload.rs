//! Upload command implementation
//!
//! Uploads a directory of JSON files for one resource type, or explicit files,
//! through the transfer driver.

use super::{connect, parse_resource_type, print_summary, EXIT_CONFIG, EXIT_INPUT, EXIT_OK};
use crate::config::FerryConfig;
use crate::core::transfer::{TransactionMode, TransferDriver, TransferSource};
use crate::domain::ResourceType;
use clap::Args;
use std::path::PathBuf;
use std::str::FromStr;

/// Arguments for the upload command
#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Parent directory with one sub-directory per resource type
    /// (defaults to transfer.data_dir)
    #[arg(long, conflicts_with = "file")]
    pub data_dir: Option<PathBuf>,

    /// Resource type to upload; also filters out resources of other types
    #[arg(long, required_unless_present = "file")]
    pub resource_type: Option<String>,

    /// Upload this file (repeatable)
    #[arg(long)]
    pub file: Vec<PathBuf>,

    /// Transaction bundle handling: per-resource or atomic
    #[arg(long)]
    pub mode: Option<String>,

    /// Classify files, but do not call the server
    #[arg(long)]
    pub dry_run: bool,
}

impl UploadArgs {
    /// Execute the upload command
    pub async fn execute(&self, config: &FerryConfig) -> anyhow::Result<i32> {
        tracing::info!("Starting upload command");

        let mode = match &self.mode {
            Some(mode) => match TransactionMode::from_str(mode) {
                Ok(mode) => {
                    tracing::info!(mode = %mode, "Overriding transaction mode from CLI");
                    mode
                }
                Err(e) => {
                    println!("❌ {e}");
                    return Ok(EXIT_CONFIG);
                }
            },
            None => config.transfer.transaction_mode,
        };

        let expected: Option<ResourceType> = match &self.resource_type {
            Some(name) => match parse_resource_type(name) {
                Ok(resource_type) => Some(resource_type),
                Err(e) => {
                    println!("❌ {e}");
                    return Ok(EXIT_CONFIG);
                }
            },
            None => None,
        };

        let source = self.source(config, expected.as_ref());
        println!("📤 Uploading {} ({mode} mode)", source.describe());

        let transport = match connect(config) {
            Ok(transport) => transport,
            Err(e) => {
                println!("❌ {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let dry_run = self.dry_run || config.application.dry_run;
        let driver = TransferDriver::new(transport).with_dry_run(dry_run);

        match driver
            .transfer(source, mode.upload_op(), expected.as_ref())
            .await
        {
            Ok(summary) => {
                print_summary(&summary);
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("❌ {e}");
                Ok(EXIT_INPUT)
            }
        }
    }

    /// Explicit files win; otherwise `<data_dir>/<resource_type>`
    fn source(&self, config: &FerryConfig, expected: Option<&ResourceType>) -> TransferSource {
        if !self.file.is_empty() {
            return TransferSource::Files(self.file.clone());
        }

        let parent = self
            .data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.transfer.data_dir));
        match expected {
            Some(resource_type) => TransferSource::Directory(parent.join(resource_type.as_str())),
            None => TransferSource::Directory(parent),
        }
    }
}
