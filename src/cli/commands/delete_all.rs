//! Delete-all command implementation
//!
//! Lists every resource of one type by walking the search pages, then deletes
//! them one at a time.

use super::{connect, parse_resource_type, print_summary, EXIT_CONFIG, EXIT_INPUT, EXIT_OK};
use crate::config::schema::MAX_PAGE_SIZE;
use crate::config::FerryConfig;
use crate::core::pagination::walk_all;
use crate::core::transfer::{TransferDriver, TransferOp, TransferSource};
use clap::Args;

/// Arguments for the delete-all command
#[derive(Args, Debug)]
pub struct DeleteAllArgs {
    /// Resource type to delete, e.g. Patient
    pub resource_type: String,

    /// Search page size (defaults to transfer.page_size)
    #[arg(long)]
    pub page_size: Option<usize>,

    /// List the resources, but do not delete them
    #[arg(long)]
    pub dry_run: bool,
}

impl DeleteAllArgs {
    /// Execute the delete-all command
    pub async fn execute(&self, config: &FerryConfig) -> anyhow::Result<i32> {
        tracing::info!(resource_type = %self.resource_type, "Starting delete-all command");

        let resource_type = match parse_resource_type(&self.resource_type) {
            Ok(resource_type) => resource_type,
            Err(e) => {
                println!("❌ {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let page_size = self.page_size.unwrap_or(config.transfer.page_size);
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            println!("❌ --page-size must be between 1 and {MAX_PAGE_SIZE}");
            return Ok(EXIT_CONFIG);
        }

        let transport = match connect(config) {
            Ok(transport) => transport,
            Err(e) => {
                println!("❌ {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        println!("🔍 Listing {resource_type} resources (page size {page_size})");
        let resources = match walk_all(transport.as_ref(), &resource_type, page_size).await {
            Ok(resources) => resources,
            Err(e) => {
                println!("❌ Listing aborted, nothing was deleted");
                println!("   Error: {e}");
                return Ok(EXIT_INPUT);
            }
        };

        if resources.is_empty() {
            tracing::info!(resource_type = %resource_type, "No {resource_type} resources found to delete");
            println!("No {resource_type} resources found to delete");
            return Ok(EXIT_OK);
        }

        println!("🗑️  Deleting {} {resource_type} resource(s)", resources.len());
        let dry_run = self.dry_run || config.application.dry_run;
        let summary = TransferDriver::new(transport)
            .with_dry_run(dry_run)
            .transfer(
                TransferSource::Resources(resources),
                TransferOp::Delete,
                Some(&resource_type),
            )
            .await?;

        print_summary(&summary);
        Ok(EXIT_OK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_resource_type() {
        let args = DeleteAllArgs {
            resource_type: "patient".to_string(),
            page_size: None,
            dry_run: false,
        };
        let code = args.execute(&FerryConfig::default()).await.unwrap();
        assert_eq!(code, EXIT_CONFIG);
    }

    #[tokio::test]
    async fn test_page_size_out_of_range() {
        let args = DeleteAllArgs {
            resource_type: "Patient".to_string(),
            page_size: Some(MAX_PAGE_SIZE + 1),
            dry_run: false,
        };
        let code = args.execute(&FerryConfig::default()).await.unwrap();
        assert_eq!(code, EXIT_CONFIG);
    }
}
