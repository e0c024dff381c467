//! Core business logic for Ferry.
//!
//! # Modules
//!
//! - [`classify`] - Decide whether a JSON document is a resource, a transaction
//!   Bundle or a search Bundle
//! - [`pagination`] - Walk every page of a type-level search
//! - [`transfer`] - Apply one operation to many resources and summarize
//! - [`report`] - Explain OperationOutcomes and roll outcomes into summaries
//! - [`convert`] - Turn CSV rows into Patient resources
//!
//! # Example
//!
//! ```rust,no_run
//! use ferry::adapters::fhir::FhirClient;
//! use ferry::config::load_config_or_default;
//! use ferry::core::pagination::walk_all;
//! use ferry::core::transfer::{TransferDriver, TransferOp, TransferSource};
//! use ferry::domain::ResourceType;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config_or_default(None)?;
//! let client = Arc::new(FhirClient::new(&config.server)?);
//! let patient = ResourceType::new("Patient")?;
//!
//! // List every Patient, then delete them one by one
//! let resources = walk_all(client.as_ref(), &patient, config.transfer.page_size).await?;
//! let summary = TransferDriver::new(client)
//!     .transfer(TransferSource::Resources(resources), TransferOp::Delete, Some(&patient))
//!     .await?;
//!
//! println!("Deleted: {}", summary.succeeded);
//! println!("Failed: {}", summary.failed);
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod convert;
pub mod pagination;
pub mod report;
pub mod transfer;
