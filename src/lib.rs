// Ferry - FHIR bulk transfer tool
// Copyright (c) 2025 Ferry Contributors
// Licensed under the MIT License

//! # Ferry - FHIR bulk transfer
//!
//! Ferry moves FHIR R4 resources between local JSON files and a FHIR server:
//! bulk upload, bulk delete, server-side validation, and CSV to Patient
//! conversion.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Classification, pagination, the transfer driver and reporting
//! - [`adapters`] - The FHIR HTTP transport
//! - [`domain`] - Resource types, identifiers and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ferry::adapters::fhir::FhirClient;
//! use ferry::config::load_config_or_default;
//! use ferry::core::transfer::{TransferDriver, TransferSource};
//! use ferry::domain::ResourceType;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config_or_default(None)?;
//!     let client = Arc::new(FhirClient::new(&config.server)?);
//!     let patient = ResourceType::new("Patient")?;
//!
//!     let summary = TransferDriver::new(client)
//!         .transfer(
//!             TransferSource::Directory("data/Patient".into()),
//!             config.transfer.transaction_mode.upload_op(),
//!             Some(&patient),
//!         )
//!         .await?;
//!
//!     println!("Uploaded {} of {}", summary.succeeded, summary.attempted);
//!     Ok(())
//! }
//! ```
//!
//! ## Transaction Bundles
//!
//! A transaction Bundle is either decomposed and its entries created one by
//! one (`per-resource`), or posted whole to the base URL so the server
//! commits all entries or none (`atomic`).
//!
//! ## Error Handling
//!
//! Per-item problems are [`domain::FhirError`]s recorded in the batch summary;
//! everything that stops a command is a [`domain::FerryError`].
//!
//! ```rust,no_run
//! use ferry::domain::FerryError;
//!
//! fn example() -> Result<(), FerryError> {
//!     let config = ferry::config::load_config("ferry.toml")?;
//!     println!("{}", config.server.base_url);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
