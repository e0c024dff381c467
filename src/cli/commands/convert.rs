//! Convert command implementation
//!
//! Turns a CSV of patients into FHIR Patient resources and either saves them
//! as JSON files or uploads them.

use super::{connect, print_summary, EXIT_CONFIG, EXIT_INPUT, EXIT_OK};
use crate::config::FerryConfig;
use crate::core::convert::{read_patient_rows, write_patient_files};
use crate::core::transfer::{TransferDriver, TransferOp, TransferSource};
use crate::domain::ResourceType;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the convert command
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// CSV file with columns id,given_name,family_name,gender,birth_date
    #[arg(long)]
    pub input_csv: PathBuf,

    /// Directory the Patient JSON files are written to
    #[arg(long)]
    pub output_dir: PathBuf,

    /// Upload the Patients to the FHIR server instead of saving them
    #[arg(long)]
    pub upload_to_fhir: bool,

    /// Convert and classify, but do not call the server
    #[arg(long)]
    pub dry_run: bool,
}

impl ConvertArgs {
    /// Execute the convert command
    pub async fn execute(&self, config: &FerryConfig) -> anyhow::Result<i32> {
        tracing::info!(input = %self.input_csv.display(), "Starting convert command");

        println!("🔄 Converting {}", self.input_csv.display());

        let converted = match read_patient_rows(&self.input_csv) {
            Ok(converted) => converted,
            Err(e) => {
                println!("❌ {e}");
                return Ok(EXIT_INPUT);
            }
        };
        println!(
            "   {} row(s) converted, {} unreadable",
            converted.patients.len(),
            converted.failures.len()
        );

        if !self.upload_to_fhir {
            let summary = write_patient_files(converted, &self.output_dir)?;
            print_summary(&summary);
            return Ok(EXIT_OK);
        }

        let transport = match connect(config) {
            Ok(transport) => transport,
            Err(e) => {
                println!("❌ {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let dry_run = self.dry_run || config.application.dry_run;
        let driver = TransferDriver::new(transport).with_dry_run(dry_run);
        let patient = ResourceType::new("Patient").map_err(anyhow::Error::msg)?;

        let resources = converted
            .patients
            .into_iter()
            .map(|(_, resource)| resource)
            .collect();
        let mut summary = driver
            .transfer(
                TransferSource::Resources(resources),
                TransferOp::Create,
                Some(&patient),
            )
            .await?;
        for failure in converted.failures {
            summary.record(failure);
        }

        print_summary(&summary);
        Ok(EXIT_OK)
    }
}
