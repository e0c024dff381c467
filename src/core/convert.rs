//! CSV to FHIR Patient conversion
//!
//! Input rows have the columns `id,given_name,family_name,gender,birth_date`.
//! Each row becomes one Patient that carries the row id as a business
//! identifier; the server assigns the logical id on create.

use crate::core::report::summarize;
use crate::core::transfer::{BatchSummary, TransferOutcome};
use crate::domain::{FerryError, Resource, Result};
use serde::Deserialize;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

/// Identifier system stamped on converted Patients
pub const PATIENT_IDENTIFIER_SYSTEM: &str = "urn:oid:1.2.36.1.2001.1005.17";

/// One CSV row
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PatientRow {
    pub id: String,
    pub given_name: String,
    pub family_name: String,
    pub gender: String,
    pub birth_date: String,
}

impl PatientRow {
    /// Build the Patient JSON for this row
    pub fn to_patient(&self) -> Value {
        json!({
            "resourceType": "Patient",
            "identifier": [{
                "system": PATIENT_IDENTIFIER_SYSTEM,
                "value": self.id
            }],
            "name": [{
                "family": self.family_name,
                "given": [self.given_name]
            }],
            "gender": self.gender,
            "birthDate": self.birth_date
        })
    }

    /// Name of the file the Patient is written to
    pub fn file_name(&self) -> String {
        format!("patient_{}.json", self.id)
    }

    /// The id must be ASCII letters, digits, `-`, `_` or `.` and not only dots
    pub fn check_id(&self) -> Result<()> {
        let valid = !self.id.is_empty()
            && self
                .id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !self.id.chars().all(|c| c == '.');
        if valid {
            Ok(())
        } else {
            Err(FerryError::Validation(format!(
                "Invalid patient id '{}'",
                self.id
            )))
        }
    }
}

/// Rows read from a CSV file
#[derive(Debug, Default)]
pub struct ConvertedRows {
    /// Rows that parsed, with their Patient resource
    pub patients: Vec<(PatientRow, Resource)>,

    /// One failed outcome per row that did not parse
    pub failures: Vec<TransferOutcome>,
}

/// Read and convert every row of `path`
///
/// # Errors
///
/// Returns [`FerryError::Io`] if the file does not exist and
/// [`FerryError::Csv`] if it cannot be opened or has no readable header.
pub fn read_patient_rows(path: &Path) -> Result<ConvertedRows> {
    if !path.is_file() {
        return Err(FerryError::Io(format!(
            "CSV file not found: {}",
            path.display()
        )));
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    reader.headers()?;

    let mut converted = ConvertedRows::default();
    for (index, record) in reader.deserialize::<PatientRow>().enumerate() {
        // Header is line 1
        let line = index + 2;
        match record {
            Ok(row) => {
                if let Err(e) = row.check_id() {
                    tracing::warn!(line, error = %e, "Skipping CSV row");
                    converted
                        .failures
                        .push(TransferOutcome::failed(format!("line {line}"), e));
                    continue;
                }
                let context = format!("{} line {line}", path.display());
                match Resource::from_value(row.to_patient(), &context) {
                    Ok(resource) => converted.patients.push((row, resource)),
                    Err(e) => converted
                        .failures
                        .push(TransferOutcome::failed(format!("line {line}"), e)),
                }
            }
            Err(e) => {
                tracing::warn!(line, error = %e, "Skipping unreadable CSV row");
                converted
                    .failures
                    .push(TransferOutcome::failed(format!("line {line}"), e));
            }
        }
    }

    tracing::info!(
        file = %path.display(),
        rows = converted.patients.len() + converted.failures.len(),
        failed = converted.failures.len(),
        "Read CSV rows"
    );
    Ok(converted)
}

/// Write each converted Patient as pretty-printed JSON into `output_dir`
///
/// The directory is created if missing. Row parse failures carried in
/// `converted` are included in the returned summary.
pub fn write_patient_files(converted: ConvertedRows, output_dir: &Path) -> Result<BatchSummary> {
    if !output_dir.exists() {
        fs::create_dir_all(output_dir)?;
        tracing::info!(dir = %output_dir.display(), "Created output directory");
    }

    let mut outcomes = Vec::with_capacity(converted.patients.len() + converted.failures.len());
    for (row, resource) in converted.patients {
        let file_name = row.file_name();
        let target = output_dir.join(&file_name);
        let written = serde_json::to_string_pretty(resource.body())
            .map_err(FerryError::from)
            .and_then(|text| fs::write(&target, text).map_err(FerryError::from));

        match written {
            Ok(()) => {
                tracing::debug!(file = %target.display(), "Saved Patient");
                outcomes.push(TransferOutcome::success(
                    file_name,
                    format!("saved to {}", target.display()),
                ));
            }
            Err(e) => outcomes.push(TransferOutcome::failed(file_name, e)),
        }
    }

    outcomes.extend(converted.failures);
    Ok(summarize(outcomes))
}
