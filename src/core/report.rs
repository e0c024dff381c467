//! Outcome reporting
//!
//! Turns server OperationOutcomes into [`Issue`]s people can read, and rolls
//! per-item transfer outcomes up into a [`BatchSummary`].

use crate::adapters::fhir::models::{OperationOutcome, OutcomeIssue};
use crate::core::transfer::{BatchSummary, TransferOutcome};
use crate::domain::FhirError;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Detail text used when an issue carries neither `details.text` nor `diagnostics`
pub const NO_DETAILS: &str = "No details provided";

const UNKNOWN: &str = "unknown";

/// One issue from an OperationOutcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// `fatal`, `error`, `warning` or `information`
    pub severity: String,

    /// FHIR issue type code, e.g. `invalid` or `required`
    pub code: String,

    /// Human-readable detail text
    pub details: String,

    /// First FHIRPath expression, falling back to the first location
    pub location: Option<String>,
}

impl Issue {
    /// `fatal` or `error`
    pub fn is_error(&self) -> bool {
        matches!(self.severity.as_str(), "fatal" | "error")
    }

    /// `warning`
    pub fn is_warning(&self) -> bool {
        self.severity == "warning"
    }

    /// Lines used when printing the issue under a report header
    pub fn render_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("  - [{}] Code: {}", self.severity.to_uppercase(), self.code),
            format!("    Details: {}", self.details),
        ];
        if let Some(location) = &self.location {
            lines.push(format!("    Location: {location}"));
        }
        lines
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.code, self.details)?;
        if let Some(location) = &self.location {
            write!(f, " at {location}")?;
        }
        Ok(())
    }
}

impl From<OutcomeIssue> for Issue {
    fn from(issue: OutcomeIssue) -> Self {
        let details = issue
            .details
            .and_then(|d| d.text)
            .or(issue.diagnostics)
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| NO_DETAILS.to_string());

        let location = issue
            .expression
            .into_iter()
            .next()
            .or_else(|| issue.location.into_iter().next());

        Self {
            severity: issue.severity.unwrap_or_else(|| UNKNOWN.to_string()),
            code: issue.code.unwrap_or_else(|| UNKNOWN.to_string()),
            details,
            location,
        }
    }
}

/// Extract the issues of an OperationOutcome
///
/// # Errors
///
/// - [`FhirError::MissingField`] if `resourceType` is absent
/// - [`FhirError::TypeMismatch`] if the value is some other resource
/// - [`FhirError::MalformedJson`] if the issues do not have the expected shape
pub fn explain(outcome: &Value) -> Result<Vec<Issue>, FhirError> {
    let found = outcome
        .get("resourceType")
        .and_then(Value::as_str)
        .ok_or_else(|| FhirError::missing_field("resourceType", "OperationOutcome response"))?;

    if found != "OperationOutcome" {
        return Err(FhirError::TypeMismatch {
            expected: "OperationOutcome".to_string(),
            found: found.to_string(),
        });
    }

    let outcome: OperationOutcome = serde_json::from_value(outcome.clone())
        .map_err(|e| FhirError::malformed_json("OperationOutcome", e))?;

    Ok(outcome.issue.into_iter().map(Issue::from).collect())
}

/// Like [`explain`], for an error body that may or may not be an OperationOutcome
pub fn explain_text(body: &str) -> Option<Vec<Issue>> {
    let value: Value = serde_json::from_str(body).ok()?;
    explain(&value).ok()
}

/// Roll outcomes up into a summary
pub fn summarize(outcomes: impl IntoIterator<Item = TransferOutcome>) -> BatchSummary {
    BatchSummary::from_outcomes(outcomes)
}

/// Result of running `$validate` against one resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// `Type/id` or `Type` of the validated resource
    pub resource: String,

    /// HTTP status the server answered with, when known
    pub http_status: Option<u16>,

    /// Issues reported by the server
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    /// Number of fatal/error issues
    pub fn error_count(&self) -> usize {
        self.issues.iter().filter(|i| i.is_error()).count()
    }

    /// Number of warnings
    pub fn warning_count(&self) -> usize {
        self.issues.iter().filter(|i| i.is_warning()).count()
    }

    /// No fatal or error issues, and the server did not reject the request
    pub fn is_valid(&self) -> bool {
        let accepted = self
            .http_status
            .map_or(true, |status| (200..300).contains(&status));
        accepted && self.error_count() == 0
    }

    /// Printable report
    pub fn render(&self) -> String {
        let mut out = format!("Validation results for {}:\n", self.resource);
        if self.issues.is_empty() {
            out.push_str("  No issues reported\n");
        }
        for issue in &self.issues {
            for line in issue.render_lines() {
                out.push_str(&line);
                out.push('\n');
            }
        }
        out.push_str(&format!(
            "Result: {} ({} error(s), {} warning(s))\n",
            if self.is_valid() { "VALID" } else { "INVALID" },
            self.error_count(),
            self.warning_count()
        ));
        out
    }
}
