//! Domain error types
//!
//! This module defines the error hierarchy for Ferry.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Ferry error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum FerryError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// FHIR server and payload errors
    #[error("FHIR error: {0}")]
    Fhir(#[from] FhirError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// CSV input errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// FHIR-specific errors
///
/// Every failure a single transfer item can run into maps onto one of these
/// kinds. The transport never lets a `reqwest` error escape; it is flattened into
/// [`FhirError::NetworkFailure`] or [`FhirError::HttpStatusFailure`] with the
/// method and URL attached.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FhirError {
    /// Connection or transport level failure
    #[error("{method} {url} failed: {cause}")]
    NetworkFailure {
        method: String,
        url: String,
        cause: String,
    },

    /// Server answered with a non-2xx status
    #[error("{method} {url} returned HTTP {status}: {body}")]
    HttpStatusFailure {
        method: String,
        url: String,
        status: u16,
        body: String,
    },

    /// A file or response body that is not valid JSON
    #[error("Malformed JSON in {origin}: {cause}")]
    MalformedJson { origin: String, cause: String },

    /// A field the operation needs is absent (`resourceType`, `id`, ...)
    #[error("Missing required field '{field}' in {context}")]
    MissingField { field: String, context: String },

    /// Resource type differs from the expected filter type
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },
}

impl FhirError {
    /// Shorthand for a [`FhirError::MissingField`]
    pub fn missing_field(field: impl Into<String>, context: impl Into<String>) -> Self {
        FhirError::MissingField {
            field: field.into(),
            context: context.into(),
        }
    }

    /// Shorthand for a [`FhirError::MalformedJson`]
    pub fn malformed_json(origin: impl Into<String>, cause: impl ToString) -> Self {
        FhirError::MalformedJson {
            origin: origin.into(),
            cause: cause.to_string(),
        }
    }

    /// HTTP status code, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            FhirError::HttpStatusFailure { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response body carried by an HTTP status failure
    pub fn response_body(&self) -> Option<&str> {
        match self {
            FhirError::HttpStatusFailure { body, .. } => Some(body.as_str()),
            _ => None,
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for FerryError {
    fn from(err: std::io::Error) -> Self {
        FerryError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for FerryError {
    fn from(err: serde_json::Error) -> Self {
        FerryError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for FerryError {
    fn from(err: toml::de::Error) -> Self {
        FerryError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Conversion from csv errors
impl From<csv::Error> for FerryError {
    fn from(err: csv::Error) -> Self {
        FerryError::Csv(err.to_string())
    }
}
