//! FHIR adapter implementation
//!
//! This module provides the transport to FHIR R4 REST servers: the
//! `FhirTransport` trait, its reqwest implementation, and the wire models for
//! the Bundle and OperationOutcome structures Ferry inspects.

pub mod client;
pub mod models;
pub mod transport;

pub use client::{FhirClient, FHIR_JSON};
pub use models::{Bundle, BundleEntry, BundleLink, OperationOutcome, OutcomeIssue};
pub use transport::{FhirResponse, FhirTransport, HttpMethod};
