//! Resource classification
//!
//! A JSON document Ferry reads, from disk or from a search response, is one
//! of three things: a single resource, a transaction Bundle, or some other
//! Bundle (searchset, collection, batch) whose entries are the payload.

use crate::adapters::fhir::models::Bundle;
use crate::domain::{FhirError, Resource};
use serde_json::Value;

/// What a JSON document turned out to be
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// Anything that is not a Bundle
    Single(Resource),

    /// A Bundle with `type = transaction`
    TransactionBundle {
        /// The Bundle itself, for atomic submission
        bundle: Resource,
        /// Entry resources, in entry order
        resources: Vec<Resource>,
        /// Number of entries, including those without a `resource`
        entry_count: usize,
    },

    /// Any other Bundle
    SearchBundle {
        /// Entry resources, in entry order
        resources: Vec<Resource>,
        /// URL of the `next` link, if any
        next_link: Option<String>,
        /// `Bundle.total`, if the server reported it
        total: Option<u64>,
    },
}

/// Classify a parsed JSON document
///
/// `origin` names the document (file name or URL) in error messages.
/// Entries without a `resource` are dropped.
///
/// # Errors
///
/// - [`FhirError::MissingField`] if the document or an entry resource has no
///   `resourceType`
/// - [`FhirError::MalformedJson`] if a Bundle's structure cannot be read
pub fn classify(value: Value, origin: &str) -> Result<Classification, FhirError> {
    let resource = Resource::from_value(value, origin)?;

    if !resource.resource_type().is_bundle() {
        return Ok(Classification::Single(resource));
    }

    let bundle: Bundle = serde_json::from_value(resource.body().clone())
        .map_err(|e| FhirError::malformed_json(origin, e))?;

    let mut resources = Vec::with_capacity(bundle.entry.len());
    for (index, entry) in bundle.entry.iter().enumerate() {
        let Some(entry_resource) = &entry.resource else {
            tracing::debug!(origin = %origin, index, "Bundle entry has no resource");
            continue;
        };
        let context = format!("{origin} entry[{index}]");
        resources.push(Resource::from_value(entry_resource.clone(), &context)?);
    }

    if bundle.is_transaction() {
        Ok(Classification::TransactionBundle {
            entry_count: bundle.entry.len(),
            bundle: resource,
            resources,
        })
    } else {
        Ok(Classification::SearchBundle {
            next_link: bundle.next_link().map(str::to_string),
            total: bundle.total,
            resources,
        })
    }
}
