//! FHIR resource wrapper
//!
//! Ferry does not model FHIR content. A [`Resource`] is the parsed JSON body plus
//! the two fields every transfer needs: `resourceType` and the optional logical
//! `id`. Everything else is carried through untouched.

use super::errors::FhirError;
use super::ids::{ResourceId, ResourceType};
use serde_json::Value;
use std::fmt;

/// An opaque FHIR resource identified by `(resourceType, id?)`
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    resource_type: ResourceType,
    id: Option<ResourceId>,
    body: Value,
}

impl Resource {
    /// Build a resource from a parsed JSON value
    ///
    /// `context` names where the value came from (file name, URL, bundle entry)
    /// and is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError::MissingField`] if the value is not an object or has no
    /// usable `resourceType`.
    pub fn from_value(body: Value, context: &str) -> Result<Self, FhirError> {
        let type_name = body
            .get("resourceType")
            .and_then(Value::as_str)
            .ok_or_else(|| FhirError::missing_field("resourceType", context))?;

        let resource_type = ResourceType::new(type_name).map_err(|e| {
            FhirError::missing_field("resourceType", format!("{context} ({e})"))
        })?;

        let id = match body.get("id").and_then(Value::as_str) {
            Some(raw) => match ResourceId::new(raw) {
                Ok(id) => Some(id),
                Err(e) => {
                    tracing::debug!(context = %context, error = %e, "Ignoring unusable resource id");
                    None
                }
            },
            None => None,
        };

        Ok(Self {
            resource_type,
            id,
            body,
        })
    }

    /// The resource's `resourceType`
    pub fn resource_type(&self) -> &ResourceType {
        &self.resource_type
    }

    /// The resource's logical id, absent before creation
    pub fn id(&self) -> Option<&ResourceId> {
        self.id.as_ref()
    }

    /// The full JSON body
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Consumes self and returns the JSON body
    pub fn into_body(self) -> Value {
        self.body
    }

    /// Whether the resource has the given type
    pub fn is_type(&self, resource_type: &ResourceType) -> bool {
        &self.resource_type == resource_type
    }

    /// `Type/id` when an id is present, otherwise just `Type`
    pub fn reference(&self) -> String {
        match &self.id {
            Some(id) => format!("{}/{}", self.resource_type, id),
            None => self.resource_type.to_string(),
        }
    }

    /// Require an id, as delete and read do
    pub fn require_id(&self) -> Result<&ResourceId, FhirError> {
        self.id
            .as_ref()
            .ok_or_else(|| FhirError::missing_field("id", self.resource_type.as_str()))
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reference())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_with_id() {
        let resource =
            Resource::from_value(json!({"resourceType": "Patient", "id": "p1"}), "test").unwrap();
        assert_eq!(resource.resource_type().as_str(), "Patient");
        assert_eq!(resource.id().map(|id| id.as_str()), Some("p1"));
        assert_eq!(resource.reference(), "Patient/p1");
    }

    #[test]
    fn test_from_value_without_id() {
        let resource =
            Resource::from_value(json!({"resourceType": "Observation"}), "test").unwrap();
        assert!(resource.id().is_none());
        assert_eq!(resource.reference(), "Observation");
        assert!(matches!(
            resource.require_id(),
            Err(FhirError::MissingField { ref field, .. }) if field == "id"
        ));
    }

    #[test]
    fn test_from_value_missing_resource_type() {
        let err = Resource::from_value(json!({"id": "p1"}), "patient.json").unwrap_err();
        assert_eq!(
            err,
            FhirError::missing_field("resourceType", "patient.json")
        );
    }

    #[test]
    fn test_from_value_non_object() {
        let err = Resource::from_value(json!([1, 2, 3]), "array.json").unwrap_err();
        assert!(matches!(err, FhirError::MissingField { .. }));
    }

    #[test]
    fn test_body_is_preserved() {
        let body = json!({
            "resourceType": "Patient",
            "name": [{"family": "Doe", "given": ["John"]}],
            "birthDate": "1980-05-15"
        });
        let resource = Resource::from_value(body.clone(), "test").unwrap();
        assert_eq!(resource.body(), &body);
        assert_eq!(resource.into_body(), body);
    }
}
