//! Domain identifier types with validation
//!
//! This module provides newtype wrappers for the two identifiers that address a
//! FHIR resource on a server: its `resourceType` and its logical `id`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// FHIR resource type newtype wrapper
///
/// Resource type names are ASCII alphanumeric and start with an uppercase letter
/// (`Patient`, `Observation`, `Bundle`, ...). They end up verbatim in request
/// paths, so anything else is rejected up front.
///
/// # Examples
///
/// ```
/// use ferry::domain::ids::ResourceType;
/// use std::str::FromStr;
///
/// let resource_type = ResourceType::from_str("Patient").unwrap();
/// assert_eq!(resource_type.as_str(), "Patient");
/// assert!(ResourceType::from_str("patient/1").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceType(String);

impl ResourceType {
    /// Creates a new ResourceType from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(ResourceType)` if the name is valid, `Err` otherwise
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err("Resource type cannot be empty".to_string());
        }

        let mut chars = name.chars();
        let starts_upper = chars.next().is_some_and(|c| c.is_ascii_uppercase());
        if !starts_upper || !chars.all(|c| c.is_ascii_alphanumeric()) {
            return Err(format!(
                "Invalid resource type '{name}'. Expected an alphanumeric name starting with an uppercase letter"
            ));
        }

        Ok(Self(name))
    }

    /// Returns the resource type as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Whether this is the `Bundle` type
    pub fn is_bundle(&self) -> bool {
        self.0 == "Bundle"
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ResourceType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// FHIR logical id newtype wrapper
///
/// Server-assigned ids are placed into `{type}/{id}` paths, so path separators,
/// whitespace and the empty string are rejected.
///
/// # Examples
///
/// ```
/// use ferry::domain::ids::ResourceId;
/// use std::str::FromStr;
///
/// let id = ResourceId::from_str("example-123").unwrap();
/// assert_eq!(id.as_str(), "example-123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId(String);

impl ResourceId {
    /// Creates a new ResourceId from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Resource id cannot be empty".to_string());
        }
        if id.contains('/') || id.contains('?') || id.chars().any(char::is_whitespace) {
            return Err(format!("Invalid resource id '{id}'"));
        }
        Ok(Self(id))
    }

    /// Returns the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ResourceId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ResourceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
