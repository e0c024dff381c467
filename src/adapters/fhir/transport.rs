//! FHIR transport trait definition
//!
//! This module defines the `FhirTransport` trait, the single seam between the
//! transfer logic and the network. The production implementation is
//! [`FhirClient`](super::FhirClient); tests substitute recording or failing
//! transports.

use crate::domain::{FhirError, Resource, ResourceId, ResourceType};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

/// HTTP methods used against a FHIR server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    /// Method name as sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A successful (2xx) response
#[derive(Debug, Clone, PartialEq)]
pub struct FhirResponse {
    /// HTTP status code
    pub status: u16,

    /// Fully resolved request URL
    pub url: String,

    /// Parsed JSON body; `None` when the server sent no body
    pub body: Option<Value>,
}

impl FhirResponse {
    /// Body or a [`FhirError::MalformedJson`] naming the URL
    pub fn require_body(&self) -> Result<&Value, FhirError> {
        self.body
            .as_ref()
            .ok_or_else(|| FhirError::malformed_json(&self.url, "empty response body"))
    }
}

/// Transport to a FHIR REST endpoint
///
/// `send` is the only required method. It resolves `path` against the server
/// base URL (absolute URLs such as pagination links are used as-is), sends the
/// optional JSON body with `Content-Type: application/fhir+json`, and maps any
/// network error or non-2xx status to a [`FhirError`]. It never retries.
///
/// The provided methods are the FHIR interactions Ferry uses.
#[async_trait]
pub trait FhirTransport: Send + Sync {
    /// Issue one request
    async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
    ) -> Result<FhirResponse, FhirError>;

    /// Base URL requests are resolved against
    fn base_url(&self) -> &str;

    /// `POST {base}/{type}`
    async fn create(&self, resource: &Resource) -> Result<FhirResponse, FhirError> {
        self.send(
            HttpMethod::Post,
            resource.resource_type().as_str(),
            Some(resource.body()),
        )
        .await
    }

    /// `GET {base}/{type}/{id}`
    async fn read(
        &self,
        resource_type: &ResourceType,
        id: &ResourceId,
    ) -> Result<FhirResponse, FhirError> {
        self.send(HttpMethod::Get, &format!("{resource_type}/{id}"), None)
            .await
    }

    /// `DELETE {base}/{type}/{id}`
    async fn delete(
        &self,
        resource_type: &ResourceType,
        id: &ResourceId,
    ) -> Result<FhirResponse, FhirError> {
        self.send(HttpMethod::Delete, &format!("{resource_type}/{id}"), None)
            .await
    }

    /// `POST {base}/{type}/$validate`
    async fn validate(&self, resource: &Resource) -> Result<FhirResponse, FhirError> {
        self.send(
            HttpMethod::Post,
            &format!("{}/$validate", resource.resource_type()),
            Some(resource.body()),
        )
        .await
    }

    /// `POST {base}` with a transaction Bundle
    async fn transaction(&self, bundle: &Resource) -> Result<FhirResponse, FhirError> {
        self.send(HttpMethod::Post, "", Some(bundle.body())).await
    }

    /// `GET` a search page, either `{type}?_count=n` or an absolute next link
    async fn search_page(&self, path_or_url: &str) -> Result<FhirResponse, FhirError> {
        self.send(HttpMethod::Get, path_or_url, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_http_method_names() {
        assert_eq!(HttpMethod::Get.as_str(), "GET");
        assert_eq!(HttpMethod::Post.to_string(), "POST");
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_require_body() {
        let response = FhirResponse {
            status: 204,
            url: "http://localhost/fhir/Patient/1".to_string(),
            body: None,
        };
        assert!(matches!(
            response.require_body(),
            Err(FhirError::MalformedJson { .. })
        ));

        let response = FhirResponse {
            body: Some(json!({"resourceType": "Patient"})),
            ..response
        };
        assert!(response.require_body().is_ok());
    }
}
