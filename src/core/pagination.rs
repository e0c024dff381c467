//! Search pagination
//!
//! Walks every page of a type-level search by following `next` links until a
//! page has none. Any failed page aborts the whole walk so a partial listing is
//! never mistaken for a complete one.

use crate::adapters::fhir::FhirTransport;
use crate::core::classify::{classify, Classification};
use crate::domain::{FerryError, FhirError, Resource, ResourceType, Result};
use std::collections::HashSet;

/// Collect every resource of `resource_type` on the server
///
/// The first request is `{type}?_count={page_size}`; later pages use the
/// server's `next` links verbatim. Resources with an id already seen on an
/// earlier page are dropped with a warning.
///
/// # Errors
///
/// - [`FerryError::Fhir`] if any page request fails or a page is not a search
///   Bundle
/// - [`FerryError::Validation`] if a `next` link repeats an already visited URL
pub async fn walk_all(
    transport: &dyn FhirTransport,
    resource_type: &ResourceType,
    page_size: usize,
) -> Result<Vec<Resource>> {
    let first_page = format!("{resource_type}?_count={page_size}");
    let mut next = Some(first_page);
    let mut visited: HashSet<String> = HashSet::new();
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut collected = Vec::new();
    let mut page_number = 0usize;

    while let Some(page) = next.take() {
        if !visited.insert(page.clone()) {
            return Err(FerryError::Validation(format!(
                "Pagination cycle detected: next link {page} was already visited"
            )));
        }
        page_number += 1;

        let response = transport.search_page(&page).await.map_err(|e| {
            tracing::error!(page = page_number, url = %page, error = %e, "Search page failed, aborting walk");
            e
        })?;
        let body = response.require_body()?.clone();

        let (resources, next_link, total) = match classify(body, &response.url)? {
            Classification::SearchBundle {
                resources,
                next_link,
                total,
            } => (resources, next_link, total),
            Classification::Single(resource) => {
                return Err(FhirError::TypeMismatch {
                    expected: "Bundle".to_string(),
                    found: resource.resource_type().to_string(),
                }
                .into());
            }
            Classification::TransactionBundle { .. } => {
                return Err(FhirError::TypeMismatch {
                    expected: "searchset Bundle".to_string(),
                    found: "transaction Bundle".to_string(),
                }
                .into());
            }
        };

        tracing::info!(
            resource_type = %resource_type,
            page = page_number,
            entries = resources.len(),
            total = total.map(|t| t as i64).unwrap_or(-1),
            "Fetched search page"
        );

        for resource in resources {
            if let Some(id) = resource.id() {
                let key = format!("{}/{}", resource.resource_type(), id);
                if !seen_ids.insert(key.clone()) {
                    tracing::warn!(resource = %key, page = page_number, "Dropping duplicate search result");
                    continue;
                }
            }
            collected.push(resource);
        }

        next = next_link;
    }

    tracing::info!(
        resource_type = %resource_type,
        pages = page_number,
        resources = collected.len(),
        "Search walk completed"
    );
    Ok(collected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::fhir::{FhirResponse, HttpMethod};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves canned pages keyed by request path
    struct PagedTransport {
        pages: HashMap<String, Value>,
        requested: Mutex<Vec<String>>,
    }

    impl PagedTransport {
        fn new(pages: Vec<(&str, Value)>) -> Self {
            Self {
                pages: pages
                    .into_iter()
                    .map(|(path, body)| (path.to_string(), body))
                    .collect(),
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl FhirTransport for PagedTransport {
        async fn send(
            &self,
            method: HttpMethod,
            path: &str,
            _body: Option<&Value>,
        ) -> std::result::Result<FhirResponse, FhirError> {
            self.requested.lock().unwrap().push(path.to_string());
            match self.pages.get(path) {
                Some(body) => Ok(FhirResponse {
                    status: 200,
                    url: path.to_string(),
                    body: Some(body.clone()),
                }),
                None => Err(FhirError::HttpStatusFailure {
                    method: method.to_string(),
                    url: path.to_string(),
                    status: 500,
                    body: "boom".to_string(),
                }),
            }
        }

        fn base_url(&self) -> &str {
            "memory://"
        }
    }

    fn page(ids: &[&str], next: Option<&str>) -> Value {
        let entries: Vec<Value> = ids
            .iter()
            .map(|id| json!({"resource": {"resourceType": "Patient", "id": id}}))
            .collect();
        let mut bundle = json!({"resourceType": "Bundle", "type": "searchset", "entry": entries});
        if let Some(next) = next {
            bundle["link"] = json!([{"relation": "next", "url": next}]);
        }
        bundle
    }

    fn patient() -> ResourceType {
        ResourceType::new("Patient").unwrap()
    }

    #[tokio::test]
    async fn test_walk_follows_next_links() {
        let transport = PagedTransport::new(vec![
            ("Patient?_count=2", page(&["1", "2"], Some("http://x/fhir?page=2"))),
            ("http://x/fhir?page=2", page(&["3", "4"], Some("http://x/fhir?page=3"))),
            ("http://x/fhir?page=3", page(&["5"], None)),
        ]);

        let resources = walk_all(&transport, &patient(), 2).await.unwrap();
        let ids: Vec<_> = resources
            .iter()
            .map(|r| r.id().unwrap().as_str().to_string())
            .collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
        assert_eq!(transport.requested.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_walk_empty_result() {
        let transport = PagedTransport::new(vec![("Patient?_count=50", page(&[], None))]);
        let resources = walk_all(&transport, &patient(), 50).await.unwrap();
        assert!(resources.is_empty());
    }

    #[tokio::test]
    async fn test_walk_aborts_on_failed_page() {
        let transport = PagedTransport::new(vec![(
            "Patient?_count=2",
            page(&["1", "2"], Some("http://x/fhir?page=2")),
        )]);

        let err = walk_all(&transport, &patient(), 2).await.unwrap_err();
        assert!(matches!(
            err,
            FerryError::Fhir(FhirError::HttpStatusFailure { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_walk_detects_cycles() {
        let transport = PagedTransport::new(vec![
            ("Patient?_count=2", page(&["1"], Some("http://x/fhir?page=2"))),
            ("http://x/fhir?page=2", page(&["2"], Some("http://x/fhir?page=2"))),
        ]);

        let err = walk_all(&transport, &patient(), 2).await.unwrap_err();
        assert!(err.to_string().contains("cycle"));
    }

    #[tokio::test]
    async fn test_walk_drops_duplicates() {
        let transport = PagedTransport::new(vec![
            ("Patient?_count=2", page(&["1", "2"], Some("http://x/fhir?page=2"))),
            ("http://x/fhir?page=2", page(&["2", "3"], None)),
        ]);

        let resources = walk_all(&transport, &patient(), 2).await.unwrap();
        assert_eq!(resources.len(), 3);
    }

    #[tokio::test]
    async fn test_walk_rejects_non_bundle_page() {
        let transport = PagedTransport::new(vec![(
            "Patient?_count=2",
            json!({"resourceType": "OperationOutcome", "issue": []}),
        )]);

        let err = walk_all(&transport, &patient(), 2).await.unwrap_err();
        assert!(matches!(
            err,
            FerryError::Fhir(FhirError::TypeMismatch { .. })
        ));
    }
}
