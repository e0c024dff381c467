//! Integration tests for search pagination and bulk delete

use ferry::adapters::fhir::FhirClient;
use ferry::config::ServerConfig;
use ferry::core::pagination::walk_all;
use ferry::core::transfer::{TransferDriver, TransferOp, TransferSource};
use ferry::domain::{FerryError, FhirError, ResourceType};
use serde_json::{json, Value};
use std::sync::Arc;

fn client_for(server: &mockito::ServerGuard) -> Arc<FhirClient> {
    let config = ServerConfig {
        base_url: format!("{}/fhir", server.url()),
        ..ServerConfig::default()
    };
    Arc::new(FhirClient::new(&config).unwrap())
}

fn search_page(ids: &[&str], next: Option<String>) -> String {
    let entries: Vec<Value> = ids
        .iter()
        .map(|id| json!({"fullUrl": format!("Patient/{id}"), "resource": {"resourceType": "Patient", "id": id}}))
        .collect();
    let mut bundle = json!({"resourceType": "Bundle", "type": "searchset", "entry": entries});
    if let Some(next) = next {
        bundle["link"] = json!([{"relation": "next", "url": next}]);
    }
    bundle.to_string()
}

fn patient() -> ResourceType {
    ResourceType::new("Patient").unwrap()
}

#[tokio::test]
async fn test_walk_and_delete_two_pages() {
    let mut server = mockito::Server::new_async().await;
    let next_url = format!("{}/fhir?_getpages=abc&_getpagesoffset=2", server.url());

    let first = server
        .mock("GET", "/fhir/Patient?_count=2")
        .with_status(200)
        .with_body(search_page(&["1", "2"], Some(next_url)))
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("GET", "/fhir?_getpages=abc&_getpagesoffset=2")
        .with_status(200)
        .with_body(search_page(&["3"], None))
        .expect(1)
        .create_async()
        .await;

    let mut deletes = Vec::new();
    for id in ["1", "2", "3"] {
        deletes.push(
            server
                .mock("DELETE", format!("/fhir/Patient/{id}").as_str())
                .with_status(204)
                .expect(1)
                .create_async()
                .await,
        );
    }

    let client = client_for(&server);
    let resources = walk_all(client.as_ref(), &patient(), 2).await.unwrap();
    assert_eq!(resources.len(), 3);

    let summary = TransferDriver::new(client)
        .transfer(
            TransferSource::Resources(resources),
            TransferOp::Delete,
            Some(&patient()),
        )
        .await
        .unwrap();

    assert_eq!(summary.attempted, 3);
    assert_eq!(summary.succeeded, 3);

    first.assert_async().await;
    second.assert_async().await;
    for delete in deletes {
        delete.assert_async().await;
    }
}

#[tokio::test]
async fn test_empty_search_returns_nothing() {
    let mut server = mockito::Server::new_async().await;
    let _first = server
        .mock("GET", "/fhir/Observation?_count=50")
        .with_status(200)
        .with_body(r#"{"resourceType":"Bundle","type":"searchset","total":0}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let observation = ResourceType::new("Observation").unwrap();
    let resources = walk_all(client.as_ref(), &observation, 50).await.unwrap();
    assert!(resources.is_empty());
}

#[tokio::test]
async fn test_failed_page_aborts_walk() {
    let mut server = mockito::Server::new_async().await;
    let next_url = format!("{}/fhir?_getpages=abc&_getpagesoffset=2", server.url());

    let _first = server
        .mock("GET", "/fhir/Patient?_count=2")
        .with_status(200)
        .with_body(search_page(&["1", "2"], Some(next_url)))
        .create_async()
        .await;
    let _second = server
        .mock("GET", "/fhir?_getpages=abc&_getpagesoffset=2")
        .with_status(500)
        .with_body("Internal Server Error")
        .create_async()
        .await;

    let client = client_for(&server);
    let err = walk_all(client.as_ref(), &patient(), 2).await.unwrap_err();
    match err {
        FerryError::Fhir(FhirError::HttpStatusFailure { status, body, .. }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "Internal Server Error");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn test_cyclic_next_link_is_rejected() {
    let mut server = mockito::Server::new_async().await;
    let next_url = format!("{}/fhir?_getpages=loop", server.url());

    let _first = server
        .mock("GET", "/fhir/Patient?_count=2")
        .with_status(200)
        .with_body(search_page(&["1"], Some(next_url.clone())))
        .create_async()
        .await;
    let _loop = server
        .mock("GET", "/fhir?_getpages=loop")
        .with_status(200)
        .with_body(search_page(&["2"], Some(next_url)))
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = walk_all(client.as_ref(), &patient(), 2).await.unwrap_err();
    assert!(
        err.to_string().contains("Pagination cycle detected"),
        "unexpected error: {err}"
    );
}
