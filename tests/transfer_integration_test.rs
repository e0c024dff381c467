//! Integration tests for bulk upload and validation against a mock FHIR server

use ferry::adapters::fhir::{FhirClient, FhirTransport};
use ferry::config::{secret_string, AuthType, ServerConfig};
use ferry::core::transfer::driver::validate_resource;
use ferry::core::transfer::{
    TransactionMode, TransferDriver, TransferOp, TransferSource, TransferStatus,
    TYPE_MISMATCH_REASON,
};
use ferry::domain::{FhirError, Resource, ResourceType};
use serde_json::json;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn client_for(server: &mockito::ServerGuard) -> Arc<FhirClient> {
    let config = ServerConfig {
        base_url: format!("{}/fhir", server.url()),
        ..ServerConfig::default()
    };
    Arc::new(FhirClient::new(&config).unwrap())
}

fn write_json(dir: &Path, name: &str, value: serde_json::Value) {
    fs::write(dir.join(name), value.to_string()).unwrap();
}

fn patient() -> ResourceType {
    ResourceType::new("Patient").unwrap()
}

#[tokio::test]
async fn test_upload_directory_with_single_and_bundle_files() {
    let mut server = mockito::Server::new_async().await;
    let create = server
        .mock("POST", "/fhir/Patient")
        .match_header("content-type", "application/fhir+json")
        .with_status(201)
        .with_header("content-type", "application/fhir+json")
        .with_body(r#"{"resourceType":"Patient","id":"created-1"}"#)
        .expect(3)
        .create_async()
        .await;

    let data = TempDir::new().unwrap();
    let patient_dir = data.path().join("Patient");
    fs::create_dir(&patient_dir).unwrap();
    write_json(&patient_dir, "a.json", json!({"resourceType": "Patient"}));
    write_json(
        &patient_dir,
        "b.json",
        json!({
            "resourceType": "Bundle",
            "type": "transaction",
            "entry": [
                {"resource": {"resourceType": "Patient"}, "request": {"method": "POST", "url": "Patient"}},
                {"resource": {"resourceType": "Patient"}, "request": {"method": "POST", "url": "Patient"}}
            ]
        }),
    );

    let summary = TransferDriver::new(client_for(&server))
        .transfer(
            TransferSource::Directory(patient_dir),
            TransactionMode::PerResource.upload_op(),
            Some(&patient()),
        )
        .await
        .unwrap();

    assert_eq!(summary.attempted, 3);
    assert_eq!(summary.succeeded, 3);
    assert_eq!(summary.failed, 0);
    assert_eq!(
        summary.outcomes[0].reason.as_deref(),
        Some("created Patient/created-1")
    );

    create.assert_async().await;
}

#[tokio::test]
async fn test_upload_continues_after_malformed_file() {
    let mut server = mockito::Server::new_async().await;
    let create = server
        .mock("POST", "/fhir/Patient")
        .with_status(201)
        .with_body(r#"{"resourceType":"Patient","id":"x"}"#)
        .expect(2)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    write_json(dir.path(), "1.json", json!({"resourceType": "Patient"}));
    fs::write(dir.path().join("2.json"), "{\"resourceType\": ").unwrap();
    write_json(dir.path(), "3.json", json!({"resourceType": "Patient"}));

    let summary = TransferDriver::new(client_for(&server))
        .transfer(
            TransferSource::Directory(dir.path().to_path_buf()),
            TransferOp::Create,
            Some(&patient()),
        )
        .await
        .unwrap();

    assert_eq!(summary.attempted, 3);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);
    let failure = summary.failures().next().unwrap();
    assert_eq!(failure.identifier, "2.json");

    create.assert_async().await;
}

#[tokio::test]
async fn test_type_mismatch_never_reaches_server() {
    let mut server = mockito::Server::new_async().await;
    let patient_create = server
        .mock("POST", "/fhir/Patient")
        .expect(0)
        .create_async()
        .await;
    let observation_create = server
        .mock("POST", "/fhir/Observation")
        .expect(0)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    write_json(
        dir.path(),
        "obs.json",
        json!({"resourceType": "Observation", "status": "final"}),
    );

    let summary = TransferDriver::new(client_for(&server))
        .transfer(
            TransferSource::Directory(dir.path().to_path_buf()),
            TransferOp::Create,
            Some(&patient()),
        )
        .await
        .unwrap();

    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.outcomes[0].status, TransferStatus::Skipped);
    assert_eq!(
        summary.outcomes[0].reason.as_deref(),
        Some(TYPE_MISMATCH_REASON)
    );

    patient_create.assert_async().await;
    observation_create.assert_async().await;
}

#[tokio::test]
async fn test_server_rejection_is_recorded_with_status() {
    let mut server = mockito::Server::new_async().await;
    let _create = server
        .mock("POST", "/fhir/Patient")
        .with_status(422)
        .with_body(r#"{"resourceType":"OperationOutcome","issue":[{"severity":"error","code":"processing"}]}"#)
        .create_async()
        .await;

    let summary = TransferDriver::new(client_for(&server))
        .transfer(
            TransferSource::Resources(vec![Resource::from_value(
                json!({"resourceType": "Patient"}),
                "inline",
            )
            .unwrap()]),
            TransferOp::Create,
            None,
        )
        .await
        .unwrap();

    assert_eq!(summary.failed, 1);
    let reason = summary.outcomes[0].reason.as_deref().unwrap();
    assert!(reason.contains("HTTP 422"), "unexpected reason: {reason}");
}

#[tokio::test]
async fn test_atomic_transaction_posted_to_base() {
    let mut server = mockito::Server::new_async().await;
    let transaction = server
        .mock("POST", "/fhir/")
        .with_status(200)
        .with_body(r#"{"resourceType":"Bundle","type":"transaction-response","entry":[]}"#)
        .expect(1)
        .create_async()
        .await;
    let per_resource = server
        .mock("POST", "/fhir/Patient")
        .expect(0)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    write_json(
        dir.path(),
        "tx.json",
        json!({
            "resourceType": "Bundle",
            "type": "transaction",
            "entry": [
                {"resource": {"resourceType": "Patient"}, "request": {"method": "POST", "url": "Patient"}},
                {"resource": {"resourceType": "Observation"}, "request": {"method": "POST", "url": "Observation"}}
            ]
        }),
    );

    let summary = TransferDriver::new(client_for(&server))
        .transfer(
            TransferSource::Directory(dir.path().to_path_buf()),
            TransactionMode::Atomic.upload_op(),
            None,
        )
        .await
        .unwrap();

    assert_eq!(summary.attempted, 2);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.outcomes.len(), 1);

    transaction.assert_async().await;
    per_resource.assert_async().await;
}

#[tokio::test]
async fn test_atomic_transaction_rejected_as_a_whole() {
    let mut server = mockito::Server::new_async().await;
    let _transaction = server
        .mock("POST", "/fhir/")
        .with_status(400)
        .with_body(r#"{"resourceType":"OperationOutcome","issue":[{"severity":"error","code":"invalid","details":{"text":"Entry 1 is invalid"}}]}"#)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    write_json(
        dir.path(),
        "tx.json",
        json!({
            "resourceType": "Bundle",
            "type": "transaction",
            "entry": [
                {"resource": {"resourceType": "Patient"}},
                {"resource": {"resourceType": "Patient"}}
            ]
        }),
    );

    let summary = TransferDriver::new(client_for(&server))
        .transfer(
            TransferSource::Directory(dir.path().to_path_buf()),
            TransferOp::TransactionPost,
            None,
        )
        .await
        .unwrap();

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.succeeded, 0);
    assert_eq!(summary.outcomes[0].issues[0].details, "Entry 1 is invalid");
}

#[tokio::test]
async fn test_validate_explains_rejection_body() {
    let mut server = mockito::Server::new_async().await;
    let _validate = server
        .mock("POST", "/fhir/Patient/$validate")
        .with_status(412)
        .with_body(
            json!({
                "resourceType": "OperationOutcome",
                "issue": [{
                    "severity": "error",
                    "code": "invalid",
                    "details": {"text": "birthDate out of range"},
                    "expression": ["Patient.birthDate"]
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let resource = Resource::from_value(
        json!({"resourceType": "Patient", "birthDate": "3020-01-01"}),
        "inline",
    )
    .unwrap();

    let report = validate_resource(client.as_ref(), &resource).await.unwrap();
    assert_eq!(report.http_status, Some(412));
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].details, "birthDate out of range");
    assert_eq!(report.issues[0].location.as_deref(), Some("Patient.birthDate"));
    assert!(!report.is_valid());
}

#[tokio::test]
async fn test_validate_op_records_clean_outcome_as_success() {
    let mut server = mockito::Server::new_async().await;
    let _validate = server
        .mock("POST", "/fhir/Patient/$validate")
        .with_status(200)
        .with_body(r#"{"resourceType":"OperationOutcome","issue":[{"severity":"information","code":"informational","diagnostics":"All OK"}]}"#)
        .create_async()
        .await;

    let resource = Resource::from_value(json!({"resourceType": "Patient"}), "inline").unwrap();
    let summary = TransferDriver::new(client_for(&server))
        .transfer(
            TransferSource::Resources(vec![resource]),
            TransferOp::Validate,
            Some(&patient()),
        )
        .await
        .unwrap();

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.outcomes[0].issues[0].details, "All OK");
}

#[tokio::test]
async fn test_unreachable_server_is_network_failure() {
    // Nothing listens on port 9 (discard) in the test environment
    let config = ServerConfig {
        base_url: "http://127.0.0.1:9/fhir".to_string(),
        ..ServerConfig::default()
    };
    let client = FhirClient::new(&config).unwrap();
    let resource = Resource::from_value(json!({"resourceType": "Patient"}), "inline").unwrap();

    let err = client.create(&resource).await.unwrap_err();
    assert!(matches!(err, FhirError::NetworkFailure { .. }));
    assert!(err.to_string().starts_with("POST http://127.0.0.1:9/fhir/Patient failed"));
}

#[tokio::test]
async fn test_created_patient_reads_back_with_server_id() {
    let mut server = mockito::Server::new_async().await;
    let patient_body = json!({
        "resourceType": "Patient",
        "identifier": [{"system": "urn:oid:1.2.36.1.2001.1005.17", "value": "101"}],
        "name": [{"family": "Doe", "given": ["John"]}],
        "gender": "male",
        "birthDate": "1980-05-15"
    });
    let mut stored = patient_body.clone();
    stored["id"] = json!("srv-42");
    stored["meta"] = json!({"versionId": "1"});

    let create = server
        .mock("POST", "/fhir/Patient")
        .match_body(mockito::Matcher::PartialJson(patient_body.clone()))
        .with_status(201)
        .with_header("location", "Patient/srv-42/_history/1")
        .with_body(stored.to_string())
        .expect(1)
        .create_async()
        .await;
    let read = server
        .mock("GET", "/fhir/Patient/srv-42")
        .with_status(200)
        .with_body(stored.to_string())
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    let resource = Resource::from_value(patient_body.clone(), "inline").unwrap();
    assert!(resource.id().is_none());

    let created = client.create(&resource).await.unwrap();
    assert_eq!(created.status, 201);
    let created = Resource::from_value(created.require_body().unwrap().clone(), "create").unwrap();
    let id = created.id().unwrap().clone();
    assert_eq!(id.as_str(), "srv-42");

    let fetched = client.read(&patient(), &id).await.unwrap();
    let fetched = fetched.body.unwrap();
    for field in ["identifier", "name", "gender", "birthDate"] {
        assert_eq!(fetched[field], patient_body[field], "field {field}");
    }

    create.assert_async().await;
    read.assert_async().await;
}

#[tokio::test]
async fn test_basic_auth_header_sent() {
    let mut server = mockito::Server::new_async().await;
    let read = server
        .mock("GET", "/fhir/Patient/p1")
        .match_header("authorization", "Basic dXNlcjpwYXNz")
        .with_status(200)
        .with_body(r#"{"resourceType":"Patient","id":"p1"}"#)
        .create_async()
        .await;

    let config = ServerConfig {
        base_url: format!("{}/fhir", server.url()),
        auth_type: AuthType::Basic,
        username: Some("user".to_string()),
        password: Some(secret_string("pass".to_string())),
        ..ServerConfig::default()
    };
    let client = FhirClient::new(&config).unwrap();

    let response = client
        .read(&patient(), &ferry::domain::ResourceId::new("p1").unwrap())
        .await
        .unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.body.unwrap()["id"], "p1");

    read.assert_async().await;
}
