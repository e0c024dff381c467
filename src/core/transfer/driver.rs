//! Transfer driver
//!
//! Runs one [`TransferOp`] over every item of a [`TransferSource`], strictly
//! one request at a time, and records exactly one outcome per resource (or per
//! file, when the file itself cannot be used).

use super::source::{TransferItem, TransferSource};
use super::summary::{BatchSummary, TransferOutcome};
use super::TransferOp;
use crate::adapters::fhir::FhirTransport;
use crate::core::classify::{classify, Classification};
use crate::core::report::{explain, explain_text, ValidationReport};
use crate::domain::{FhirError, Resource, ResourceType, Result};
use serde_json::Value;
use std::fs;
use std::sync::Arc;
use std::time::Instant;

/// Skip reason for resources whose type differs from the expected one
pub const TYPE_MISMATCH_REASON: &str = "type mismatch";

/// Skip reason for every resource in a dry run
pub const DRY_RUN_REASON: &str = "dry run";

/// Drives bulk transfers against one FHIR server
///
/// # Example
///
/// ```no_run
/// use ferry::adapters::fhir::FhirClient;
/// use ferry::config::ServerConfig;
/// use ferry::core::transfer::{TransferDriver, TransferOp, TransferSource};
/// use ferry::domain::ResourceType;
/// use std::sync::Arc;
///
/// # async fn example() -> ferry::domain::Result<()> {
/// let client = Arc::new(FhirClient::new(&ServerConfig::default())?);
/// let driver = TransferDriver::new(client);
/// let patient = ResourceType::new("Patient").map_err(ferry::domain::FerryError::Validation)?;
///
/// let summary = driver
///     .transfer(TransferSource::Directory("data/Patient".into()), TransferOp::Create, Some(&patient))
///     .await?;
/// println!("{} of {} succeeded", summary.succeeded, summary.attempted);
/// # Ok(())
/// # }
/// ```
pub struct TransferDriver {
    transport: Arc<dyn FhirTransport>,
    dry_run: bool,
}

impl TransferDriver {
    /// Create a driver over a transport
    pub fn new(transport: Arc<dyn FhirTransport>) -> Self {
        Self {
            transport,
            dry_run: false,
        }
    }

    /// Classify and filter items but never call the server
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Apply `op` to every resource of `source`
    ///
    /// Resources whose type differs from `expected` are recorded as skipped
    /// with [`TYPE_MISMATCH_REASON`] and never sent. Per-item failures are
    /// recorded and the transfer continues.
    ///
    /// # Errors
    ///
    /// Only when the source itself cannot be enumerated, e.g. a missing
    /// directory.
    pub async fn transfer(
        &self,
        source: TransferSource,
        op: TransferOp,
        expected: Option<&ResourceType>,
    ) -> Result<BatchSummary> {
        let started = Instant::now();
        let description = source.describe();
        let items = source.into_items()?;

        crate::log_transfer_start!(
            op,
            description,
            items.len(),
            expected.map(|t| t.to_string()).unwrap_or_else(|| "any".to_string())
        );

        let mut summary = BatchSummary::new(op);
        for item in items {
            self.process_item(item, op, expected, &mut summary).await;
        }

        let summary = summary.with_duration(started.elapsed());
        crate::log_transfer_complete!(
            op,
            summary.attempted,
            summary.succeeded,
            summary.failed,
            summary.skipped,
            summary.duration.as_millis() as u64
        );
        summary.log_summary();
        Ok(summary)
    }

    async fn process_item(
        &self,
        item: TransferItem,
        op: TransferOp,
        expected: Option<&ResourceType>,
        summary: &mut BatchSummary,
    ) {
        let label = item.label();

        let classification = match item {
            TransferItem::Resource(resource) => Classification::Single(resource),
            TransferItem::File(path) => {
                let loaded = fs::read_to_string(&path)
                    .map_err(|e| format!("Failed to read {}: {e}", path.display()))
                    .and_then(|text| {
                        serde_json::from_str::<Value>(&text)
                            .map_err(|e| FhirError::malformed_json(&label, e).to_string())
                    })
                    .and_then(|value| classify(value, &label).map_err(|e| e.to_string()));

                match loaded {
                    Ok(classification) => classification,
                    Err(reason) => {
                        crate::log_item_failure!(label, reason);
                        summary.record(TransferOutcome::failed(&label, reason));
                        return;
                    }
                }
            }
        };

        match classification {
            Classification::Single(resource) => {
                self.apply(resource, label, op, expected, summary).await;
            }
            Classification::TransactionBundle {
                bundle,
                entry_count,
                ..
            } if op == TransferOp::TransactionPost => {
                self.post_transaction(&bundle, entry_count, label, summary)
                    .await;
            }
            Classification::TransactionBundle { resources, .. }
            | Classification::SearchBundle { resources, .. } => {
                tracing::debug!(item = %label, entries = resources.len(), "Decomposing bundle");
                // A Bundle filter selects the file, not its entries
                let entry_filter = expected.filter(|t| !t.is_bundle());
                for (index, resource) in resources.into_iter().enumerate() {
                    let identifier = format!("{label} entry[{index}] {}", resource.reference());
                    self.apply(resource, identifier, op, entry_filter, summary)
                        .await;
                }
            }
        }
    }

    /// Apply the operation to one resource
    async fn apply(
        &self,
        resource: Resource,
        identifier: String,
        op: TransferOp,
        expected: Option<&ResourceType>,
        summary: &mut BatchSummary,
    ) {
        if let Some(expected) = expected {
            if !resource.is_type(expected) {
                tracing::info!(
                    item = %identifier,
                    expected = %expected,
                    found = %resource.resource_type(),
                    "Skipping resource of unexpected type"
                );
                summary.record(TransferOutcome::skipped(identifier, TYPE_MISMATCH_REASON));
                return;
            }
        }

        if self.dry_run {
            tracing::info!(item = %identifier, op = %op, "Dry run, not sending");
            summary.record(TransferOutcome::skipped(identifier, DRY_RUN_REASON));
            return;
        }

        let outcome = match op {
            TransferOp::Create | TransferOp::TransactionPost => {
                self.create(&resource, identifier).await
            }
            TransferOp::Delete => self.delete(&resource, identifier).await,
            TransferOp::Validate => self.validate(&resource, identifier).await,
        };
        summary.record(outcome);
    }

    async fn create(&self, resource: &Resource, identifier: String) -> TransferOutcome {
        match self.transport.create(resource).await {
            Ok(response) => {
                let created = response
                    .body
                    .as_ref()
                    .and_then(|body| body.get("id"))
                    .and_then(Value::as_str)
                    .map(|id| format!("{}/{id}", resource.resource_type()))
                    .unwrap_or_else(|| resource.resource_type().to_string());
                tracing::info!(item = %identifier, created = %created, "Created resource");
                TransferOutcome::success(identifier, format!("created {created}"))
            }
            Err(e) => self.failure(identifier, e),
        }
    }

    async fn delete(&self, resource: &Resource, identifier: String) -> TransferOutcome {
        let id = match resource.require_id() {
            Ok(id) => id,
            Err(e) => return self.failure(identifier, e),
        };

        match self.transport.delete(resource.resource_type(), id).await {
            Ok(_) => {
                tracing::info!(item = %identifier, "Deleted resource");
                TransferOutcome::success(identifier, format!("deleted {}", resource.reference()))
            }
            Err(e) => self.failure(identifier, e),
        }
    }

    async fn validate(&self, resource: &Resource, identifier: String) -> TransferOutcome {
        match validate_resource(self.transport.as_ref(), resource).await {
            Ok(report) => {
                let reason = format!(
                    "{} error(s), {} warning(s)",
                    report.error_count(),
                    report.warning_count()
                );
                if report.is_valid() {
                    tracing::info!(item = %identifier, issues = report.issues.len(), "Validation passed");
                    TransferOutcome::success(identifier, reason).with_issues(report.issues)
                } else {
                    tracing::warn!(item = %identifier, errors = report.error_count(), "Validation failed");
                    TransferOutcome::failed(identifier, reason).with_issues(report.issues)
                }
            }
            Err(e) => self.failure(identifier, e),
        }
    }

    /// Post a transaction Bundle as one unit
    async fn post_transaction(
        &self,
        bundle: &Resource,
        entries: usize,
        identifier: String,
        summary: &mut BatchSummary,
    ) {
        if self.dry_run {
            tracing::info!(item = %identifier, entries, "Dry run, not posting transaction");
            summary.record(TransferOutcome::skipped(identifier, DRY_RUN_REASON).with_resources(entries));
            return;
        }

        match self.transport.transaction(bundle).await {
            Ok(_) => {
                tracing::info!(item = %identifier, entries, "Transaction committed");
                summary.record(
                    TransferOutcome::success(
                        identifier,
                        format!("transaction committed ({entries} entries)"),
                    )
                    .with_resources(entries),
                );
            }
            Err(e) => {
                let issues = e.response_body().and_then(explain_text).unwrap_or_default();
                let outcome = self.failure(identifier, e).with_issues(issues);
                summary.record(outcome);
            }
        }
    }

    fn failure(&self, identifier: String, error: FhirError) -> TransferOutcome {
        crate::log_item_failure!(identifier, error);
        TransferOutcome::failed(identifier, error)
    }
}

/// Run `$validate` for one resource
///
/// A rejected request whose body is an OperationOutcome still yields a report,
/// carrying the server's issues.
///
/// # Errors
///
/// Network failures, non-OperationOutcome error bodies, and malformed
/// responses.
pub async fn validate_resource(
    transport: &dyn FhirTransport,
    resource: &Resource,
) -> std::result::Result<ValidationReport, FhirError> {
    match transport.validate(resource).await {
        Ok(response) => {
            let issues = match &response.body {
                Some(body) => explain(body)?,
                None => Vec::new(),
            };
            Ok(ValidationReport {
                resource: resource.reference(),
                http_status: Some(response.status),
                issues,
            })
        }
        Err(e) => match e.response_body().and_then(explain_text) {
            Some(issues) => Ok(ValidationReport {
                resource: resource.reference(),
                http_status: e.status(),
                issues,
            }),
            None => Err(e),
        },
    }
}
