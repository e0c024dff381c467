//! FHIR wire models
//!
//! Only the handful of structures Ferry has to look inside are modelled here:
//! Bundles (entries and links) and OperationOutcomes (issues). Resources carried
//! in entries stay as raw JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `Bundle.type` value for transaction bundles
pub const BUNDLE_TYPE_TRANSACTION: &str = "transaction";

/// `Bundle.link.relation` value pointing at the next search page
pub const LINK_RELATION_NEXT: &str = "next";

/// A FHIR Bundle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    pub resource_type: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub bundle_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub link: Vec<BundleLink>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entry: Vec<BundleEntry>,
}

impl Bundle {
    /// Whether `type` is `transaction`
    pub fn is_transaction(&self) -> bool {
        self.bundle_type.as_deref() == Some(BUNDLE_TYPE_TRANSACTION)
    }

    /// URL of the first link whose relation is `next`
    pub fn next_link(&self) -> Option<&str> {
        self.link
            .iter()
            .find(|link| link.relation.as_deref() == Some(LINK_RELATION_NEXT))
            .and_then(|link| link.url.as_deref())
    }
}

/// One entry of a Bundle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub link: Vec<BundleLink>,
}

/// `Bundle.link` / `Bundle.entry.link`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleLink {
    #[serde(default)]
    pub relation: Option<String>,

    #[serde(default)]
    pub url: Option<String>,
}

/// A FHIR OperationOutcome
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationOutcome {
    pub resource_type: String,

    #[serde(default)]
    pub issue: Vec<OutcomeIssue>,
}

/// `OperationOutcome.issue`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeIssue {
    #[serde(default)]
    pub severity: Option<String>,

    #[serde(default)]
    pub code: Option<String>,

    #[serde(default)]
    pub diagnostics: Option<String>,

    #[serde(default)]
    pub details: Option<CodeableConcept>,

    #[serde(default)]
    pub location: Vec<String>,

    #[serde(default)]
    pub expression: Vec<String>,
}

/// Just the `text` of a CodeableConcept
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeableConcept {
    #[serde(default)]
    pub text: Option<String>,
}
