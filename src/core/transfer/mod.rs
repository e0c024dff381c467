//! Bulk transfer
//!
//! A transfer takes a [`TransferSource`] (a directory of JSON files, explicit
//! files, or resources already in memory), applies one [`TransferOp`] to every
//! resource it yields, and produces a [`BatchSummary`]. One bad item never
//! stops the batch.

pub mod driver;
pub mod source;
pub mod summary;

pub use driver::{TransferDriver, DRY_RUN_REASON, TYPE_MISMATCH_REASON};
pub use source::{scan_directory, TransferItem, TransferSource};
pub use summary::{BatchSummary, TransferOutcome, TransferStatus};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operation applied to each transferred resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransferOp {
    /// `POST {type}`
    Create,
    /// `DELETE {type}/{id}`
    Delete,
    /// `POST {type}/$validate`
    Validate,
    /// Transaction Bundles are posted whole to the base URL; anything else is created
    TransactionPost,
}

impl fmt::Display for TransferOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransferOp::Create => "create",
            TransferOp::Delete => "delete",
            TransferOp::Validate => "validate",
            TransferOp::TransactionPost => "transaction-post",
        };
        f.write_str(name)
    }
}

/// How transaction Bundles are uploaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionMode {
    /// Decompose the Bundle and create each entry on its own
    #[default]
    PerResource,
    /// Post the Bundle to the base URL as one atomic transaction
    Atomic,
}

impl TransactionMode {
    /// Operation an upload runs under this mode
    pub fn upload_op(&self) -> TransferOp {
        match self {
            TransactionMode::PerResource => TransferOp::Create,
            TransactionMode::Atomic => TransferOp::TransactionPost,
        }
    }
}

impl FromStr for TransactionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "per-resource" | "per_resource" => Ok(TransactionMode::PerResource),
            "atomic" => Ok(TransactionMode::Atomic),
            _ => Err(format!(
                "Invalid transaction mode '{s}'. Must be 'per-resource' or 'atomic'"
            )),
        }
    }
}

impl fmt::Display for TransactionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionMode::PerResource => f.write_str("per-resource"),
            TransactionMode::Atomic => f.write_str("atomic"),
        }
    }
}
