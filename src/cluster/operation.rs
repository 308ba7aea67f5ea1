//! Operation descriptors and storage keys

use serde::{Deserialize, Serialize};

/// Kind of cluster lifecycle operation a plan is built for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationType {
    /// Rolling update of the cluster runtime configuration
    ConfigUpdate,
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationType::ConfigUpdate => write!(f, "config-update"),
        }
    }
}

/// Describes one cluster operation as recorded by the operator
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClusterOperation {
    /// Unique operation ID
    pub id: String,

    /// Kind of operation
    pub operation_type: OperationType,

    /// Account the cluster belongs to
    pub account_id: String,

    /// Domain name of the cluster the operation runs against
    pub site_domain: String,
}

impl ClusterOperation {
    /// Storage key identifying this operation
    pub fn key(&self) -> OperationKey {
        OperationKey {
            account_id: self.account_id.clone(),
            site_domain: self.site_domain.clone(),
            operation_id: self.id.clone(),
        }
    }
}

/// Uniquely identifies an operation across accounts and clusters
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationKey {
    pub account_id: String,
    pub site_domain: String,
    pub operation_id: String,
}

impl std::fmt::Display for OperationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.account_id, self.site_domain, self.operation_id
        )
    }
}
