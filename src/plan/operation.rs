//! The operation plan envelope

use crate::cluster::{DnsConfig, OperationKey, OperationType, Server};
use crate::plan::Phase;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A complete plan for one cluster operation: identity, the servers the
/// operation concerns, and the phase forest the executor walks.
///
/// Constructed once per operation, then read-only except for the per-phase
/// execution-state annotations the executor applies in place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OperationPlan {
    /// ID of the operation this plan belongs to
    pub operation_id: String,

    /// Kind of operation
    pub operation_type: OperationType,

    /// Account the cluster belongs to
    pub account_id: String,

    /// Domain name of the cluster
    pub cluster_name: String,

    /// Cluster DNS configuration at plan time
    pub dns_config: DnsConfig,

    /// All servers the operation concerns
    pub servers: Vec<Server>,

    /// Top-level phases; each carries its own nested children
    pub phases: Vec<Phase>,

    /// When the plan was assembled
    pub created: DateTime<Utc>,
}

impl OperationPlan {
    /// Storage key identifying the operation this plan belongs to
    pub fn key(&self) -> OperationKey {
        OperationKey {
            account_id: self.account_id.clone(),
            site_domain: self.cluster_name.clone(),
            operation_id: self.operation_id.clone(),
        }
    }

    /// All phases of the plan in depth-first order
    pub fn flatten(&self) -> Vec<&Phase> {
        let mut phases = Vec::new();
        for phase in &self.phases {
            phase.walk(&mut |p| phases.push(p));
        }
        phases
    }
}
