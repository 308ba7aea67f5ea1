//! Plan assembly for cluster-configuration updates

use crate::cluster::{ClusterOperation, DnsConfig, Locator, Server};
use crate::clusterconfig::PhaseBuilder;
use crate::plan::{resolve_plan, OperationPlan, PlanError};
use crate::storage::{Plans, StorageError};
use chrono::Utc;
use slog::{info, Logger};

/// Assembles the operation plan for a cluster-configuration update.
///
/// The plan carries two top-level roots: `/update-config` and `/masters`.
/// No edge is established between them; the executor schedules both from
/// the `requires` graph alone. Fails with a not-found error when the
/// server list contains no masters.
pub fn new_operation_plan(
    operation: &ClusterOperation,
    dns_config: DnsConfig,
    app: Locator,
    servers: Vec<Server>,
) -> Result<OperationPlan, PlanError> {
    let builder = PhaseBuilder::new(app, servers.clone());
    let update_config = builder.config();
    let masters = builder.masters()?;

    let mut plan = OperationPlan {
        operation_id: operation.id.clone(),
        operation_type: operation.operation_type,
        account_id: operation.account_id.clone(),
        cluster_name: operation.site_domain.clone(),
        dns_config,
        servers,
        phases: vec![update_config, masters],
        created: Utc::now(),
    };
    resolve_plan(&mut plan)?;
    Ok(plan)
}

/// Builds the plan and persists it through the given backend.
///
/// A backend without plan storage reports not-found, surfaced here as a
/// "not implemented" error.
pub fn create_operation_plan(
    backend: &dyn Plans,
    logger: &Logger,
    operation: &ClusterOperation,
    dns_config: DnsConfig,
    app: Locator,
    servers: Vec<Server>,
) -> Result<OperationPlan, PlanError> {
    let plan = new_operation_plan(operation, dns_config, app, servers)?;
    match backend.create_operation_plan(&operation.key(), plan.clone()) {
        Ok(()) => {
            info!(logger, "Created operation plan";
                "operation" => &operation.id,
                "cluster" => &operation.site_domain,
                "phases" => plan.flatten().len());
            Ok(plan)
        }
        Err(StorageError::NotFound(_)) => Err(PlanError::NotImplemented(
            "cluster configuration updates are not supported by this backend".to_string(),
        )),
        Err(err) => Err(PlanError::Storage(err)),
    }
}
