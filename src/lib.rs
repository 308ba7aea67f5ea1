//! Updraft builds operation plans for rolling cluster-configuration updates.
//!
//! A plan is a forest of phases with explicit dependency edges. The builder
//! in [`clusterconfig`] turns a cluster's server list into a plan that
//! updates the runtime configuration and walks every master through drain,
//! restart, and leader-election handoff one node at a time; [`plan`] holds
//! the phase model, tree composition, and the resolver that validates a
//! finished plan and answers the executor's readiness queries.

pub mod cluster;
pub mod clusterconfig;
pub mod plan;
pub mod storage;

pub use cluster::{
    split_servers, ClusterOperation, DnsConfig, Locator, OperationKey, OperationType, Server,
    ServerRole,
};
pub use clusterconfig::{create_operation_plan, new_operation_plan, PhaseBuilder};
pub use plan::{
    child_path, find_phase, mark_phase_state, ready_phases, resolve_plan, root, ElectionChange,
    ExecutorKind, OperationPlan, Phase, PhaseData, PhaseState, PlanError,
};
pub use storage::{MemBackend, Plans, StorageError};
