//! Cluster-configuration update planning
//!
//! Builds the operation plan that rolls a new runtime configuration across
//! a cluster: a configuration-update phase plus a serialized per-master
//! maintenance sequence with leader-election handoff.

pub mod builder;
pub mod plan;

pub use builder::PhaseBuilder;
pub use plan::{create_operation_plan, new_operation_plan};
