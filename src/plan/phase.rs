//! Phase model for operation plans
//!
//! A plan is a forest of phases. Each phase is either a leaf carrying an
//! executor tag and its parameters, or a parent grouping a sequence of
//! children under its ID namespace. Ordering between phases is expressed
//! exclusively through `requires` edges referencing full phase IDs; the
//! executor consuming the plan derives all scheduling from those edges.

use crate::cluster::{Locator, Server};
use serde::{Deserialize, Serialize};

/// Identifies the action a leaf phase performs when executed.
///
/// The executor collaborator interprets these tags; the builder only
/// produces them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutorKind {
    /// Update the runtime configuration package on the cluster
    UpdateConfig,
    /// Drain a node of its workloads
    Drain,
    /// Restart the runtime container so it picks up the new configuration
    RestartContainer,
    /// Taint a node to keep workloads off while it is updated
    Taint,
    /// Uncordon a node after its update
    Uncordon,
    /// Wait for cluster DNS/service endpoints to become available
    Endpoints,
    /// Remove the update taint from a node
    Untaint,
    /// Change which nodes participate in Kubernetes leader election
    Elections,
}

impl std::fmt::Display for ExecutorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            ExecutorKind::UpdateConfig => "update-config",
            ExecutorKind::Drain => "drain",
            ExecutorKind::RestartContainer => "restart-container",
            ExecutorKind::Taint => "taint",
            ExecutorKind::Uncordon => "uncordon",
            ExecutorKind::Endpoints => "endpoints",
            ExecutorKind::Untaint => "untaint",
            ExecutorKind::Elections => "elections",
        };
        write!(f, "{}", tag)
    }
}

/// Execution state of a phase, annotated in place by the executor
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhaseState {
    #[default]
    Unstarted,
    InProgress,
    Completed,
    Failed,
}

/// Leader election changes applied by an `elections` phase.
///
/// Both lists are carried verbatim to the executor. No disjointness is
/// enforced here; applying the change must be safe regardless of which
/// node currently holds leadership.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ElectionChange {
    /// Servers to enable leader election on
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enable_servers: Vec<Server>,

    /// Servers to disable leader election on
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disable_servers: Vec<Server>,
}

/// Parameters a leaf phase hands to its executor
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseData {
    /// The node the phase targets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<Server>,

    /// The node that runs the action against the target, when different
    /// from the target itself (e.g. draining node A with kubectl on node B)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exec_server: Option<Server>,

    /// Application package the phase applies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<Locator>,

    /// Leader election changes, for `elections` phases
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub election_change: Option<ElectionChange>,
}

/// A single unit of work in an operation plan
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    /// Full slash-joined path of this phase. Root phases are rooted at `/`;
    /// children live at `parent/child`. Unique plan-wide.
    pub id: String,

    /// Action tag for leaf phases; parent phases carry none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executor: Option<ExecutorKind>,

    /// Human-readable description, may embed the target hostname
    pub description: String,

    /// Executor parameters, absent on parent phases
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PhaseData>,

    /// Full IDs of phases that must complete before this one may start
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<String>,

    /// Child phases
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phases: Vec<Phase>,

    /// Execution state annotation
    #[serde(default)]
    pub state: PhaseState,
}

impl Phase {
    /// A parent phase grouping children under its ID namespace
    pub fn parent(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    /// A leaf phase with an executor tag and payload
    pub fn leaf(
        id: impl Into<String>,
        executor: ExecutorKind,
        description: impl Into<String>,
        data: PhaseData,
    ) -> Self {
        Self {
            id: id.into(),
            executor: Some(executor),
            description: description.into(),
            data: Some(data),
            ..Default::default()
        }
    }

    /// Depth-first walk over this phase and all of its descendants
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Phase)) {
        visit(self);
        for child in &self.phases {
            child.walk(visit);
        }
    }
}
