//! Errors raised while building and resolving operation plans

use crate::storage::StorageError;

/// Errors that can occur during plan construction and resolution
#[derive(Clone, Debug, PartialEq)]
pub enum PlanError {
    /// No master servers in the provided cluster state
    NoMasters,
    /// Two phases share the same full ID
    DuplicatePhase(String),
    /// A requirement references a phase that does not exist in the plan
    UnknownRequirement { phase: String, requirement: String },
    /// A phase requires itself
    CircularRequirement(String),
    /// Phase lookup by full ID failed
    PhaseNotFound(String),
    /// The backend does not support the requested operation
    NotImplemented(String),
    /// Storage-layer failure
    Storage(StorageError),
}

impl std::fmt::Display for PlanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanError::NoMasters => {
                write!(f, "no master servers found in cluster state")
            }
            PlanError::DuplicatePhase(id) => {
                write!(f, "duplicate phase ID '{}'", id)
            }
            PlanError::UnknownRequirement { phase, requirement } => {
                write!(
                    f,
                    "phase '{}' requires unknown phase '{}'",
                    phase, requirement
                )
            }
            PlanError::CircularRequirement(id) => {
                write!(f, "phase '{}' requires itself", id)
            }
            PlanError::PhaseNotFound(id) => {
                write!(f, "phase '{}' not found in plan", id)
            }
            PlanError::NotImplemented(msg) => {
                write!(f, "not implemented: {}", msg)
            }
            PlanError::Storage(err) => {
                write!(f, "storage error: {}", err)
            }
        }
    }
}

impl std::error::Error for PlanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlanError::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StorageError> for PlanError {
    fn from(err: StorageError) -> Self {
        PlanError::Storage(err)
    }
}
