pub mod builder;
pub mod error;
pub mod operation;
pub mod phase;
pub mod resolve;

pub use builder::{child_path, root};
pub use error::PlanError;
pub use operation::OperationPlan;
pub use phase::{ElectionChange, ExecutorKind, Phase, PhaseData, PhaseState};
pub use resolve::{find_phase, mark_phase_state, ready_phases, resolve_plan};
