//! Plan resolution
//!
//! Validates the structure of a finished plan and answers the readiness
//! queries the executor needs to schedule phases. Resolution is where
//! builder mistakes surface: every `requires` entry must reference an
//! existing phase and every full ID must be unique plan-wide before any
//! phase is dispatched.

use crate::plan::{OperationPlan, Phase, PhaseState, PlanError};
use std::collections::HashSet;

/// Validates the plan's phase forest and normalizes execution state.
///
/// Checks plan-wide ID uniqueness, that every requirement resolves to an
/// existing phase, and that no phase requires itself. All phase states are
/// reset to unstarted.
pub fn resolve_plan(plan: &mut OperationPlan) -> Result<(), PlanError> {
    let mut ids = HashSet::new();
    for phase in plan.flatten() {
        if !ids.insert(phase.id.clone()) {
            return Err(PlanError::DuplicatePhase(phase.id.clone()));
        }
    }
    for phase in plan.flatten() {
        for requirement in &phase.requires {
            if requirement == &phase.id {
                return Err(PlanError::CircularRequirement(phase.id.clone()));
            }
            if !ids.contains(requirement) {
                return Err(PlanError::UnknownRequirement {
                    phase: phase.id.clone(),
                    requirement: requirement.clone(),
                });
            }
        }
    }
    for phase in &mut plan.phases {
        reset_state(phase);
    }
    Ok(())
}

fn reset_state(phase: &mut Phase) {
    phase.state = PhaseState::Unstarted;
    for child in &mut phase.phases {
        reset_state(child);
    }
}

/// Looks up a phase anywhere in the plan by its full ID
pub fn find_phase<'a>(plan: &'a OperationPlan, id: &str) -> Option<&'a Phase> {
    fn find<'a>(phase: &'a Phase, id: &str) -> Option<&'a Phase> {
        if phase.id == id {
            return Some(phase);
        }
        phase.phases.iter().find_map(|child| find(child, id))
    }
    plan.phases.iter().find_map(|phase| find(phase, id))
}

/// Sets the execution state of the phase with the given full ID
pub fn mark_phase_state(
    plan: &mut OperationPlan,
    id: &str,
    state: PhaseState,
) -> Result<(), PlanError> {
    fn mark(phase: &mut Phase, id: &str, state: PhaseState) -> bool {
        if phase.id == id {
            phase.state = state;
            return true;
        }
        phase.phases.iter_mut().any(|child| mark(child, id, state))
    }
    if plan
        .phases
        .iter_mut()
        .any(|phase| mark(phase, id, state))
    {
        Ok(())
    } else {
        Err(PlanError::PhaseNotFound(id.to_string()))
    }
}

/// Leaf phases that are eligible to run now: unstarted, with their own and
/// every ancestor's requirements satisfied. Phases under an unsatisfied
/// parent are not eligible regardless of their own edges.
pub fn ready_phases(plan: &OperationPlan) -> Vec<&Phase> {
    let mut ready = Vec::new();
    for phase in &plan.phases {
        collect_ready(plan, phase, &mut ready);
    }
    ready
}

fn collect_ready<'a>(plan: &'a OperationPlan, phase: &'a Phase, out: &mut Vec<&'a Phase>) {
    let satisfied = phase
        .requires
        .iter()
        .all(|requirement| requirement_satisfied(plan, requirement));
    if !satisfied {
        return;
    }
    if phase.phases.is_empty() {
        if phase.state == PhaseState::Unstarted {
            out.push(phase);
        }
        return;
    }
    for child in &phase.phases {
        collect_ready(plan, child, out);
    }
}

/// A requirement on a parent phase is satisfied once the whole subtree is
/// complete; on a leaf, once the leaf itself completed.
fn requirement_satisfied(plan: &OperationPlan, id: &str) -> bool {
    match find_phase(plan, id) {
        Some(phase) => subtree_complete(phase),
        None => false,
    }
}

fn subtree_complete(phase: &Phase) -> bool {
    if phase.phases.is_empty() {
        return phase.state == PhaseState::Completed;
    }
    phase.phases.iter().all(subtree_complete)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{DnsConfig, OperationType};
    use crate::plan::{root, ExecutorKind, PhaseData};
    use chrono::Utc;

    fn leaf(id: &str) -> Phase {
        Phase::leaf(id, ExecutorKind::Drain, id, PhaseData::default())
    }

    fn plan_with_phases(phases: Vec<Phase>) -> OperationPlan {
        OperationPlan {
            operation_id: "op1".to_string(),
            operation_type: OperationType::ConfigUpdate,
            account_id: "acct".to_string(),
            cluster_name: "cluster1".to_string(),
            dns_config: DnsConfig::default(),
            servers: Vec::new(),
            phases,
            created: Utc::now(),
        }
    }

    fn two_root_plan() -> OperationPlan {
        let config = root(leaf("config"));
        let mut steps = root(Phase::parent("steps", "steps"));
        steps.add_sequential(vec![leaf("a"), leaf("b")]);
        plan_with_phases(vec![config, steps])
    }

    // === Validation ===

    #[test]
    fn test_resolve_accepts_well_formed_plan() {
        let mut plan = two_root_plan();
        resolve_plan(&mut plan).expect("Should resolve well-formed plan");
    }

    #[test]
    fn test_resolve_rejects_unknown_requirement() {
        let mut config = root(leaf("config"));
        config.require_id("/missing");
        let mut plan = plan_with_phases(vec![config]);
        assert_eq!(
            resolve_plan(&mut plan),
            Err(PlanError::UnknownRequirement {
                phase: "/config".to_string(),
                requirement: "/missing".to_string(),
            })
        );
    }

    #[test]
    fn test_resolve_rejects_duplicate_ids() {
        let mut plan = plan_with_phases(vec![root(leaf("config")), root(leaf("config"))]);
        assert_eq!(
            resolve_plan(&mut plan),
            Err(PlanError::DuplicatePhase("/config".to_string()))
        );
    }

    #[test]
    fn test_resolve_rejects_self_requirement() {
        let mut config = root(leaf("config"));
        config.require_id("/config");
        let mut plan = plan_with_phases(vec![config]);
        assert_eq!(
            resolve_plan(&mut plan),
            Err(PlanError::CircularRequirement("/config".to_string()))
        );
    }

    // === Readiness ===

    #[test]
    fn test_ready_frontier_progression() {
        let mut plan = two_root_plan();
        resolve_plan(&mut plan).expect("Should resolve");

        let ready: Vec<_> = ready_phases(&plan).iter().map(|p| p.id.clone()).collect();
        assert_eq!(ready, vec!["/config".to_string(), "/steps/a".to_string()]);

        mark_phase_state(&mut plan, "/steps/a", PhaseState::Completed)
            .expect("Should mark phase");
        let ready: Vec<_> = ready_phases(&plan).iter().map(|p| p.id.clone()).collect();
        assert_eq!(ready, vec!["/config".to_string(), "/steps/b".to_string()]);
    }

    #[test]
    fn test_parent_requirement_needs_whole_subtree() {
        let mut steps = root(Phase::parent("steps", "steps"));
        steps.add_sequential(vec![leaf("a"), leaf("b")]);
        let mut after = root(leaf("after"));
        after.require_id("/steps");
        let mut plan = plan_with_phases(vec![steps, after]);
        resolve_plan(&mut plan).expect("Should resolve");

        mark_phase_state(&mut plan, "/steps/a", PhaseState::Completed)
            .expect("Should mark phase");
        let ready: Vec<_> = ready_phases(&plan).iter().map(|p| p.id.clone()).collect();
        assert_eq!(ready, vec!["/steps/b".to_string()]);

        mark_phase_state(&mut plan, "/steps/b", PhaseState::Completed)
            .expect("Should mark phase");
        let ready: Vec<_> = ready_phases(&plan).iter().map(|p| p.id.clone()).collect();
        assert_eq!(ready, vec!["/after".to_string()]);
    }

    #[test]
    fn test_mark_unknown_phase_fails() {
        let mut plan = two_root_plan();
        assert_eq!(
            mark_phase_state(&mut plan, "/nope", PhaseState::Completed),
            Err(PlanError::PhaseNotFound("/nope".to_string()))
        );
    }
}
