use tracing::warn;

use crate::membership::candidate::{
    ChangeKind, DEFAULT_PRIORITY, DEFAULT_VOTES, MemberCandidate, PRIMARY_PRIORITY,
    compare_seniority,
};

/// Election priority applied to the outgoing primary while it steps down.
const STEPDOWN_PRIORITY: f64 = 0.0;

/// Vote count applied to the outgoing primary while it steps down.
const STEPDOWN_VOTES: i32 = 0;

/// Action carried by a single instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberAction {
    Add,
    Remove,
}

/// One atomic membership change to apply to the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconfigInstruction {
    /// Numeric member id when known; assigned at apply time otherwise.
    pub target_id: Option<i32>,
    /// Network identity of the affected member.
    pub host: String,
    pub action: MemberAction,
    /// Election priority to write into the member entry.
    pub priority: f64,
    /// Vote count to write into the member entry.
    pub votes: i32,
    /// The member is expected to take over as primary.
    pub is_primary_role: bool,
    /// The member is the outgoing primary being withdrawn.
    pub is_stepping_down: bool,
}

/// Ordered set of instructions for one reconciliation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcilePlan {
    pub instructions: Vec<ReconfigInstruction>,
    /// Whether the first two instructions form a primary hand-off and must be
    /// separated by stabilization waits.
    pub handoff: bool,
}

impl ReconcilePlan {
    pub fn empty() -> Self {
        Self {
            instructions: Vec::new(),
            handoff: false,
        }
    }

    /// Whether this pass has any mutation to apply.
    pub fn has_changes(&self) -> bool {
        !self.instructions.is_empty()
    }
}

/// Converts the annotated candidate list into an ordered plan.
///
/// When the candidate flagged as primary is also flagged for removal, the
/// current primary's pod is gone and a hand-off is required: the incoming
/// primary's ADD and the outgoing primary's REMOVE become the first two
/// instructions, in that order. All other changed candidates map to one
/// instruction each, preserving candidate order.
pub fn build_plan(candidates: &[MemberCandidate]) -> ReconcilePlan {
    let outgoing = candidates
        .iter()
        .find(|candidate| candidate.is_primary && candidate.change == ChangeKind::Remove);

    match outgoing {
        Some(outgoing) => handoff_plan(candidates, outgoing),
        None => ReconcilePlan {
            instructions: change_instructions(candidates, &[]),
            handoff: false,
        },
    }
}

fn handoff_plan(candidates: &[MemberCandidate], outgoing: &MemberCandidate) -> ReconcilePlan {
    let incoming = candidates
        .iter()
        .filter(|candidate| candidate.is_running && candidate.change != ChangeKind::Remove)
        .min_by(|a, b| compare_seniority(a, b));

    let Some(incoming) = incoming else {
        // Removing the last primary with nobody to take over would leave the
        // set headless. Keep the member around and let a later pass hand off
        // once a successor pod is running.
        warn!(
            outgoing = %outgoing.host,
            "primary pod is gone but no running successor exists, withholding its removal"
        );

        return ReconcilePlan {
            instructions: change_instructions(candidates, &[outgoing.host.as_str()]),
            handoff: false,
        };
    };

    let mut instructions = vec![
        ReconfigInstruction {
            target_id: incoming.replica_id,
            host: incoming.host.clone(),
            action: MemberAction::Add,
            priority: PRIMARY_PRIORITY,
            votes: DEFAULT_VOTES,
            is_primary_role: true,
            is_stepping_down: false,
        },
        ReconfigInstruction {
            target_id: outgoing.replica_id,
            host: outgoing.host.clone(),
            action: MemberAction::Remove,
            priority: STEPDOWN_PRIORITY,
            votes: STEPDOWN_VOTES,
            is_primary_role: false,
            is_stepping_down: true,
        },
    ];
    instructions.extend(change_instructions(
        candidates,
        &[incoming.host.as_str(), outgoing.host.as_str()],
    ));

    ReconcilePlan {
        instructions,
        handoff: true,
    }
}

/// Emits one baseline-priority instruction per changed candidate, skipping the
/// excluded hosts.
fn change_instructions(
    candidates: &[MemberCandidate],
    excluded_hosts: &[&str],
) -> Vec<ReconfigInstruction> {
    candidates
        .iter()
        .filter(|candidate| !excluded_hosts.contains(&candidate.host.as_str()))
        .filter_map(|candidate| {
            let action = match candidate.change {
                ChangeKind::Add => MemberAction::Add,
                ChangeKind::Remove => MemberAction::Remove,
                ChangeKind::Unchanged => return None,
            };

            Some(ReconfigInstruction {
                target_id: candidate.replica_id,
                host: candidate.host.clone(),
                action,
                priority: DEFAULT_PRIORITY,
                votes: DEFAULT_VOTES,
                is_primary_role: false,
                is_stepping_down: false,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::candidate;

    fn unchanged(host: &str, id: i32, created_secs: i64) -> MemberCandidate {
        let mut candidate = candidate(host, created_secs);
        candidate.change = ChangeKind::Unchanged;
        candidate.replica_id = Some(id);
        candidate
    }

    fn removed_primary(host: &str, id: i32) -> MemberCandidate {
        let mut candidate = candidate(host, 0);
        candidate.change = ChangeKind::Remove;
        candidate.replica_id = Some(id);
        candidate.is_running = false;
        candidate.is_primary = true;
        candidate.created_at = None;
        candidate
    }

    #[test]
    fn test_unchanged_candidates_produce_empty_plan() {
        let candidates = vec![unchanged("a:27017", 0, 10), unchanged("b:27017", 1, 20)];

        let plan = build_plan(&candidates);
        assert!(!plan.has_changes());
        assert!(!plan.handoff);
        assert_eq!(plan, ReconcilePlan::empty());
    }

    #[test]
    fn test_new_pod_maps_to_single_add() {
        let candidates = vec![
            unchanged("a:27017", 0, 10),
            unchanged("b:27017", 1, 20),
            candidate("c:27017", 30),
        ];

        let plan = build_plan(&candidates);
        assert!(!plan.handoff);
        assert_eq!(plan.instructions.len(), 1);

        let add = &plan.instructions[0];
        assert_eq!(add.host, "c:27017");
        assert_eq!(add.action, MemberAction::Add);
        assert_eq!(add.target_id, None);
        assert_eq!(add.priority, DEFAULT_PRIORITY);
        assert_eq!(add.votes, DEFAULT_VOTES);
        assert!(!add.is_primary_role);
        assert!(!add.is_stepping_down);
    }

    #[test]
    fn test_dead_secondary_maps_to_single_remove() {
        let mut dead = candidate("b:27017", 0);
        dead.change = ChangeKind::Remove;
        dead.replica_id = Some(1);
        dead.is_running = false;

        let candidates = vec![unchanged("a:27017", 0, 10), dead];

        let plan = build_plan(&candidates);
        assert!(!plan.handoff);
        assert_eq!(plan.instructions.len(), 1);
        assert_eq!(plan.instructions[0].action, MemberAction::Remove);
        assert_eq!(plan.instructions[0].target_id, Some(1));
        assert!(!plan.instructions[0].is_stepping_down);
    }

    #[test]
    fn test_handoff_orders_add_before_remove() {
        // The primary's pod is gone; b is older than c and must take over.
        let candidates = vec![
            unchanged("b:27017", 1, 10),
            unchanged("c:27017", 2, 20),
            removed_primary("a:27017", 0),
        ];

        let plan = build_plan(&candidates);
        assert!(plan.handoff);
        assert_eq!(plan.instructions.len(), 2);

        let add = &plan.instructions[0];
        assert_eq!(add.host, "b:27017");
        assert_eq!(add.action, MemberAction::Add);
        assert_eq!(add.target_id, Some(1));
        assert_eq!(add.priority, PRIMARY_PRIORITY);
        assert_eq!(add.votes, DEFAULT_VOTES);
        assert!(add.is_primary_role);

        let remove = &plan.instructions[1];
        assert_eq!(remove.host, "a:27017");
        assert_eq!(remove.action, MemberAction::Remove);
        assert_eq!(remove.target_id, Some(0));
        assert_eq!(remove.priority, STEPDOWN_PRIORITY);
        assert_eq!(remove.votes, STEPDOWN_VOTES);
        assert!(remove.is_stepping_down);
        assert!(!remove.is_primary_role);
    }

    #[test]
    fn test_handoff_keeps_remaining_changes_after_the_pair() {
        let mut dead = candidate("d:27017", 0);
        dead.change = ChangeKind::Remove;
        dead.replica_id = Some(3);
        dead.is_running = false;

        let candidates = vec![
            unchanged("b:27017", 1, 10),
            candidate("e:27017", 40),
            removed_primary("a:27017", 0),
            dead,
        ];

        let plan = build_plan(&candidates);
        assert!(plan.handoff);
        assert_eq!(plan.instructions.len(), 4);
        assert!(plan.instructions[0].is_primary_role);
        assert!(plan.instructions[1].is_stepping_down);
        assert_eq!(plan.instructions[2].host, "e:27017");
        assert_eq!(plan.instructions[2].action, MemberAction::Add);
        assert_eq!(plan.instructions[3].host, "d:27017");
        assert_eq!(plan.instructions[3].action, MemberAction::Remove);
    }

    #[test]
    fn test_handoff_prefers_new_pod_when_it_is_oldest() {
        // The only successor is a brand new pod that is not in the
        // configuration yet; its instruction stays an insertion but takes the
        // primary role.
        let candidates = vec![candidate("b:27017", 10), removed_primary("a:27017", 0)];

        let plan = build_plan(&candidates);
        assert!(plan.handoff);
        assert_eq!(plan.instructions.len(), 2);
        assert_eq!(plan.instructions[0].host, "b:27017");
        assert_eq!(plan.instructions[0].target_id, None);
        assert!(plan.instructions[0].is_primary_role);
    }

    #[test]
    fn test_handoff_without_successor_withholds_removal() {
        let mut dead = candidate("b:27017", 0);
        dead.change = ChangeKind::Remove;
        dead.replica_id = Some(1);
        dead.is_running = false;
        dead.created_at = None;

        let candidates = vec![removed_primary("a:27017", 0), dead];

        let plan = build_plan(&candidates);
        assert!(!plan.handoff);
        assert_eq!(plan.instructions.len(), 1);
        // Only the dead secondary is removed; the primary survives until a
        // successor pod shows up.
        assert_eq!(plan.instructions[0].host, "b:27017");
        assert_eq!(plan.instructions[0].action, MemberAction::Remove);
    }
}
