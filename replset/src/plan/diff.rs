use tracing::warn;

use crate::membership::candidate::{
    ChangeKind, DEFAULT_PRIORITY, DEFAULT_VOTES, MemberCandidate, PRIMARY_PRIORITY,
    compare_seniority,
};
use crate::types::ReplicaSetStatus;

/// Annotates candidates against the members reported by the replica set.
///
/// Matched candidates are downgraded to [`ChangeKind::Unchanged`] and inherit
/// their member's numeric id; reported members without a backing candidate are
/// synthesized as [`ChangeKind::Remove`] candidates. At most one candidate per
/// pass is trusted as primary: the first member the server reports as primary
/// wins, and any further primary claim is logged and ignored. When the server
/// reports no primary at all among the candidates, the most senior running
/// candidate is elected.
///
/// The function is pure: the same `(candidates, status)` pair always yields
/// the same annotated list.
pub fn diff_members(
    mut candidates: Vec<MemberCandidate>,
    status: &ReplicaSetStatus,
) -> Vec<MemberCandidate> {
    let mut primary_seen = false;

    for member in &status.members {
        let matched = candidates
            .iter_mut()
            .find(|candidate| candidate.host.eq_ignore_ascii_case(&member.name));

        let claims_primary = member.is_primary();
        let trusted_primary = claims_primary && !primary_seen;
        if claims_primary && primary_seen {
            warn!(
                member = %member.name,
                "another member already claims primary this pass, keeping baseline priority"
            );
        }

        match matched {
            Some(candidate) => {
                candidate.change = ChangeKind::Unchanged;
                candidate.replica_id = Some(member.id);
                candidate.priority = DEFAULT_PRIORITY;
                candidate.votes = DEFAULT_VOTES;

                if trusted_primary {
                    candidate.is_primary = true;
                    candidate.priority = PRIMARY_PRIORITY;
                }
            }
            None => {
                // A member whose backing pod is gone; flag it for removal.
                candidates.push(MemberCandidate {
                    host: member.name.clone(),
                    ip: None,
                    is_running: false,
                    replica_id: Some(member.id),
                    is_primary: trusted_primary,
                    priority: DEFAULT_PRIORITY,
                    votes: DEFAULT_VOTES,
                    change: ChangeKind::Remove,
                    created_at: None,
                });
            }
        }

        if trusted_primary {
            primary_seen = true;
        }
    }

    if !primary_seen
        && let Some(index) = elect_primary_index(&candidates)
    {
        candidates[index].is_primary = true;
        candidates[index].priority = PRIMARY_PRIORITY;
    }

    candidates
}

/// Picks the most senior running candidate as primary, if any exists.
///
/// The election never changes a candidate's [`ChangeKind`]: an elected
/// candidate that already exists in the configuration stays
/// [`ChangeKind::Unchanged`].
fn elect_primary_index(candidates: &[MemberCandidate]) -> Option<usize> {
    candidates
        .iter()
        .enumerate()
        .filter(|(_, candidate)| candidate.is_running)
        .min_by(|(_, a), (_, b)| compare_seniority(a, b))
        .map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::{candidate, healthy_status, reported};

    #[test]
    fn test_matched_members_become_unchanged_with_ids() {
        let candidates = vec![candidate("a:27017", 10), candidate("b:27017", 20)];
        let status = healthy_status(
            "rs0",
            vec![
                reported(0, "a:27017", "PRIMARY"),
                reported(1, "b:27017", "SECONDARY"),
            ],
        );

        let annotated = diff_members(candidates, &status);
        assert_eq!(annotated.len(), 2);
        assert_eq!(annotated[0].change, ChangeKind::Unchanged);
        assert_eq!(annotated[0].replica_id, Some(0));
        assert!(annotated[0].is_primary);
        assert_eq!(annotated[0].priority, PRIMARY_PRIORITY);
        assert_eq!(annotated[1].change, ChangeKind::Unchanged);
        assert_eq!(annotated[1].replica_id, Some(1));
        assert!(!annotated[1].is_primary);
        assert_eq!(annotated[1].priority, DEFAULT_PRIORITY);
    }

    #[test]
    fn test_host_matching_is_case_insensitive() {
        let candidates = vec![candidate("DB-0.Mongo.Default.svc.cluster.local:27017", 10)];
        let status = healthy_status(
            "rs0",
            vec![reported(
                0,
                "db-0.mongo.default.svc.cluster.local:27017",
                "PRIMARY",
            )],
        );

        let annotated = diff_members(candidates, &status);
        assert_eq!(annotated[0].change, ChangeKind::Unchanged);
        assert_eq!(annotated[0].replica_id, Some(0));
    }

    #[test]
    fn test_first_reported_primary_wins() {
        let candidates = vec![candidate("a:27017", 10), candidate("b:27017", 20)];
        let status = healthy_status(
            "rs0",
            vec![
                reported(0, "a:27017", "PRIMARY"),
                reported(1, "b:27017", "PRIMARY"),
            ],
        );

        let annotated = diff_members(candidates, &status);
        assert!(annotated[0].is_primary);
        assert_eq!(annotated[0].priority, PRIMARY_PRIORITY);
        assert!(!annotated[1].is_primary);
        assert_eq!(annotated[1].priority, DEFAULT_PRIORITY);
    }

    #[test]
    fn test_missing_member_synthesized_for_removal() {
        let candidates = vec![candidate("b:27017", 20)];
        let status = healthy_status(
            "rs0",
            vec![
                reported(0, "a:27017", "PRIMARY"),
                reported(1, "b:27017", "SECONDARY"),
            ],
        );

        let annotated = diff_members(candidates, &status);
        assert_eq!(annotated.len(), 2);

        let synthesized = &annotated[1];
        assert_eq!(synthesized.host, "a:27017");
        assert_eq!(synthesized.change, ChangeKind::Remove);
        assert_eq!(synthesized.replica_id, Some(0));
        assert!(!synthesized.is_running);
        // The dead pod was the reported primary, so the hand-off trigger must
        // survive the synthesis.
        assert!(synthesized.is_primary);
    }

    #[test]
    fn test_election_picks_oldest_running_candidate() {
        let candidates = vec![
            candidate("b:27017", 30),
            candidate("a:27017", 10),
            candidate("c:27017", 20),
        ];
        let status = healthy_status("rs0", Vec::new());

        let annotated = diff_members(candidates, &status);
        assert!(!annotated[0].is_primary);
        assert!(annotated[1].is_primary);
        assert_eq!(annotated[1].priority, PRIMARY_PRIORITY);
        // Election never touches the change kind.
        assert_eq!(annotated[1].change, ChangeKind::Add);
        assert!(!annotated[2].is_primary);
    }

    #[test]
    fn test_election_keeps_matched_candidate_unchanged() {
        let candidates = vec![candidate("a:27017", 10), candidate("b:27017", 20)];
        // The server reports both members but no primary, e.g. mid-election.
        let status = healthy_status(
            "rs0",
            vec![
                reported(0, "a:27017", "SECONDARY"),
                reported(1, "b:27017", "SECONDARY"),
            ],
        );

        let annotated = diff_members(candidates, &status);
        assert!(annotated[0].is_primary);
        assert_eq!(annotated[0].change, ChangeKind::Unchanged);
        assert_eq!(annotated[0].priority, PRIMARY_PRIORITY);
    }

    #[test]
    fn test_election_skips_non_running_candidates() {
        let candidates = vec![candidate("b:27017", 20)];
        let status = healthy_status("rs0", vec![reported(0, "a:27017", "SECONDARY")]);

        let annotated = diff_members(candidates, &status);
        // The synthesized removal candidate is older by host order but not
        // running, so the live pod wins.
        let primary: Vec<_> = annotated
            .iter()
            .filter(|candidate| candidate.is_primary)
            .collect();
        assert_eq!(primary.len(), 1);
        assert_eq!(primary[0].host, "b:27017");
    }

    #[test]
    fn test_no_running_candidates_elects_nobody() {
        let candidates: Vec<MemberCandidate> = Vec::new();
        let status = healthy_status("rs0", vec![reported(0, "a:27017", "SECONDARY")]);

        let annotated = diff_members(candidates, &status);
        assert_eq!(annotated.len(), 1);
        assert!(annotated.iter().all(|candidate| !candidate.is_primary));
    }

    #[test]
    fn test_diff_is_pure() {
        let candidates = vec![candidate("a:27017", 10), candidate("b:27017", 20)];
        let status = healthy_status(
            "rs0",
            vec![
                reported(0, "a:27017", "PRIMARY"),
                reported(2, "c:27017", "SECONDARY"),
            ],
        );

        let first = diff_members(candidates.clone(), &status);
        let second = diff_members(candidates, &status);
        assert_eq!(first, second);
    }
}
