use std::cmp::Ordering;

use chrono::{DateTime, Utc};

/// Election priority assigned to the member expected to be primary.
pub const PRIMARY_PRIORITY: f64 = 10.0;

/// Baseline election priority for regular members.
pub const DEFAULT_PRIORITY: f64 = 1.0;

/// Baseline vote count for regular members.
pub const DEFAULT_VOTES: i32 = 1;

/// How a candidate relates to the replica set's current configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// The candidate must be inserted into the configuration.
    Add,
    /// The member backing this candidate must be removed from the
    /// configuration.
    Remove,
    /// The candidate matches an existing member.
    Unchanged,
}

/// A pod resolved into a potential replica set member.
///
/// Candidates are produced by the resolver with `change` set to
/// [`ChangeKind::Add`] and are annotated by the diff: matched candidates
/// become [`ChangeKind::Unchanged`] and inherit the member's numeric id, while
/// members without a backing pod are synthesized as [`ChangeKind::Remove`]
/// candidates.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberCandidate {
    /// Network identity in `host:port` form.
    pub host: String,
    /// Pod IP, kept for diagnostics. Absent on synthesized removal
    /// candidates.
    pub ip: Option<String>,
    /// Whether a running pod backs this candidate.
    pub is_running: bool,
    /// Numeric member id copied from the configuration when matched.
    pub replica_id: Option<i32>,
    /// Whether this candidate is expected to be the primary.
    pub is_primary: bool,
    /// Election priority to apply.
    pub priority: f64,
    /// Vote count to apply.
    pub votes: i32,
    /// Relation to the current configuration.
    pub change: ChangeKind,
    /// Creation timestamp of the backing pod, used for seniority ordering.
    pub created_at: Option<DateTime<Utc>>,
}

/// Orders candidates by seniority: older pods sort first.
///
/// Candidates without a creation timestamp sort after all timestamped ones,
/// and ties fall back to lexical host order so the result is deterministic.
pub fn compare_seniority(a: &MemberCandidate, b: &MemberCandidate) -> Ordering {
    match (a.created_at, b.created_at) {
        (Some(a_created), Some(b_created)) => {
            a_created.cmp(&b_created).then_with(|| a.host.cmp(&b.host))
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.host.cmp(&b.host),
    }
}
