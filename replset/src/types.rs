//! Typed documents exchanged with the replica set and the cluster API.
//!
//! The serde renames mirror the field names used by the database's admin
//! commands (`_id`, `stateStr`) so admin implementations can deserialize
//! server documents directly into these records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status code reported by the server when the replica set has never been
/// initiated.
pub const NOT_YET_INITIALIZED_CODE: i32 = 94;

/// Synthetic status code recorded when the status could not be fetched at all.
pub const UNREACHABLE_CODE: i32 = -1;

/// Member state string reported for the current primary.
const PRIMARY_STATE: &str = "PRIMARY";

/// The authoritative, versioned configuration document of a replica set.
///
/// The `version` field must be incremented by exactly 1 before every submitted
/// mutation; the server rejects submissions carrying a stale version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicaSetConfig {
    /// Name of the replica set.
    #[serde(rename = "_id")]
    pub id: String,
    /// Monotonically increasing configuration version.
    pub version: i64,
    /// Whether this replica set backs a sharded cluster's config servers.
    #[serde(default)]
    pub configsvr: bool,
    /// Ordered member list. Ids and hosts are unique within the list.
    pub members: Vec<ReplicaSetMember>,
}

impl ReplicaSetConfig {
    /// Returns the highest numeric member id, or `-1` when the member list is
    /// empty, so `max_member_id() + 1` is always a free id.
    pub fn max_member_id(&self) -> i32 {
        self.members.iter().map(|member| member.id).max().unwrap_or(-1)
    }

    /// Finds a member by host, matching case-insensitively.
    pub fn member_by_host(&self, host: &str) -> Option<&ReplicaSetMember> {
        self.members
            .iter()
            .find(|member| member.host.eq_ignore_ascii_case(host))
    }
}

/// A single member entry inside a [`ReplicaSetConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicaSetMember {
    /// Numeric member id, unique within the configuration.
    #[serde(rename = "_id")]
    pub id: i32,
    /// Network address of the member in `host:port` form.
    pub host: String,
    /// Election priority. The designated primary carries a raised priority.
    pub priority: f64,
    /// Number of votes this member holds in elections.
    pub votes: i32,
}

/// Live view of the replica set as reported by the status admin command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicaSetStatus {
    /// Name of the replica set. Empty when the set is not initiated yet.
    #[serde(default)]
    pub set: String,
    /// Whether the command succeeded on the server (`1`) or not (`0`).
    pub ok: i32,
    /// Domain status code: `0` healthy, [`NOT_YET_INITIALIZED_CODE`] when the
    /// set must be bootstrapped, anything else is abnormal.
    #[serde(default)]
    pub code: i32,
    /// Members currently known to the server.
    #[serde(default)]
    pub members: Vec<ReportedMember>,
}

impl ReplicaSetStatus {
    /// Builds the synthetic status representing a set that has never been
    /// initiated.
    pub fn uninitialized() -> Self {
        Self {
            set: String::new(),
            ok: 0,
            code: NOT_YET_INITIALIZED_CODE,
            members: Vec::new(),
        }
    }

    /// Builds the synthetic status recorded when the status fetch itself
    /// failed.
    pub fn unreachable() -> Self {
        Self {
            set: String::new(),
            ok: 0,
            code: UNREACHABLE_CODE,
            members: Vec::new(),
        }
    }
}

/// A member as reported inside [`ReplicaSetStatus`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportedMember {
    /// Numeric member id matching the configuration document.
    #[serde(rename = "_id")]
    pub id: i32,
    /// Network address of the member in `host:port` form.
    pub name: String,
    /// Server-reported state string, e.g. `PRIMARY` or `SECONDARY`.
    #[serde(rename = "stateStr")]
    pub state: String,
}

impl ReportedMember {
    /// Whether the server reports this member as the current primary.
    pub fn is_primary(&self) -> bool {
        self.state.eq_ignore_ascii_case(PRIMARY_STATE)
    }
}

/// A pod as reported by the cluster API, reduced to the fields the resolver
/// needs.
#[derive(Debug, Clone, PartialEq)]
pub struct PodRecord {
    /// Pod name.
    pub name: String,
    /// Namespace the pod lives in, when reported.
    pub namespace: Option<String>,
    /// Lifecycle phase string, e.g. `Running` or `Pending`.
    pub phase: Option<String>,
    /// Assigned pod IP, when one exists.
    pub pod_ip: Option<String>,
    /// Creation timestamp used for seniority ordering.
    pub created_at: Option<DateTime<Utc>>,
}

impl PodRecord {
    /// Whether the pod is in the `Running` phase.
    pub fn is_running(&self) -> bool {
        matches!(self.phase.as_deref(), Some("Running"))
    }
}
