use chrono::{DateTime, Duration, TimeZone, Utc};
use replset_config::shared::{
    ClusterConfig, DatabaseBackendConfig, DatabaseConfig, ReconcileConfig, ReconfigConfig,
    RetryConfig, SidecarConfig, TlsConfig,
};

use crate::membership::candidate::{ChangeKind, DEFAULT_PRIORITY, DEFAULT_VOTES, MemberCandidate};
use crate::types::{
    PodRecord, ReplicaSetConfig, ReplicaSetMember, ReplicaSetStatus, ReportedMember,
};

/// Fixed instant all fixture timestamps are offsets from.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// Builds a running pod in the `default` namespace.
pub fn running_pod(name: &str, ip: &str, created_secs: i64) -> PodRecord {
    PodRecord {
        name: name.to_string(),
        namespace: Some("default".to_string()),
        phase: Some("Running".to_string()),
        pod_ip: Some(ip.to_string()),
        created_at: Some(base_time() + Duration::seconds(created_secs)),
    }
}

/// Builds a freshly resolved candidate flagged for insertion.
pub fn candidate(host: &str, created_secs: i64) -> MemberCandidate {
    MemberCandidate {
        host: host.to_string(),
        ip: None,
        is_running: true,
        replica_id: None,
        is_primary: false,
        priority: DEFAULT_PRIORITY,
        votes: DEFAULT_VOTES,
        change: ChangeKind::Add,
        created_at: Some(base_time() + Duration::seconds(created_secs)),
    }
}

/// Builds a member entry as reported by the status command.
pub fn reported(id: i32, name: &str, state: &str) -> ReportedMember {
    ReportedMember {
        id,
        name: name.to_string(),
        state: state.to_string(),
    }
}

/// Builds a healthy status document with the given reported members.
pub fn healthy_status(set: &str, members: Vec<ReportedMember>) -> ReplicaSetStatus {
    ReplicaSetStatus {
        set: set.to_string(),
        ok: 1,
        code: 0,
        members,
    }
}

/// Builds a configuration member entry with baseline priority and votes.
pub fn config_member(id: i32, host: &str) -> ReplicaSetMember {
    ReplicaSetMember {
        id,
        host: host.to_string(),
        priority: DEFAULT_PRIORITY,
        votes: DEFAULT_VOTES,
    }
}

/// Builds a configuration document for a non-configsvr set.
pub fn replica_config(set: &str, version: i64, members: Vec<ReplicaSetMember>) -> ReplicaSetConfig {
    ReplicaSetConfig {
        id: set.to_string(),
        version,
        configsvr: false,
        members,
    }
}

/// Builds a cluster section with the conventional service and domain names.
pub fn cluster_config(namespace: &str) -> ClusterConfig {
    ClusterConfig {
        namespace: namespace.to_string(),
        pod_label_selector: "app=mongo".to_string(),
        service_name: "mongo".to_string(),
        cluster_domain: "cluster.local".to_string(),
        external_domain: None,
    }
}

/// Builds a full sidecar configuration with timings short enough for tests.
///
/// Retry delays and hand-off waits are a few milliseconds so executor paths
/// that sleep stay fast under test.
pub fn fast_sidecar_config(namespace: &str) -> SidecarConfig {
    SidecarConfig {
        cluster: cluster_config(namespace),
        database: DatabaseConfig {
            port: 27017,
            name: "local".to_string(),
            replica_set: "rs0".to_string(),
            username: None,
            password: None,
            configsvr: false,
            tls: TlsConfig::default(),
            backend: DatabaseBackendConfig::Memory,
        },
        reconcile: ReconcileConfig {
            sleep_secs: 1,
            status_freshness_secs: 60,
        },
        reconfig: ReconfigConfig {
            retry: RetryConfig {
                max_attempts: 20,
                initial_delay_ms: 5,
                max_delay_ms: 5,
                backoff_factor: 1.0,
            },
            handoff_catch_up_ms: 10,
            handoff_settle_ms: 20,
        },
    }
}
