use chrono::{DateTime, Duration, TimeZone, Utc};
use replset::cluster::memory::MemoryCluster;
use replset::replica::memory::MemoryReplicaSet;
use replset::sidecar::Sidecar;
use replset::types::PodRecord;
use replset_config::shared::{
    ClusterConfig, DatabaseBackendConfig, DatabaseConfig, ReconcileConfig, ReconfigConfig,
    RetryConfig, SidecarConfig, TlsConfig,
};

/// Fixed instant all pod creation timestamps are offsets from.
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

/// The stable DNS address a pod resolves to under [`fast_config`].
pub fn member_host(pod_name: &str) -> String {
    format!("{pod_name}.mongo.default.svc.cluster.local:27017")
}

/// Builds a sidecar configuration with timings short enough for tests.
///
/// The status freshness window is zero so every pass observes the live
/// replica set state; tests exercising the cache raise it explicitly.
pub fn fast_config() -> SidecarConfig {
    SidecarConfig {
        cluster: ClusterConfig {
            namespace: "default".to_string(),
            pod_label_selector: "app=mongo".to_string(),
            service_name: "mongo".to_string(),
            cluster_domain: "cluster.local".to_string(),
            external_domain: None,
        },
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
            status_freshness_secs: 0,
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

/// Creates a not-yet-started sidecar over in-memory collaborators with the
/// default test configuration.
pub fn create_sidecar(
    cluster: MemoryCluster,
    replica_set: MemoryReplicaSet,
) -> Sidecar<MemoryCluster, MemoryReplicaSet> {
    create_sidecar_with(fast_config(), cluster, replica_set)
}

/// Creates a not-yet-started sidecar with a custom configuration.
pub fn create_sidecar_with(
    config: SidecarConfig,
    cluster: MemoryCluster,
    replica_set: MemoryReplicaSet,
) -> Sidecar<MemoryCluster, MemoryReplicaSet> {
    Sidecar::new(config, cluster, replica_set)
}
