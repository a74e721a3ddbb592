use replset_config::shared::ClusterConfig;
use tracing::warn;

use crate::membership::candidate::{DEFAULT_PRIORITY, DEFAULT_VOTES, ChangeKind, MemberCandidate};
use crate::types::PodRecord;

/// Resolves a pod into a member candidate, or drops it.
///
/// A pod is eligible only when it is in the `Running` phase and carries an
/// assigned IP. The preferred network identity is the cluster-DNS-stable
/// address derived from the pod name and the governing headless service,
/// which survives pod restarts. When the inputs for the stable form are
/// missing the resolver falls back to `ip:port` and logs a warning, since a
/// recreated pod will then come back under a different host.
pub fn resolve_candidate(
    pod: &PodRecord,
    cluster: &ClusterConfig,
    port: u16,
) -> Option<MemberCandidate> {
    if !pod.is_running() {
        return None;
    }
    let ip = pod.pod_ip.as_deref()?;

    let host = match stable_host(pod, cluster, port) {
        Some(host) => host,
        None => {
            warn!(
                pod = %pod.name,
                "pod is missing stable identity inputs, falling back to ip:port addressing"
            );

            format!("{ip}:{port}")
        }
    };

    Some(MemberCandidate {
        host,
        ip: Some(ip.to_string()),
        is_running: true,
        replica_id: None,
        is_primary: false,
        priority: DEFAULT_PRIORITY,
        votes: DEFAULT_VOTES,
        change: ChangeKind::Add,
        created_at: pod.created_at,
    })
}

/// Resolves all eligible pods, preserving the pod-list order.
pub fn resolve_candidates(
    pods: &[PodRecord],
    cluster: &ClusterConfig,
    port: u16,
) -> Vec<MemberCandidate> {
    pods.iter()
        .filter_map(|pod| resolve_candidate(pod, cluster, port))
        .collect()
}

/// Builds the cluster-DNS-stable address for a pod, or `None` when a required
/// input is missing.
///
/// When an external domain is configured the pod name is re-rooted under it,
/// keeping the port; the set is then reachable from outside the cluster.
fn stable_host(pod: &PodRecord, cluster: &ClusterConfig, port: u16) -> Option<String> {
    if pod.name.is_empty() {
        return None;
    }
    let namespace = pod.namespace.as_deref()?;

    let host = match &cluster.external_domain {
        Some(external_domain) => format!("{}.{}:{}", pod.name, external_domain, port),
        None => format!(
            "{}.{}.{}.svc.{}:{}",
            pod.name, cluster.service_name, namespace, cluster.cluster_domain, port
        ),
    };

    Some(host)
}
