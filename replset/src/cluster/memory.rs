use std::sync::Arc;
use tokio::sync::Mutex;

use crate::cluster::PodProvider;
use crate::error::ReplSetResult;
use crate::types::PodRecord;

#[derive(Debug)]
struct Inner {
    pods: Vec<PodRecord>,
}

/// In-memory pod provider used in tests and non-Kubernetes environments.
///
/// Pods are served in insertion order, mirroring the listing order guarantee
/// of the real cluster API.
#[derive(Debug, Clone)]
pub struct MemoryCluster {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryCluster {
    pub fn new() -> Self {
        let inner = Inner { pods: Vec::new() };

        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    /// Replaces the full pod list.
    pub async fn set_pods(&self, pods: Vec<PodRecord>) {
        let mut inner = self.inner.lock().await;
        inner.pods = pods;
    }

    /// Appends a pod to the list.
    pub async fn add_pod(&self, pod: PodRecord) {
        let mut inner = self.inner.lock().await;
        inner.pods.push(pod);
    }

    /// Removes the pod with the given name, if present.
    pub async fn remove_pod(&self, name: &str) {
        let mut inner = self.inner.lock().await;
        inner.pods.retain(|pod| pod.name != name);
    }
}

impl Default for MemoryCluster {
    fn default() -> Self {
        Self::new()
    }
}

impl PodProvider for MemoryCluster {
    async fn list_pods(
        &self,
        _namespace: &str,
        _label_selector: &str,
    ) -> ReplSetResult<Vec<PodRecord>> {
        // The memory cluster models a single namespace, so the filters are
        // accepted but not applied.
        let inner = self.inner.lock().await;

        Ok(inner.pods.clone())
    }
}
