use k8s_openapi::api::core::v1::Pod;
use kube::api::ListParams;
use kube::{Api, Client};

use crate::cluster::PodProvider;
use crate::error::ReplSetResult;
use crate::types::PodRecord;

/// Pod provider backed by the Kubernetes API server.
///
/// The client is cheap to clone and shares its connection pool across clones.
#[derive(Clone)]
pub struct KubernetesPods {
    client: Client,
}

impl KubernetesPods {
    /// Connects using the ambient cluster configuration, either the
    /// in-cluster service account or the local kubeconfig.
    pub async fn connect() -> ReplSetResult<Self> {
        let client = Client::try_default().await?;

        Ok(Self { client })
    }

    /// Wraps an already constructed [`Client`].
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl PodProvider for KubernetesPods {
    async fn list_pods(
        &self,
        namespace: &str,
        label_selector: &str,
    ) -> ReplSetResult<Vec<PodRecord>> {
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let pod_list = pods
            .list(&ListParams::default().labels(label_selector))
            .await?;

        let records = pod_list
            .items
            .into_iter()
            .map(|pod| {
                let status = pod.status.as_ref();

                PodRecord {
                    name: pod.metadata.name.clone().unwrap_or_default(),
                    namespace: pod.metadata.namespace.clone(),
                    phase: status.and_then(|status| status.phase.clone()),
                    pod_ip: status.and_then(|status| status.pod_ip.clone()),
                    created_at: pod.metadata.creation_timestamp.as_ref().map(|time| time.0),
                }
            })
            .collect();

        Ok(records)
    }
}
