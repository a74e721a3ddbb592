use serde::{Deserialize, Serialize};

use crate::shared::ValidationError;

/// Configuration for locating the database pods inside the cluster.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ClusterConfig {
    /// Namespace whose pods back the replica set.
    pub namespace: String,
    /// Label selector identifying the database pods, e.g. `app=mongo`.
    pub pod_label_selector: String,
    /// Name of the governing headless service, used to build stable
    /// per-pod DNS names.
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Cluster DNS domain suffix.
    #[serde(default = "default_cluster_domain")]
    pub cluster_domain: String,
    /// Optional external domain. When set, member addresses are rewritten to
    /// `{pod}.{external_domain}:{port}` so the replica set is reachable from
    /// outside the cluster.
    #[serde(default)]
    pub external_domain: Option<String>,
}

fn default_service_name() -> String {
    "mongo".to_string()
}

fn default_cluster_domain() -> String {
    "cluster.local".to_string()
}

impl ClusterConfig {
    /// Validates the [`ClusterConfig`].
    ///
    /// The namespace and pod label selector have no sensible defaults and must
    /// be supplied.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.namespace.is_empty() {
            return Err(ValidationError::MissingNamespace);
        }

        if self.pod_label_selector.is_empty() {
            return Err(ValidationError::MissingPodLabelSelector);
        }

        Ok(())
    }
}
