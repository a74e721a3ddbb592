use serde::{Deserialize, Serialize};

use crate::shared::{
    ClusterConfig, DatabaseConfig, ReconcileConfig, ReconfigConfig, ValidationError,
};

/// Top-level configuration for the sidecar process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SidecarConfig {
    /// Pod discovery settings.
    pub cluster: ClusterConfig,
    /// Replica set and admin connection settings.
    pub database: DatabaseConfig,
    /// Reconciliation loop cadence.
    #[serde(default)]
    pub reconcile: ReconcileConfig,
    /// Reconfiguration retry and hand-off settings.
    #[serde(default)]
    pub reconfig: ReconfigConfig,
}

impl SidecarConfig {
    /// Validates the [`SidecarConfig`] and all its sections.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.cluster.validate()?;
        self.database.validate()?;
        self.reconcile.validate()?;
        self.reconfig.validate()?;

        Ok(())
    }
}
