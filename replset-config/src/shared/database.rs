use serde::{Deserialize, Serialize};

use crate::SerializableSecretString;
use crate::shared::ValidationError;

/// Configuration for the replica set and its admin connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Port the database listens on; appended to every member address.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Name of the database used for admin commands.
    #[serde(default = "default_name")]
    pub name: String,
    /// Replica set name, used when the set is first initiated.
    #[serde(default = "default_replica_set")]
    pub replica_set: String,
    /// Username for authenticating with the database, if any.
    #[serde(default)]
    pub username: Option<String>,
    /// Password for the specified user. Sensitive and redacted in debug output.
    #[serde(default)]
    pub password: Option<SerializableSecretString>,
    /// Whether the replica set acts as a sharding config server.
    #[serde(default)]
    pub configsvr: bool,
    /// TLS configuration for the admin connection.
    #[serde(default)]
    pub tls: TlsConfig,
    /// Admin command backend.
    pub backend: DatabaseBackendConfig,
}

fn default_port() -> u16 {
    27017
}

fn default_name() -> String {
    "local".to_string()
}

fn default_replica_set() -> String {
    "rs0".to_string()
}

impl DatabaseConfig {
    /// Validates the [`DatabaseConfig`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidConfig(
                "`database.port` must not be 0".to_string(),
            ));
        }

        self.tls.validate()
    }
}

/// Admin command backend selection.
///
/// The in-tree backend is an in-process simulated replica set; driver-backed
/// implementations plug in at the library's admin trait and are wired by the
/// embedding application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DatabaseBackendConfig {
    /// In-process simulated replica set.
    Memory,
}

/// TLS settings for the admin connection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TlsConfig {
    /// PEM-encoded trusted root certificates.
    #[serde(default)]
    pub trusted_root_certs: String,
    /// Whether TLS is enabled for the connection.
    #[serde(default)]
    pub enabled: bool,
}

impl TlsConfig {
    /// Validates the [`TlsConfig`].
    ///
    /// Returns [`ValidationError::MissingTrustedRootCerts`] if TLS is enabled
    /// but no certificates are provided.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.enabled && self.trusted_root_certs.is_empty() {
            return Err(ValidationError::MissingTrustedRootCerts);
        }

        Ok(())
    }
}
