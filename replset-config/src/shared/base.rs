use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// TLS is enabled but no trusted root certificates are provided.
    #[error("Invalid TLS config: `trusted_root_certs` must be set when `enabled` is true")]
    MissingTrustedRootCerts,

    /// The cluster namespace is empty.
    #[error("Invalid cluster config: `namespace` must not be empty")]
    MissingNamespace,

    /// The pod label selector is empty.
    #[error("Invalid cluster config: `pod_label_selector` must not be empty")]
    MissingPodLabelSelector,

    /// General configuration validation error.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
