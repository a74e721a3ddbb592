use replset::cluster::PodProvider;
use replset::cluster::kubernetes::KubernetesPods;
use replset::replica::ReplicaSetAdmin;
use replset::replica::memory::MemoryReplicaSet;
use replset::sidecar::Sidecar;
use replset_config::shared::{
    ClusterConfig, DatabaseBackendConfig, DatabaseConfig, ReconcileConfig, ReconfigConfig,
    SidecarConfig,
};
use tokio::signal::unix::{SignalKind, signal};
use tracing::{debug, info, warn};

/// Starts the sidecar service with the provided configuration.
///
/// Connects to the cluster API, creates the admin backend selected by the
/// configuration, and runs the sidecar until it is shut down.
pub async fn start_sidecar_with_config(sidecar_config: SidecarConfig) -> anyhow::Result<()> {
    info!("starting sidecar service");

    log_config(&sidecar_config);

    // The pod view always comes from the live cluster; the admin backend is
    // the configurable half.
    let cluster = KubernetesPods::connect().await?;

    // For each backend, we start the sidecar. This is more verbose due to static dispatch, but
    // we prefer more performance at the cost of ergonomics.
    match &sidecar_config.database.backend {
        DatabaseBackendConfig::Memory => {
            let admin = MemoryReplicaSet::new(
                &sidecar_config.database.replica_set,
                sidecar_config.database.configsvr,
            );

            let sidecar = Sidecar::new(sidecar_config, cluster, admin);
            start_sidecar(sidecar).await?;
        }
    }

    info!("sidecar service completed");

    Ok(())
}

fn log_config(config: &SidecarConfig) {
    log_cluster_config(&config.cluster);
    log_database_config(&config.database);
    log_reconcile_config(&config.reconcile);
    log_reconfig_config(&config.reconfig);
}

fn log_cluster_config(config: &ClusterConfig) {
    debug!(
        namespace = config.namespace,
        pod_label_selector = config.pod_label_selector,
        service_name = config.service_name,
        cluster_domain = config.cluster_domain,
        external_domain = ?config.external_domain,
        "cluster config"
    );
}

fn log_database_config(config: &DatabaseConfig) {
    debug!(
        port = config.port,
        dbname = config.name,
        replica_set = config.replica_set,
        configsvr = config.configsvr,
        tls_enabled = config.tls.enabled,
        "database config"
    );
}

fn log_reconcile_config(config: &ReconcileConfig) {
    debug!(
        sleep_secs = config.sleep_secs,
        status_freshness_secs = config.status_freshness_secs,
        "reconcile config"
    );
}

fn log_reconfig_config(config: &ReconfigConfig) {
    debug!(
        max_attempts = config.retry.max_attempts,
        initial_delay_ms = config.retry.initial_delay_ms,
        max_delay_ms = config.retry.max_delay_ms,
        backoff_factor = config.retry.backoff_factor,
        handoff_catch_up_ms = config.handoff_catch_up_ms,
        handoff_settle_ms = config.handoff_settle_ms,
        "reconfig config"
    );
}

/// Starts a sidecar and handles graceful shutdown signals.
///
/// Launches the sidecar, sets up signal handlers for SIGTERM and SIGINT,
/// and ensures proper cleanup on shutdown. A reconciliation pass already in
/// flight is allowed to finish before the process exits.
#[tracing::instrument(skip(sidecar), fields(replica_set = sidecar.replica_set()))]
async fn start_sidecar<C, A>(mut sidecar: Sidecar<C, A>) -> anyhow::Result<()>
where
    C: PodProvider + Clone + Send + Sync + 'static,
    A: ReplicaSetAdmin + Clone + Send + Sync + 'static,
{
    // Start the sidecar.
    sidecar.start().await?;

    // Spawn a task to listen for shutdown signals and trigger shutdown.
    let shutdown_tx = sidecar.shutdown_tx();
    let shutdown_handle = tokio::spawn(async move {
        // Listen for SIGTERM, sent by Kubernetes before SIGKILL during pod termination.
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to register SIGTERM handler");

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("SIGINT (Ctrl+C) received, shutting down sidecar");
            }
            _ = sigterm.recv() => {
                info!("SIGTERM received, shutting down sidecar");
            }
        }

        if let Err(e) = shutdown_tx.shutdown() {
            warn!("failed to send shutdown signal: {:?}", e);
            return;
        }

        info!("sidecar shutdown successfully")
    });

    // Wait for the sidecar to finish (either normally or via shutdown).
    let result = sidecar.wait().await;

    // Ensure the shutdown task is finished before returning.
    // If the sidecar finished before a signal arrived, the task is still
    // waiting and must be aborted.
    shutdown_handle.abort();
    let _ = shutdown_handle.await;

    // Propagate any sidecar error as anyhow error.
    result?;

    Ok(())
}
