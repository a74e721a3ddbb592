//! Core sidecar orchestration and execution.
//!
//! Contains the main [`Sidecar`] struct that wires the cluster view, the
//! replica set admin connection, and the reconcile worker together, and that
//! coordinates startup and graceful shutdown.

use std::sync::Arc;

use replset_config::shared::SidecarConfig;
use tracing::{error, info};

use crate::cluster::PodProvider;
use crate::concurrency::shutdown::{ShutdownTx, create_shutdown_channel};
use crate::error::ReplSetResult;
use crate::replica::ReplicaSetAdmin;
use crate::workers::base::{Worker, WorkerHandle};
use crate::workers::reconcile::{ReconcileWorker, ReconcileWorkerHandle};

/// Internal state tracking for sidecar lifecycle.
///
/// The sidecar can only be in one of these states at a time.
#[derive(Debug)]
enum SidecarState {
    /// Sidecar has been created but not yet started.
    NotStarted,
    /// Sidecar is running with an active reconcile worker.
    Started {
        reconcile_worker: ReconcileWorkerHandle,
    },
}

/// Headless controller keeping a replica set's membership in sync with the
/// cluster pods backing it.
///
/// A [`Sidecar`] owns no listener and exposes no surface beyond start and
/// shutdown: once started, the reconcile worker wakes up on a fixed cadence,
/// compares the pods matching the configured selector with the members the
/// replica set reports, and applies whatever membership changes are needed.
/// The process is expected to run alongside the database it controls.
#[derive(Debug)]
pub struct Sidecar<C, A> {
    config: Arc<SidecarConfig>,
    cluster: C,
    admin: A,
    state: SidecarState,
    shutdown_tx: ShutdownTx,
}

impl<C, A> Sidecar<C, A>
where
    C: PodProvider + Clone + Send + Sync + 'static,
    A: ReplicaSetAdmin + Clone + Send + Sync + 'static,
{
    /// Creates a new sidecar with the given configuration.
    ///
    /// The sidecar is initially in the not-started state and must be
    /// explicitly started using [`Sidecar::start`]. The cluster collaborator
    /// provides the read-only pod view, while the admin collaborator carries
    /// the replica set commands.
    pub fn new(config: SidecarConfig, cluster: C, admin: A) -> Self {
        // The receiving half is not kept around, workers subscribe through
        // the sender when they are started.
        let (shutdown_tx, _) = create_shutdown_channel();

        Self {
            config: Arc::new(config),
            cluster,
            admin,
            state: SidecarState::NotStarted,
            shutdown_tx,
        }
    }

    /// Returns the name of the replica set this sidecar controls.
    pub fn replica_set(&self) -> &str {
        &self.config.database.replica_set
    }

    /// Returns a handle for sending shutdown signals to this sidecar.
    ///
    /// Multiple components can hold shutdown handles; the first signal wins
    /// and the rest are no-ops.
    pub fn shutdown_tx(&self) -> ShutdownTx {
        self.shutdown_tx.clone()
    }

    /// Starts the sidecar and begins reconciling.
    ///
    /// The admin connection is established eagerly so misconfiguration
    /// surfaces here rather than inside the first pass, then the reconcile
    /// worker is spawned with its own subscription to the shutdown channel.
    pub async fn start(&mut self) -> ReplSetResult<()> {
        info!(
            "starting sidecar for replica set '{}' in namespace '{}'",
            self.config.database.replica_set, self.config.cluster.namespace
        );

        self.admin.connect().await?;

        let reconcile_worker = ReconcileWorker::new(
            self.config.clone(),
            self.cluster.clone(),
            self.admin.clone(),
            self.shutdown_tx.subscribe(),
        )
        .start()
        .await?;

        self.state = SidecarState::Started { reconcile_worker };

        Ok(())
    }

    /// Waits for the sidecar to terminate.
    ///
    /// This method blocks until the reconcile worker has observed a shutdown
    /// signal and finished its current pass. If the sidecar was never
    /// started, this returns immediately.
    pub async fn wait(self) -> ReplSetResult<()> {
        let SidecarState::Started { reconcile_worker } = self.state else {
            info!("sidecar was not started, nothing to wait for");

            return Ok(());
        };

        info!("waiting for reconcile worker to complete");

        reconcile_worker.wait().await?;

        Ok(())
    }

    /// Initiates graceful shutdown of the sidecar.
    ///
    /// Sends the shutdown signal and returns immediately; a pass already in
    /// flight runs to completion first. Use [`Sidecar::wait`] after calling
    /// this method to wait for complete shutdown.
    pub fn shutdown(&self) {
        info!("trying to shut down the sidecar");

        if let Err(err) = self.shutdown_tx.shutdown() {
            error!("failed to send shutdown signal to the sidecar: {}", err);
            return;
        }

        info!("shut down signal successfully sent to the reconcile worker");
    }

    /// Initiates shutdown and waits for complete sidecar termination.
    pub async fn shutdown_and_wait(self) -> ReplSetResult<()> {
        self.shutdown();
        self.wait().await
    }
}
