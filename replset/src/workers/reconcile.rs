use std::sync::Arc;
use std::time::Duration;

use replset_config::shared::SidecarConfig;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{Instrument, debug, info, warn};

use crate::cluster::PodProvider;
use crate::concurrency::shutdown::ShutdownRx;
use crate::error::{ErrorKind, ReplSetError, ReplSetResult};
use crate::membership::{MemberCandidate, resolve_candidates};
use crate::plan::{build_plan, diff_members};
use crate::reconfig::ReconfigExecutor;
use crate::replica::ReplicaSetAdmin;
use crate::status::{StatusCache, StatusDisposition};
use crate::types::{ReplicaSetMember, ReplicaSetStatus, UNREACHABLE_CODE};
use crate::workers::base::{Worker, WorkerHandle};

#[derive(Debug)]
pub struct ReconcileWorkerHandle {
    handle: Option<JoinHandle<ReplSetResult<()>>>,
}

impl WorkerHandle<()> for ReconcileWorkerHandle {
    fn state(&self) {}

    async fn wait(mut self) -> ReplSetResult<()> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };

        handle.await??;

        Ok(())
    }
}

/// Worker driving the reconciliation loop.
///
/// The loop is one-shot per wake-up: it runs a single pass to completion,
/// then sleeps for the configured interval regardless of the pass outcome. A
/// failing pass never terminates the loop; the failure is logged, the admin
/// connection is forced closed, and the next pass starts over from live
/// state.
#[derive(Debug)]
pub struct ReconcileWorker<C, A> {
    config: Arc<SidecarConfig>,
    cluster: C,
    admin: A,
    shutdown_rx: ShutdownRx,
}

impl<C, A> ReconcileWorker<C, A> {
    pub fn new(config: Arc<SidecarConfig>, cluster: C, admin: A, shutdown_rx: ShutdownRx) -> Self {
        Self {
            config,
            cluster,
            admin,
            shutdown_rx,
        }
    }
}

impl<C, A> Worker<ReconcileWorkerHandle, ()> for ReconcileWorker<C, A>
where
    C: PodProvider + Send + Sync + 'static,
    A: ReplicaSetAdmin + Send + Sync + 'static,
{
    type Error = ReplSetError;

    async fn start(self) -> Result<ReconcileWorkerHandle, Self::Error> {
        info!("starting reconcile worker");

        let reconcile_worker_span = tracing::info_span!(
            "reconcile_worker",
            replica_set = %self.config.database.replica_set
        );
        let reconcile_worker = async move {
            self.run_loop().await?;

            info!("reconcile worker completed successfully");

            Ok(())
        }
        .instrument(reconcile_worker_span);

        let handle = tokio::spawn(reconcile_worker);

        Ok(ReconcileWorkerHandle {
            handle: Some(handle),
        })
    }
}

impl<C, A> ReconcileWorker<C, A>
where
    C: PodProvider + Send + Sync + 'static,
    A: ReplicaSetAdmin + Send + Sync + 'static,
{
    async fn run_loop(mut self) -> ReplSetResult<()> {
        let freshness = Duration::from_secs(self.config.reconcile.status_freshness_secs);
        let mut cache = StatusCache::new(freshness);

        loop {
            if let Err(error) = self.run_pass(&mut cache).await {
                warn!(error = %error, "reconciliation pass failed");

                // The connection is forced closed after a failed pass; the
                // next pass reopens it.
                if let Err(error) = self.admin.close().await {
                    warn!(error = %error, "closing the admin connection failed");
                }
            }

            tokio::select! {
                biased;

                // Shutdown signal received, exit loop.
                _ = self.shutdown_rx.changed() => {
                    info!("shutting down reconcile worker");

                    if let Err(error) = self.admin.close().await {
                        warn!(error = %error, "closing the admin connection failed");
                    }

                    return Ok(());
                }

                _ = sleep(Duration::from_secs(self.config.reconcile.sleep_secs)) => {}
            }
        }
    }

    /// Runs one reconciliation pass.
    ///
    /// An error return aborts the remainder of this pass only; whatever was
    /// already applied stays applied and the next pass re-diffs from live
    /// state.
    async fn run_pass(&self, cache: &mut StatusCache) -> ReplSetResult<()> {
        self.admin.connect().await?;

        let pods = self
            .cluster
            .list_pods(
                &self.config.cluster.namespace,
                &self.config.cluster.pod_label_selector,
            )
            .await?;
        let candidates =
            resolve_candidates(&pods, &self.config.cluster, self.config.database.port);
        if candidates.is_empty() {
            warn!("no running pods matched the selector, ending the pass without changes");

            return Ok(());
        }

        if cache.needs_refresh() {
            self.refresh_status(cache).await;
        }

        // A refresh always records a status.
        let Some(status) = cache.status().cloned() else {
            return Ok(());
        };

        match StatusDisposition::from_code(status.code) {
            StatusDisposition::Uninitialized => self.initiate_replica_set(candidates, cache).await,
            StatusDisposition::Healthy => self.reconcile_members(candidates, &status).await,
            StatusDisposition::Unhandled(code) if code == UNREACHABLE_CODE => {
                warn!("replica set status is unavailable, ending the pass without changes");

                Ok(())
            }
            StatusDisposition::Unhandled(code) => {
                warn!(code, "unhandled replica set status code, ending the pass without changes");

                Ok(())
            }
        }
    }

    /// Fetches the status into the cache.
    ///
    /// Fetch failures are absorbed here: a synthetic unreachable status is
    /// recorded without advancing the freshness stamp, so the next pass
    /// re-fetches immediately.
    async fn refresh_status(&self, cache: &mut StatusCache) {
        match self.admin.get_status().await {
            Ok(status) => cache.record_success(status),
            Err(error) if error.kind() == ErrorKind::NotYetInitialized => {
                cache.record_success(ReplicaSetStatus::uninitialized());
            }
            Err(error) => {
                warn!(error = %error, "fetching the replica set status failed");

                cache.record_failure();
            }
        }
    }

    /// Bootstraps the replica set from the currently running candidates.
    ///
    /// Member ids are assigned sequentially starting at 0 in pod-list order.
    /// The cached pre-initiation status is invalidated so the next pass
    /// re-fetches instead of re-initiating.
    async fn initiate_replica_set(
        &self,
        candidates: Vec<MemberCandidate>,
        cache: &mut StatusCache,
    ) -> ReplSetResult<()> {
        let members: Vec<ReplicaSetMember> = candidates
            .into_iter()
            .enumerate()
            .map(|(id, candidate)| ReplicaSetMember {
                id: id as i32,
                host: candidate.host,
                priority: candidate.priority,
                votes: candidate.votes,
            })
            .collect();

        info!(members = members.len(), "initiating the replica set");

        self.admin.initiate(&members).await?;
        let config = self.admin.get_config().await?;

        debug!(
            version = config.version,
            members = config.members.len(),
            "replica set initiated"
        );

        cache.invalidate();

        Ok(())
    }

    /// Diffs the candidates against the reported membership and applies the
    /// resulting plan.
    async fn reconcile_members(
        &self,
        candidates: Vec<MemberCandidate>,
        status: &ReplicaSetStatus,
    ) -> ReplSetResult<()> {
        let candidates = diff_members(candidates, status);
        let plan = build_plan(&candidates);
        if !plan.has_changes() {
            debug!("membership matches the running pods, nothing to apply");

            return Ok(());
        }

        info!(
            instructions = plan.instructions.len(),
            handoff = plan.handoff,
            "applying membership changes"
        );

        let executor = ReconfigExecutor::new(&self.admin, &self.config.reconfig);
        executor.apply(&plan).await
    }
}
