use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::bail;
use crate::error::{ErrorKind, ReplSetError, ReplSetResult};
use crate::replica::ReplicaSetAdmin;
use crate::replset_error;
use crate::types::{ReplicaSetConfig, ReplicaSetMember, ReplicaSetStatus, ReportedMember};

#[derive(Debug)]
struct Inner {
    replica_set: String,
    configsvr: bool,
    connected: bool,
    initiated: bool,
    config: Option<ReplicaSetConfig>,
    primary: Option<String>,
    connect_transitions: u32,
    close_transitions: u32,
    status_attempts: u32,
    submit_attempts: u32,
    submit_faults: VecDeque<ErrorKind>,
    status_faults: VecDeque<ErrorKind>,
}

/// In-memory replica set admin used in tests and non-database environments.
///
/// The simulator enforces the same version discipline as a real server: a
/// submitted configuration must carry a version exactly one greater than the
/// stored one, otherwise the submit fails with
/// [`ErrorKind::StaleConfigVersion`]. Faults can be queued against submits and
/// status fetches to exercise the executor's retry and reconnect behavior.
#[derive(Debug, Clone)]
pub struct MemoryReplicaSet {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryReplicaSet {
    pub fn new(replica_set: &str, configsvr: bool) -> Self {
        let inner = Inner {
            replica_set: replica_set.to_string(),
            configsvr,
            connected: false,
            initiated: false,
            config: None,
            primary: None,
            connect_transitions: 0,
            close_transitions: 0,
            status_attempts: 0,
            submit_attempts: 0,
            submit_faults: VecDeque::new(),
            status_faults: VecDeque::new(),
        };

        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    /// Designates the member with the given host as the reported primary.
    ///
    /// Without a designation the lowest-id member is reported as primary.
    pub async fn set_primary(&self, host: &str) {
        let mut inner = self.inner.lock().await;
        inner.primary = Some(host.to_string());
    }

    /// Queues `count` submit failures of the given kind, consumed in order
    /// before any submitted configuration is examined.
    pub async fn fail_submits(&self, count: usize, kind: ErrorKind) {
        let mut inner = self.inner.lock().await;
        for _ in 0..count {
            inner.submit_faults.push_back(kind);
        }
    }

    /// Queues `count` status fetch failures of the given kind.
    pub async fn fail_statuses(&self, count: usize, kind: ErrorKind) {
        let mut inner = self.inner.lock().await;
        for _ in 0..count {
            inner.status_faults.push_back(kind);
        }
    }

    /// Number of times the connection went from closed to open.
    pub async fn connect_transitions(&self) -> u32 {
        self.inner.lock().await.connect_transitions
    }

    /// Number of times the connection went from open to closed.
    pub async fn close_transitions(&self) -> u32 {
        self.inner.lock().await.close_transitions
    }

    /// Number of status fetch attempts observed, including failed ones.
    pub async fn status_attempts(&self) -> u32 {
        self.inner.lock().await.status_attempts
    }

    /// Number of submit attempts observed, including failed ones.
    pub async fn submit_attempts(&self) -> u32 {
        self.inner.lock().await.submit_attempts
    }

    /// Snapshot of the currently stored configuration, if initiated.
    pub async fn current_config(&self) -> Option<ReplicaSetConfig> {
        self.inner.lock().await.config.clone()
    }

    pub async fn is_connected(&self) -> bool {
        self.inner.lock().await.connected
    }

    fn fault_error(kind: ErrorKind) -> ReplSetError {
        replset_error!(kind, "Injected fault", "scripted failure from the memory replica set")
    }
}

impl ReplicaSetAdmin for MemoryReplicaSet {
    async fn connect(&self) -> ReplSetResult<()> {
        let mut inner = self.inner.lock().await;
        if !inner.connected {
            inner.connected = true;
            inner.connect_transitions += 1;
        }

        Ok(())
    }

    async fn close(&self) -> ReplSetResult<()> {
        let mut inner = self.inner.lock().await;
        if inner.connected {
            inner.connected = false;
            inner.close_transitions += 1;
        }

        Ok(())
    }

    async fn get_status(&self) -> ReplSetResult<ReplicaSetStatus> {
        let mut inner = self.inner.lock().await;
        if !inner.connected {
            bail!(ErrorKind::InvalidState, "Admin connection is not open");
        }

        inner.status_attempts += 1;

        if let Some(kind) = inner.status_faults.pop_front() {
            return Err(Self::fault_error(kind));
        }

        if !inner.initiated {
            return Ok(ReplicaSetStatus::uninitialized());
        }

        let config = inner
            .config
            .as_ref()
            .ok_or_else(|| replset_error!(ErrorKind::InvalidState, "Initiated set has no config"))?;

        let designated = inner
            .primary
            .as_ref()
            .and_then(|host| config.member_by_host(host))
            .map(|member| member.id);
        let primary_id = designated.or_else(|| config.members.iter().map(|member| member.id).min());

        let members = config
            .members
            .iter()
            .map(|member| ReportedMember {
                id: member.id,
                name: member.host.clone(),
                state: if Some(member.id) == primary_id {
                    "PRIMARY".to_string()
                } else {
                    "SECONDARY".to_string()
                },
            })
            .collect();

        Ok(ReplicaSetStatus {
            set: inner.replica_set.clone(),
            ok: 1,
            code: 0,
            members,
        })
    }

    async fn get_config(&self) -> ReplSetResult<ReplicaSetConfig> {
        let inner = self.inner.lock().await;
        if !inner.connected {
            bail!(ErrorKind::InvalidState, "Admin connection is not open");
        }

        match &inner.config {
            Some(config) => Ok(config.clone()),
            None => Err(replset_error!(
                ErrorKind::NotYetInitialized,
                "Replica set has not been initiated"
            )),
        }
    }

    async fn submit_config(
        &self,
        config: &ReplicaSetConfig,
        _force: bool,
    ) -> ReplSetResult<ReplicaSetConfig> {
        // The force flag relaxes server-side safety checks that the memory
        // simulator does not model.
        let mut inner = self.inner.lock().await;
        if !inner.connected {
            bail!(ErrorKind::InvalidState, "Admin connection is not open");
        }

        inner.submit_attempts += 1;

        if let Some(kind) = inner.submit_faults.pop_front() {
            return Err(Self::fault_error(kind));
        }

        let stored = match &inner.config {
            Some(stored) => stored,
            None => {
                bail!(
                    ErrorKind::NotYetInitialized,
                    "Replica set has not been initiated"
                )
            }
        };

        if config.version != stored.version + 1 {
            bail!(
                ErrorKind::StaleConfigVersion,
                "Submitted configuration carries a stale version",
                format!("expected {}, got {}", stored.version + 1, config.version)
            );
        }

        inner.config = Some(config.clone());

        Ok(config.clone())
    }

    async fn initiate(&self, members: &[ReplicaSetMember]) -> ReplSetResult<()> {
        let mut inner = self.inner.lock().await;
        if !inner.connected {
            bail!(ErrorKind::InvalidState, "Admin connection is not open");
        }

        if inner.initiated {
            bail!(
                ErrorKind::InvalidState,
                "Replica set has already been initiated"
            );
        }

        inner.config = Some(ReplicaSetConfig {
            id: inner.replica_set.clone(),
            version: 1,
            configsvr: inner.configsvr,
            members: members.to_vec(),
        });
        inner.initiated = true;

        Ok(())
    }
}
