use std::time::Duration;

use replset::replica::memory::MemoryReplicaSet;
use replset::types::ReplicaSetConfig;
use tokio::time::{Instant, sleep};

/// How long polling helpers wait for the reconcile worker to converge before
/// failing the test.
const WAIT_TIMEOUT: Duration = Duration::from_secs(10);

/// How often polling helpers sample the in-memory replica set.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Waits until the stored configuration reaches the given version and
/// returns it.
///
/// Panics when the version is not reached within the timeout, which fails
/// the calling test with a readable message.
pub async fn wait_for_version(replica_set: &MemoryReplicaSet, version: i64) -> ReplicaSetConfig {
    let deadline = Instant::now() + WAIT_TIMEOUT;

    loop {
        if let Some(config) = replica_set.current_config().await
            && config.version >= version
        {
            return config;
        }

        if Instant::now() >= deadline {
            panic!("configuration did not reach version {version} in time");
        }

        sleep(POLL_INTERVAL).await;
    }
}

/// Waits until the replica set has been initiated and returns the first
/// configuration.
pub async fn wait_for_initiation(replica_set: &MemoryReplicaSet) -> ReplicaSetConfig {
    wait_for_version(replica_set, 1).await
}

/// Waits until at least `attempts` status fetches have been observed.
pub async fn wait_for_status_attempts(replica_set: &MemoryReplicaSet, attempts: u32) {
    let deadline = Instant::now() + WAIT_TIMEOUT;

    while replica_set.status_attempts().await < attempts {
        if Instant::now() >= deadline {
            panic!("replica set did not observe {attempts} status fetches in time");
        }

        sleep(POLL_INTERVAL).await;
    }
}
