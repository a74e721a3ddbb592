use std::future::Future;

use crate::error::ReplSetResult;
use crate::types::{ReplicaSetConfig, ReplicaSetMember, ReplicaSetStatus};

/// Admin-command interface of the replica set under control.
///
/// Implementations are expected to report failures with distinguishable error
/// kinds: [`crate::error::ErrorKind::NotYetInitialized`] when the set has
/// never been initiated, [`crate::error::ErrorKind::NotPrimary`] when the
/// connected node cannot accept mutations, and generic kinds otherwise. The
/// executor relies on this distinction to decide between reconnecting,
/// bootstrapping, and giving up.
pub trait ReplicaSetAdmin {
    /// Establishes the admin connection.
    ///
    /// Connecting while already connected is a no-op, so callers may invoke
    /// this at the start of every pass.
    fn connect(&self) -> impl Future<Output = ReplSetResult<()>> + Send;

    /// Closes the admin connection if it is open.
    fn close(&self) -> impl Future<Output = ReplSetResult<()>> + Send;

    /// Fetches the live status of the replica set.
    ///
    /// An uninitiated set is reported as a status document carrying
    /// [`crate::types::NOT_YET_INITIALIZED_CODE`] rather than as an error.
    fn get_status(&self) -> impl Future<Output = ReplSetResult<ReplicaSetStatus>> + Send;

    /// Fetches the current configuration document.
    fn get_config(&self) -> impl Future<Output = ReplSetResult<ReplicaSetConfig>> + Send;

    /// Submits a mutated configuration document.
    ///
    /// The submitted `version` must be exactly one greater than the version
    /// currently held by the server. On success the freshly re-fetched
    /// configuration is returned so callers never keep mutating a stale local
    /// copy.
    fn submit_config(
        &self,
        config: &ReplicaSetConfig,
        force: bool,
    ) -> impl Future<Output = ReplSetResult<ReplicaSetConfig>> + Send;

    /// Bootstraps the replica set with the given member list.
    ///
    /// Member ids are taken as provided; callers assign them sequentially
    /// starting at 0 in pod-list order.
    fn initiate(
        &self,
        members: &[ReplicaSetMember],
    ) -> impl Future<Output = ReplSetResult<()>> + Send;
}
