use std::future::Future;

use crate::error::ReplSetResult;
use crate::types::PodRecord;

/// Read-only view of the cluster scoped to the pods backing the replica set.
///
/// Implementations list pods only; membership decisions are taken entirely by
/// the reconciliation pass from the returned records.
pub trait PodProvider {
    /// Lists the pods matching `label_selector` inside `namespace`.
    ///
    /// The returned order is the cluster's listing order and is preserved by
    /// downstream consumers, so ids assigned at initiation follow it.
    fn list_pods(
        &self,
        namespace: &str,
        label_selector: &str,
    ) -> impl Future<Output = ReplSetResult<Vec<PodRecord>>> + Send;
}
