use std::future::Future;

use crate::error::ReplSetResult;

/// A trait for types that can be started as background workers.
///
/// The generic parameter `H` is the handle type returned once the worker is
/// running, and `S` is the state type that the handle exposes.
pub trait Worker<H, S>
where
    H: WorkerHandle<S>,
{
    /// Error type returned when the worker fails to start.
    type Error;

    /// Starts the worker, returning a handle to the running task.
    ///
    /// Starting is separate from running: errors surfaced here come from the
    /// startup path, while errors of the running worker are reported through
    /// [`WorkerHandle::wait`].
    fn start(self) -> impl Future<Output = Result<H, Self::Error>> + Send;
}

/// A handle to a running worker.
///
/// The handle outlives nothing: dropping it detaches the worker, which keeps
/// running until it observes a shutdown signal.
pub trait WorkerHandle<S> {
    /// Returns the current state of the worker.
    ///
    /// The returned state is a snapshot and says nothing about whether the
    /// worker is still running.
    fn state(&self) -> S;

    /// Returns a future that resolves when the worker completes.
    ///
    /// Resolves to an error if the worker failed or its task panicked.
    fn wait(self) -> impl Future<Output = ReplSetResult<()>> + Send;
}
