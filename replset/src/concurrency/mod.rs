//! Concurrency primitives shared by the sidecar runtime.
//!
//! Contains the signal and shutdown channel abstractions used to stop the
//! reconciliation worker cooperatively.

pub mod shutdown;
pub mod signal;
