//! Admin-command access to the replica set being controlled.
//!
//! Consumers should depend on the trait [`ReplicaSetAdmin`], which exposes the
//! handful of admin commands the reconciliation pass needs: status, config
//! fetch, config submit, and initiation. The [`memory::MemoryReplicaSet`]
//! implementation simulates a server for tests and non-database environments,
//! including the version discipline a real server enforces.

mod base;
pub mod memory;

pub use base::*;
