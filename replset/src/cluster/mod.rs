//! Cluster API integration used to discover the pods backing the replica set.
//!
//! Consumers should depend on the trait [`PodProvider`] and avoid relying on a
//! specific transport. The default provider, [`kubernetes::KubernetesPods`],
//! is backed by the [`kube`] crate and talks to the cluster using the ambient
//! configuration (in-cluster or local `~/.kube/config`). Keeping the
//! abstraction in [`base`] lets us swap implementations in tests and
//! non-Kubernetes environments.

mod base;
#[cfg(feature = "kubernetes")]
pub mod kubernetes;
pub mod memory;

pub use base::*;
