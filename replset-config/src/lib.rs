//! Configuration management for the replica-set sidecar.
//!
//! Provides environment detection, hierarchical configuration loading from
//! YAML files and environment variables, secret handling, and the typed
//! configuration sections consumed by the sidecar.

mod environment;
mod load;
mod secret;
pub mod shared;

pub use environment::*;
pub use load::*;
pub use secret::*;
