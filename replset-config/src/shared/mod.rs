mod base;
mod cluster;
mod database;
mod reconcile;
mod retry;
mod sidecar;

pub use base::*;
pub use cluster::*;
pub use database::*;
pub use reconcile::*;
pub use retry::*;
pub use sidecar::*;
