pub mod cluster;
pub mod concurrency;
pub mod error;
mod macros;
pub mod membership;
pub mod plan;
pub mod reconfig;
pub mod replica;
pub mod sidecar;
pub mod status;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod types;
pub mod workers;
