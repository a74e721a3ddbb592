//! Tracing setup for the replica-set sidecar.
//!
//! Production environments log structured JSON to rotating files, development
//! environments log pretty-printed output to the console. Panics are routed
//! through tracing so they end up in the same sink as regular logs.

mod tracing;

pub use crate::tracing::*;
