//! Common utilities and helpers for testing replica set reconciliation.
//!
//! Provides builders for pods, candidates, status and configuration documents,
//! plus a sidecar configuration with timings short enough for tests.

pub mod fixtures;
