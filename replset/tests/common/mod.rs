//! Common utilities and helpers for testing the sidecar against in-memory
//! collaborators.
//!
//! Provides builders for pods and sidecar configurations along with polling
//! helpers that wait for the reconcile worker to converge on an expected
//! replica set state.

// Each test binary compiles its own copy of this module and uses a different
// subset of the helpers.
#![allow(dead_code)]

pub mod builders;
pub mod wait;
