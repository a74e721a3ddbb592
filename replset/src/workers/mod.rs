//! Worker implementation for the reconciliation loop.
//!
//! A single reconcile worker owns the loop end to end: it refreshes cluster
//! and replica set state, computes the plan, and applies it, one pass per
//! wake-up. The worker is started and awaited through the generic worker
//! abstractions in [`base`].

pub mod base;
pub mod reconcile;
