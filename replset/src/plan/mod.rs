//! Computing the membership changes needed for one reconciliation pass.
//!
//! The diff annotates resolved candidates against the members reported by the
//! replica set; the instruction generator turns the annotated list into an
//! ordered plan, detecting when the current primary must be handed off.

pub mod diff;
pub mod instructions;

pub use diff::*;
pub use instructions::*;
