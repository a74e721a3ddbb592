//! Turning cluster pods into replica set member candidates.
//!
//! The resolver filters out pods that cannot serve as members and derives a
//! stable network identity for each remaining pod. Candidates start their life
//! flagged for insertion and are downgraded by the diff when they match an
//! existing member.

pub mod candidate;
pub mod resolver;

pub use candidate::*;
pub use resolver::*;
