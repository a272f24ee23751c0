//! Step definitions for task linkage scenarios.

pub mod given;
pub mod then;
pub mod when;
