//! Projects and their task linkage for Worktally.
//!
//! A project lists its tasks by id while each task points back at its
//! project. The two sides live in separate documents, so the services here
//! own every write that touches either side. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Document mapping in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
