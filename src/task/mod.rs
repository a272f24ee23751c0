//! Task lifecycle management for Worktally.
//!
//! This module owns the task state machine (start, pause, resume, complete),
//! the time ledger that derives tracked minutes from each task's event log,
//! and the service that persists transitions through the document store.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Document mapping in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod services;
